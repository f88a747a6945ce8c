//! Shared utility functions.

/// Convert a slug to title case.
///
/// Splits on `-`, `_` and spaces, capitalizes each word and drops empty words.
/// "my-first-post" -> "My First Post"
/// "rust__notes" -> "Rust Notes"
pub fn title_case(s: &str) -> String {
    s.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
