//! Markdown rendering with generated heading ids.

use std::collections::HashSet;

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::config::{MarkdownConfig, markdown_extension};

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Map configured extension names to parser options.
fn parser_options(markdown_config: &MarkdownConfig) -> Result<Options, MarkdownError> {
    let mut options = Options::empty();
    for extension in &markdown_config.extensions {
        let extension_options = markdown_extension(extension)
            .ok_or_else(|| MarkdownError::InvalidExtension(extension.clone()))?;
        options.insert(extension_options);
    }
    Ok(options)
}

/// Render markdown to HTML using pulldown-cmark.
///
/// Headings without an explicit id get one derived from their text, made
/// unique within the document.
pub fn render_markdown(
    markdown: &str,
    markdown_config: &MarkdownConfig,
) -> Result<String, MarkdownError> {
    let options = parser_options(markdown_config)?;
    let mut events: Vec<Event> = Parser::new_ext(markdown, options).collect();

    let mut used_heading_ids: HashSet<String> = HashSet::new();
    for i in 0..events.len() {
        let needs_id = match &events[i] {
            Event::Start(Tag::Heading { id: Some(existing), .. }) => {
                used_heading_ids.insert(existing.to_string());
                false
            }
            Event::Start(Tag::Heading { id: None, .. }) => true,
            _ => false,
        };
        if !needs_id {
            continue;
        }

        let base_id = slugify(&heading_text(&events[i + 1..]));
        let base_id = if base_id.is_empty() {
            "heading".to_string()
        } else {
            base_id
        };
        let mut id = base_id.clone();
        let mut suffix = 1;
        while used_heading_ids.contains(&id) {
            id = format!("{}-{}", base_id, suffix);
            suffix += 1;
        }
        used_heading_ids.insert(id.clone());

        if let Event::Start(Tag::Heading { id: slot, .. }) = &mut events[i] {
            *slot = Some(CowStr::from(id));
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    Ok(html_output)
}

/// Collect the plain text of a heading, given the events following its start tag.
fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

/// Convert a string to a slug suitable for use as an HTML id.
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .replace(' ', "-")
        .replace(|c: char| !c.is_alphanumeric() && c != '-', "")
}
