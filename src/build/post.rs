use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::MarkdownConfig;
use crate::util::title_case;

use super::markdown::{MarkdownError, render_markdown};
use super::sanitize::sanitize_html;
use super::source::RemotePostContent;

/// Marker that introduces the title on a post's first line.
const TITLE_MARKER: &str = "# ";

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error("post '{name}' is not valid base64: {source}")]
    Base64 {
        name: String,
        source: base64::DecodeError,
    },

    #[error("failed to render post '{name}': {source}")]
    Markdown { name: String, source: MarkdownError },
}

// =============================================================================
// PostRecord
// =============================================================================

/// A post ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// Text after the `# ` marker on the first line, if there is one
    pub title: Option<String>,
    /// File name up to the first `.`; names the output file
    pub slug: String,
    /// Rendered and sanitized body
    pub html: String,
}

impl PostRecord {
    /// Title for display, falling back to the title-cased slug.
    pub fn display_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| title_case(&self.slug))
    }
}

/// Turn a fetched post into a [`PostRecord`].
pub fn transform(
    content: &RemotePostContent,
    markdown_config: &MarkdownConfig,
) -> Result<PostRecord, TransformError> {
    let text = decode_content(content)?;

    let title = extract_title(&text);
    if title.is_none() {
        tracing::warn!(
            "Post {} has no '{}' title on its first line",
            content.name,
            TITLE_MARKER
        );
    }

    let raw_html =
        render_markdown(&text, markdown_config).map_err(|e| TransformError::Markdown {
            name: content.name.clone(),
            source: e,
        })?;

    Ok(PostRecord {
        title,
        slug: slug_from_name(&content.name),
        html: sanitize_html(&raw_html),
    })
}

/// Decode the base64 payload, ignoring the line wrapping the remote adds.
///
/// Bytes that are not valid UTF-8 become U+FFFD.
fn decode_content(content: &RemotePostContent) -> Result<String, TransformError> {
    let compact: String = content
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| TransformError::Base64 {
            name: content.name.clone(),
            source: e,
        })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!(
                "Post {} is not valid UTF-8; replacing invalid bytes",
                content.name
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Take the first line, split it on `"# "` and keep the second segment.
///
/// "# Hello World" -> Some("Hello World")
/// "Hello" -> None
fn extract_title(text: &str) -> Option<String> {
    let first_line = text.split('\n').next().unwrap_or_default();
    let first_line = first_line.strip_suffix('\r').unwrap_or(first_line);
    first_line.split(TITLE_MARKER).nth(1).map(str::to_string)
}

/// The file name up to its first `.`.
///
/// "hello.md" -> "hello"
/// "notes.draft.md" -> "notes"
fn slug_from_name(name: &str) -> String {
    name.split('.').next().unwrap_or_default().to_string()
}
