//! Post type for pipeline processing.

use crate::build::post::PostRecord;

/// A post being processed through the pipeline.
///
/// Wraps the transformed `PostRecord` with state filled in by the stages:
///
/// 1. Initially: `output_html` = None
/// 2. After template: `output_html` = final page HTML
/// 3. After write: the page is on disk
#[derive(Debug)]
pub struct ProcessingPost {
    /// The transformed post (title, slug, sanitized body)
    pub post: PostRecord,

    /// Final HTML output after template rendering.
    ///
    /// None until the template stage populates it.
    pub output_html: Option<String>,
}

impl ProcessingPost {
    /// Wrap a transformed post.
    pub fn new(post: PostRecord) -> Self {
        Self {
            post,
            output_html: None,
        }
    }

    /// Get the post slug.
    pub fn slug(&self) -> &str {
        &self.post.slug
    }
}
