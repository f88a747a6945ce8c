//! Pipeline context for sharing state across stages.

use std::path::Path;

/// Shared context for pipeline stages.
///
/// Holds the output locations and the template sources, read once before
/// the pipeline runs.
pub struct PipelineContext<'a> {
    // === Output configuration ===
    /// Directory where post pages are written
    pub posts_dir: &'a Path,

    /// Index page file
    pub index_path: &'a Path,

    /// URL prefix for links from the index page to posts
    pub url_prefix: &'a str,

    // === Templates ===
    /// Source of the per-post page template
    pub post_template: &'a str,

    /// Source of the main (index) page template
    pub main_template: &'a str,
}
