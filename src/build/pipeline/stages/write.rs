//! File writing stage.
//!
//! Writes the final post pages to the posts directory.

use crate::build::paths::post_output_path;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingPost, Stage};

/// Stage that writes rendered posts to `<posts_dir>/<slug>.html`.
///
/// The posts directory must already exist. Existing files are overwritten,
/// so posts sharing a slug leave only the last one on disk.
pub struct WriteStage;

impl Stage for WriteStage {
    fn name(&self) -> &'static str {
        "write"
    }

    fn process(
        &self,
        posts: &mut [ProcessingPost],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for post in posts {
            let html = post.output_html.as_ref().ok_or_else(|| {
                PipelineError::stage(
                    "write",
                    format!(
                        "post '{}' has no output HTML (was template stage run?)",
                        post.slug()
                    ),
                )
            })?;

            let output_path = post_output_path(ctx.posts_dir, post.slug());
            tracing::info!("Writing {}.html", post.slug());
            std::fs::write(&output_path, html)
                .map_err(|e| PipelineError::write(&output_path, e))?;
        }

        Ok(())
    }
}
