//! Index page stage.

use crate::build::paths::post_url;
use crate::build::pipeline::{FinalizeStage, PipelineContext, PipelineError, ProcessingPost};
use crate::build::render::{PostLink, render_index_page};

/// Finalize stage that writes the index page.
///
/// Every post gets one anchor inside the main template's `id="posts"`
/// element, in processing order.
pub struct IndexStage;

impl FinalizeStage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn finalize(
        &self,
        posts: &[ProcessingPost],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let links: Vec<PostLink> = posts
            .iter()
            .map(|post| PostLink {
                title: post.post.display_title(),
                href: post_url(ctx.url_prefix, post.slug()),
            })
            .collect();

        let html = render_index_page(ctx.main_template, &links)?;

        tracing::info!("Writing {}", ctx.index_path.display());
        std::fs::write(ctx.index_path, html)
            .map_err(|e| PipelineError::write(ctx.index_path, e))?;

        Ok(())
    }
}
