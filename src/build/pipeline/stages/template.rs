//! Post template rendering stage.

use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingPost, Stage};
use crate::build::render::render_post_page;

/// Stage that injects each post into a fresh copy of the post template.
///
/// The post title becomes the `<title>` text and the sanitized body is
/// appended inside `<body>`. After this stage, `post.output_html` contains
/// the complete page.
pub struct TemplateStage;

impl Stage for TemplateStage {
    fn name(&self) -> &'static str {
        "template"
    }

    fn process(
        &self,
        posts: &mut [ProcessingPost],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for post in posts {
            let html = render_post_page(
                ctx.post_template,
                post.post.title.as_deref(),
                &post.post.html,
            )?;
            post.output_html = Some(html);
        }

        Ok(())
    }
}
