//! Output pipeline for transformed posts.
//!
//! The pipeline turns posts into files through a series of stages:
//! 1. Template rendering (post HTML injected into the post template)
//! 2. File writing (one page per post in the posts directory)
//!
//! Build-wide stages run after all posts are processed; the default
//! pipeline uses one to write the index page.

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::ProcessingPost;
pub use error::PipelineError;

use stages::{IndexStage, TemplateStage, WriteStage};

/// A stage in the post processing pipeline.
///
/// Stages transform posts sequentially. Each stage receives all posts
/// and can modify them in place before passing to the next stage.
pub trait Stage: Send + Sync {
    /// Unique name for this stage.
    fn name(&self) -> &'static str;

    /// Process posts through this stage.
    fn process(
        &self,
        posts: &mut [ProcessingPost],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// A stage that runs once after all posts are processed.
pub trait FinalizeStage: Send + Sync {
    /// Unique name for this stage.
    fn name(&self) -> &'static str;

    /// Run finalization after all posts are processed and written.
    fn finalize(
        &self,
        posts: &[ProcessingPost],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// The post processing pipeline.
///
/// The default pipeline is: template -> write, then the index page.
pub struct Pipeline {
    /// Per-post stages (run for the whole batch, in order)
    stages: Vec<Box<dyn Stage>>,
    /// Build-wide stages (run once after all posts)
    finalize_stages: Vec<Box<dyn FinalizeStage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            finalize_stages: Vec::new(),
        }
    }

    /// Create the default pipeline with standard stages.
    ///
    /// Stages: template -> write; finalize: index
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(TemplateStage);
        pipeline.add_stage(WriteStage);
        pipeline.add_finalize_stage(IndexStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a finalize stage (runs after all posts are processed).
    pub fn add_finalize_stage<S: FinalizeStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.finalize_stages.push(Box::new(stage));
        self
    }

    /// Run the pipeline on a set of posts.
    pub fn run(
        &self,
        posts: &mut [ProcessingPost],
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            tracing::debug!("Running stage '{}'", stage.name());
            stage.process(posts, ctx)?;
        }

        for stage in &self.finalize_stages {
            tracing::debug!("Running finalize stage '{}'", stage.name());
            stage.finalize(posts, ctx)?;
        }

        Ok(())
    }

    /// Get the names of all stages in order, finalize stages last.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .map(|s| s.name())
            .chain(self.finalize_stages.iter().map(|s| s.name()))
            .collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}
