//! Default pipeline stages.
//!
//! The standard post pipeline consists of:
//!
//! 1. **TemplateStage** - Inject each post into the post template
//! 2. **WriteStage** - Write each page to the posts directory
//! 3. **IndexStage** (finalize) - Link every post from the index page

mod index;
mod template;
mod write;

pub use index::IndexStage;
pub use template::TemplateStage;
pub use write::WriteStage;
