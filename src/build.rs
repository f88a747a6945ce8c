mod builder;
mod markdown;
mod paths;
pub mod pipeline;
mod post;
mod render;
mod sanitize;
pub mod source;

pub use builder::Builder;
pub use paths::base_path_from_config;
