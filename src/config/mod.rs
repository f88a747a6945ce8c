//! Configuration loading and types for postbuild.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files and the environment (`load`)

mod load;
mod types;

pub use load::DEFAULT_CONFIG_FILE;
pub use types::{
    Config, MARKDOWN_EXTENSIONS, MarkdownConfig, RepositoryConfig, markdown_extension, resolve,
};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to encode config file path as a unicode string: {0}")]
    EncodePath(std::path::PathBuf),

    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("{0}")]
    Validation(String),
}

impl Config {
    /// Check values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.owner_and_name().is_none() {
            return Err(ConfigError::Validation(format!(
                "invalid config: 'repository.repo' must look like 'owner/name', got '{}'",
                self.repository.repo
            )));
        }

        if let Some(unknown) = self
            .markdown
            .extensions
            .iter()
            .find(|ext| markdown_extension(ext).is_none())
        {
            let known: Vec<&str> = MARKDOWN_EXTENSIONS.iter().map(|(name, _)| *name).collect();
            return Err(ConfigError::Validation(format!(
                "invalid config: unknown markdown extension '{}' (expected one of: {})",
                unknown,
                known.join(", ")
            )));
        }

        if self.output.posts_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "invalid config: 'output.posts_dir' must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_repo() {
        let mut config = Config::default();
        config.repository.repo = "just-a-name".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("owner/name"));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let mut config = Config::default();
        config.markdown.extensions.push("mermaid".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mermaid"));
    }

    #[test]
    fn test_rejects_empty_posts_dir() {
        let mut config = Config::default();
        config.output.posts_dir = std::path::PathBuf::new();

        assert!(config.validate().is_err());
    }
}
