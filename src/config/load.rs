//! Configuration loading from files and the environment.

use std::path::{Path, PathBuf};

use super::{Config, ConfigError};

/// Config file looked up when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "postbuild.yaml";

/// Prefix for environment overrides, e.g. `POSTBUILD__REPOSITORY__REPO`.
const ENV_PREFIX: &str = "POSTBUILD";

impl Config {
    /// Resolve the command line argument to an absolute config path,
    /// defaulting to `postbuild.yaml` in the current directory.
    pub fn path_from_arg(config_file: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let config_file = config_file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        if config_file.is_relative() {
            Ok(std::env::current_dir()
                .map_err(ConfigError::CwdFailure)?
                .join(config_file))
        } else {
            Ok(config_file.to_path_buf())
        }
    }

    /// Load the config from a file path.
    ///
    /// The file is optional: a missing file means built-in defaults, still
    /// subject to environment overrides.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path
            .as_os_str()
            .to_str()
            .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;

        let config = config::Config::builder()
            .add_source(config::File::new(path_str, config::FileFormat::Yaml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Config>()?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();

        let config = Config::load_from_file(&dir.path().join("absent.yaml")).unwrap();

        assert_eq!(config.repository.repo, "srobertson421/seangoescoding");
        assert_eq!(config.output.dir, PathBuf::from("public"));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("postbuild.yaml");
        std::fs::write(
            &path,
            "repository:\n  repo: someone/blog\n  ref: drafts\noutput:\n  dir: site\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();

        assert_eq!(config.repository.repo, "someone/blog");
        assert_eq!(config.repository.git_ref.as_deref(), Some("drafts"));
        assert_eq!(config.repository.path, "md-posts");
        assert_eq!(config.output.dir, PathBuf::from("site"));
        assert_eq!(config.output.posts_dir, PathBuf::from("posts"));
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("postbuild.yaml");
        std::fs::write(&path, "repository:\n  repo: nobody\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_path_from_arg() {
        let absolute = std::env::temp_dir().join("site.yaml");
        assert_eq!(Config::path_from_arg(Some(&absolute)).unwrap(), absolute);

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            Config::path_from_arg(None).unwrap(),
            cwd.join(DEFAULT_CONFIG_FILE)
        );
        assert_eq!(
            Config::path_from_arg(Some(Path::new("conf/blog.yaml"))).unwrap(),
            cwd.join("conf/blog.yaml")
        );
    }
}
