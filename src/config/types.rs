//! Configuration type definitions.
//!
//! This module contains all the data structures used in postbuild configuration files.
//! These types are pure data - no I/O or complex logic.

use std::path::{Path, PathBuf};

use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};

// =============================================================================
// Root config
// =============================================================================

/// Full build configuration.
///
/// Every section has defaults, so an empty (or missing) config file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

// =============================================================================
// Repository configuration
// =============================================================================

/// Where the Markdown posts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository in `owner/name` form
    #[serde(default = "default_repo")]
    pub repo: String,
    /// Directory within the repository that holds the posts
    #[serde(default = "default_posts_path")]
    pub path: String,
    /// Branch, tag, or commit (defaults to the repository's default branch)
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_repo() -> String {
    "srobertson421/seangoescoding".to_string()
}

fn default_posts_path() -> String {
    "md-posts".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            path: default_posts_path(),
            git_ref: None,
            api_url: default_api_url(),
        }
    }
}

impl RepositoryConfig {
    /// Split `repo` into its owner and name.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        self.repo
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'))
    }
}

// =============================================================================
// Template configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Page skeleton for a single post (needs `<title>` and `<body>`)
    #[serde(default = "default_post_template")]
    pub post: PathBuf,
    /// Index page skeleton (needs an element with `id="posts"`)
    #[serde(default = "default_main_template")]
    pub main: PathBuf,
}

fn default_post_template() -> PathBuf {
    PathBuf::from("post_template.html")
}

fn default_main_template() -> PathBuf {
    PathBuf::from("main.html")
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            post: default_post_template(),
            main: default_main_template(),
        }
    }
}

// =============================================================================
// Output configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root output directory
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Posts directory, relative to `dir`. Destroyed and recreated on every build.
    #[serde(default = "default_output_posts_dir")]
    pub posts_dir: PathBuf,
    /// Index page file name, relative to `dir`
    #[serde(default = "default_index")]
    pub index: PathBuf,
    /// URL prefix used for post links on the index page
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_output_posts_dir() -> PathBuf {
    PathBuf::from("posts")
}

fn default_index() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_url_prefix() -> String {
    "/posts".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            posts_dir: default_output_posts_dir(),
            index: default_index(),
            url_prefix: default_url_prefix(),
        }
    }
}

impl OutputConfig {
    /// Absolute-or-base-relative path of the posts directory.
    pub fn posts_path(&self, base_path: &Path) -> PathBuf {
        resolve(base_path, &self.dir).join(&self.posts_dir)
    }

    /// Absolute-or-base-relative path of the index page.
    pub fn index_path(&self, base_path: &Path) -> PathBuf {
        resolve(base_path, &self.dir).join(&self.index)
    }
}

/// Resolve a possibly relative path against a base path.
pub fn resolve(base_path: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        base_path.join(path)
    } else {
        path.to_path_buf()
    }
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
}

/// Extension names understood by the markdown renderer, with the parser
/// options each one turns on.
pub const MARKDOWN_EXTENSIONS: &[(&str, Options)] = &[
    ("definition_lists", Options::ENABLE_DEFINITION_LIST),
    ("footnotes", Options::ENABLE_FOOTNOTES),
    ("gfm", Options::ENABLE_GFM),
    ("heading_attributes", Options::ENABLE_HEADING_ATTRIBUTES),
    ("smart_punctuation", Options::ENABLE_SMART_PUNCTUATION),
    ("strikethrough", Options::ENABLE_STRIKETHROUGH),
    ("tables", Options::ENABLE_TABLES),
    ("tasklists", Options::ENABLE_TASKLISTS),
];

/// Parser options for one extension name, if it is known.
pub fn markdown_extension(name: &str) -> Option<Options> {
    MARKDOWN_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, options)| *options)
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "footnotes".to_string(),
        "gfm".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_and_name() {
        let mut repo = RepositoryConfig::default();
        assert_eq!(
            repo.owner_and_name(),
            Some(("srobertson421", "seangoescoding"))
        );

        repo.repo = "no-slash".to_string();
        assert_eq!(repo.owner_and_name(), None);

        repo.repo = "too/many/parts".to_string();
        assert_eq!(repo.owner_and_name(), None);

        repo.repo = "/missing-owner".to_string();
        assert_eq!(repo.owner_and_name(), None);
    }

    #[test]
    fn test_output_paths() {
        let output = OutputConfig::default();
        let base = Path::new("/site");

        assert_eq!(output.posts_path(base), PathBuf::from("/site/public/posts"));
        assert_eq!(output.index_path(base), PathBuf::from("/site/public/index.html"));
    }

    #[test]
    fn test_absolute_output_dir_ignores_base() {
        let output = OutputConfig {
            dir: PathBuf::from("/var/www"),
            ..OutputConfig::default()
        };

        assert_eq!(
            output.posts_path(Path::new("/site")),
            PathBuf::from("/var/www/posts")
        );
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();

        assert_eq!(config.repository.path, "md-posts");
        assert_eq!(config.templates.main, PathBuf::from("main.html"));
        assert_eq!(config.output.url_prefix, "/posts");
        assert!(config.repository.git_ref.is_none());
    }
}
