//! Path and URL conversion utilities.
//!
//! This module handles conversions between:
//! - Post slugs and their output files in the posts directory
//! - Post slugs and the URLs the index page links to

use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped when a slug becomes a URL path segment.
const SLUG_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Output file for a post.
///
/// # Examples
/// ```ignore
/// post_output_path(Path::new("public/posts"), "hello") => public/posts/hello.html
/// ```
pub fn post_output_path(posts_dir: &Path, slug: &str) -> PathBuf {
    posts_dir.join(format!("{}.html", slug))
}

/// URL the index page links to for a post.
///
/// # Examples
/// ```ignore
/// post_url("/posts", "hello") => "/posts/hello.html"
/// post_url("/posts/", "my post") => "/posts/my%20post.html"
/// ```
pub fn post_url(url_prefix: &str, slug: &str) -> String {
    format!(
        "{}/{}.html",
        url_prefix.trim_end_matches('/'),
        utf8_percent_encode(slug, SLUG_SEGMENT)
    )
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_output_path() {
        assert_eq!(
            post_output_path(Path::new("public/posts"), "hello"),
            PathBuf::from("public/posts/hello.html")
        );
    }

    #[test]
    fn test_post_url() {
        assert_eq!(post_url("/posts", "hello"), "/posts/hello.html");
        assert_eq!(post_url("/posts/", "hello"), "/posts/hello.html");
        assert_eq!(post_url("", "hello"), "/hello.html");
    }

    #[test]
    fn test_post_url_encodes_slug() {
        assert_eq!(post_url("/posts", "my post"), "/posts/my%20post.html");
        assert_eq!(post_url("/posts", "a\"b"), "/posts/a%22b.html");
        assert_eq!(post_url("/posts", "q&a"), "/posts/q%26a.html");
    }

    #[test]
    fn test_base_path_from_config() {
        assert_eq!(
            base_path_from_config(Path::new("/site/postbuild.yaml")),
            PathBuf::from("/site")
        );
        assert_eq!(
            base_path_from_config(Path::new("postbuild.yaml")),
            PathBuf::from("")
        );
    }
}
