use std::sync::Arc;

use crate::remote::{EntryKind, RemoteError, RemoteRepo};

// =============================================================================
// Errors
// =============================================================================

/// A failed call against the remote repository.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("failed to list posts in '{path}': {source}")]
    List { path: String, source: RemoteError },

    #[error("failed to fetch post '{path}': {source}")]
    Fetch { path: String, source: RemoteError },
}

// =============================================================================
// Remote post types
// =============================================================================

/// Identifies one Markdown file in the remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePostReference {
    /// Repository-relative path (e.g. "md-posts/hello.md")
    pub path: String,
    /// File name as listed (e.g. "hello.md")
    pub name: String,
}

/// The raw content of a fetched post.
#[derive(Debug, Clone)]
pub struct RemotePostContent {
    /// File name of the post
    pub name: String,
    /// Base64 payload as delivered by the remote
    pub content: String,
}

// =============================================================================
// PostSource
// =============================================================================

/// Lists and fetches the posts stored under one directory of a remote repository.
///
/// Failures are logged here and then returned to the caller unchanged.
pub struct PostSource<R: ?Sized> {
    repo: Arc<R>,
    posts_path: String,
}

impl<R: ?Sized> Clone for PostSource<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            posts_path: self.posts_path.clone(),
        }
    }
}

impl<R: RemoteRepo + ?Sized> PostSource<R> {
    pub fn new(repo: Arc<R>, posts_path: impl Into<String>) -> Self {
        Self {
            repo,
            posts_path: posts_path.into(),
        }
    }

    /// List the post files, in the order the remote returns them.
    ///
    /// Only plain files are kept; subdirectories and other entries are skipped.
    pub async fn list_posts(&self) -> Result<Vec<RemotePostReference>, SourceError> {
        let entries = match self.repo.list_dir(&self.posts_path).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Failed to list posts in {}: {}", self.posts_path, e);
                return Err(SourceError::List {
                    path: self.posts_path.clone(),
                    source: e,
                });
            }
        };

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                if entry.kind == EntryKind::File {
                    Some(RemotePostReference {
                        path: entry.path,
                        name: entry.name,
                    })
                } else {
                    tracing::debug!("Skipping non-file entry {} ({:?})", entry.path, entry.kind);
                    None
                }
            })
            .collect())
    }

    /// Fetch the content of one post.
    pub async fn fetch_content(
        &self,
        reference: &RemotePostReference,
    ) -> Result<RemotePostContent, SourceError> {
        match self.repo.get_file(&reference.path).await {
            Ok(file) => {
                tracing::debug!(
                    "Fetched {} from {} ({} bytes encoded)",
                    reference.name,
                    file.path,
                    file.content.len()
                );
                Ok(RemotePostContent {
                    name: file.name,
                    content: file.content,
                })
            }
            Err(e) => {
                tracing::error!("Failed to fetch {}: {}", reference.path, e);
                Err(SourceError::Fetch {
                    path: reference.path.clone(),
                    source: e,
                })
            }
        }
    }
}
