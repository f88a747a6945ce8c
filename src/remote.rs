//! Remote repository access for fetching post sources.
//!
//! The build only needs two operations from a repository: list a directory
//! and get a file. [`RemoteRepo`] captures exactly that, and [`GithubRepo`]
//! implements it on top of the GitHub contents API.

use async_trait::async_trait;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;

use crate::config::RepositoryConfig;

/// Characters escaped in repository paths. `/` is kept as a separator.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum RemoteError {
    #[error("invalid repository '{0}', expected 'owner/name'")]
    InvalidRepo(String),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response from {url}: {source}")]
    UnexpectedShape {
        url: String,
        source: serde_json::Error,
    },
}

// =============================================================================
// Wire types
// =============================================================================

/// The kind of a directory entry, as reported by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

/// A single file with its base64 payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteFile {
    pub name: String,
    pub path: String,
    /// Base64 text, possibly wrapped with newlines.
    pub content: String,
}

// =============================================================================
// RemoteRepo
// =============================================================================

/// Read access to a remote source repository.
#[async_trait]
pub trait RemoteRepo: Send + Sync {
    /// List the entries of a directory.
    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// Fetch a single file.
    async fn get_file(&self, path: &str) -> Result<RemoteFile, RemoteError>;
}

// =============================================================================
// GithubRepo
// =============================================================================

/// A GitHub repository read through `GET /repos/{owner}/{repo}/contents/{path}`.
pub struct GithubRepo {
    client: reqwest::Client,
    api_url: String,
    owner: String,
    name: String,
    git_ref: Option<String>,
}

impl GithubRepo {
    /// Create a client for the repository described by the config.
    pub fn new(config: &RepositoryConfig) -> Result<Self, RemoteError> {
        let (owner, name) = config
            .owner_and_name()
            .ok_or_else(|| RemoteError::InvalidRepo(config.repo.clone()))?;

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(RemoteError::Client)?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            name: name.to_string(),
            git_ref: config.git_ref.clone(),
        })
    }

    /// Build the contents URL for a repository path.
    fn contents_url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.owner,
            self.name,
            utf8_percent_encode(path, PATH_SEGMENT)
        )
    }

    /// GET a contents URL and deserialize the JSON body.
    async fn fetch_json<T>(&self, path: &str) -> Result<T, RemoteError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = self.contents_url(path);
        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(git_ref) = &self.git_ref {
            request = request.query(&[("ref", git_ref)]);
        }

        let response = request.send().await.map_err(|e| RemoteError::Request {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RemoteError::Request {
            url: url.clone(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(RemoteError::Status { url, status, body });
        }

        serde_json::from_str(&body).map_err(|e| RemoteError::UnexpectedShape { url, source: e })
    }
}

#[async_trait]
impl RemoteRepo for GithubRepo {
    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        self.fetch_json(path).await
    }

    async fn get_file(&self, path: &str) -> Result<RemoteFile, RemoteError> {
        self.fetch_json(path).await
    }
}

// =============================================================================
// In-memory repository for tests
// =============================================================================
