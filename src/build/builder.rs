use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::config::{Config, MarkdownConfig, resolve};
use crate::remote::{GithubRepo, RemoteError, RemoteRepo};

use super::pipeline::{Pipeline, PipelineContext, PipelineError, ProcessingPost};
use super::post::{PostRecord, TransformError, transform};
use super::source::{PostSource, RemotePostReference, SourceError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("remote setup error: {0}")]
    Remote(#[from] RemoteError),

    #[error("fetch error: {0}")]
    Fetch(#[from] SourceError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),

    #[error("failed to {action} {path}: {source}")]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("post task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BuildError {
    fn filesystem(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug)]
pub struct BuildResult {
    pub posts_dir: PathBuf,
    pub index_path: PathBuf,
    pub posts: usize,
}

pub struct Builder<R> {
    config: Config,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
    repo: Arc<R>,
}

impl Builder<GithubRepo> {
    /// Create a builder that reads posts from the configured GitHub repository.
    pub fn new(config: Config, base_path: PathBuf) -> Result<Self, BuildError> {
        let repo = GithubRepo::new(&config.repository)?;
        Ok(Self::with_repo(config, base_path, Arc::new(repo)))
    }
}

impl<R: RemoteRepo + 'static> Builder<R> {
    pub fn with_repo(config: Config, base_path: PathBuf, repo: Arc<R>) -> Self {
        Self {
            config,
            base_path,
            repo,
        }
    }

    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        // Build pipeline:
        // 1. List posts in the remote directory
        // 2. Fetch and transform every post (concurrently, joined in listing order)
        // 3. Recreate the posts directory and write pages plus the index

        // Step 1: List posts
        let source = PostSource::new(Arc::clone(&self.repo), self.config.repository.path.clone());
        tracing::info!(
            "Listing posts in {}/{}",
            self.config.repository.repo,
            self.config.repository.path
        );
        let references = source.list_posts().await?;
        tracing::info!("Found {} post(s)", references.len());

        // Step 2: Fetch and transform
        tracing::info!("Fetching and rendering posts");
        let posts = fetch_posts(&source, references, &self.config.markdown).await?;

        // Step 3: Write output
        let posts_dir = self.config.output.posts_path(&self.base_path);
        let index_path = self.config.output.index_path(&self.base_path);
        let count = self.write_posts(posts, &posts_dir, &index_path)?;
        tracing::info!("Finished creating {} post(s)", count);

        Ok(BuildResult {
            posts_dir,
            index_path,
            posts: count,
        })
    }

    /// Recreate the posts directory, read the templates and run the output pipeline.
    fn write_posts(
        &self,
        posts: Vec<PostRecord>,
        posts_dir: &Path,
        index_path: &Path,
    ) -> Result<usize, BuildError> {
        // The directory must exist: a missing posts directory fails the build.
        tracing::info!("Removing {}", posts_dir.display());
        std::fs::remove_dir_all(posts_dir)
            .map_err(|e| BuildError::filesystem("remove", posts_dir, e))?;

        tracing::info!("Creating {}", posts_dir.display());
        std::fs::create_dir(posts_dir)
            .map_err(|e| BuildError::filesystem("create", posts_dir, e))?;

        let post_template = self.read_template(&self.config.templates.post)?;
        let main_template = self.read_template(&self.config.templates.main)?;

        let ctx = PipelineContext {
            posts_dir,
            index_path,
            url_prefix: &self.config.output.url_prefix,
            post_template: &post_template,
            main_template: &main_template,
        };

        let mut processing: Vec<ProcessingPost> =
            posts.into_iter().map(ProcessingPost::new).collect();
        tracing::info!("Generating {} HTML post file(s)", processing.len());
        let pipeline = Pipeline::default();
        tracing::debug!("Output stages: {:?}", pipeline.stage_names());
        pipeline.run(&mut processing, &ctx)?;

        Ok(processing.len())
    }

    /// Read a template, resolved against the base path.
    fn read_template(&self, template: &Path) -> Result<String, BuildError> {
        let path = resolve(&self.base_path, template);
        tracing::info!("Reading template {}", path.display());
        std::fs::read_to_string(&path).map_err(|e| BuildError::filesystem("read", &path, e))
    }
}

/// Fetch and transform every post.
///
/// One task per post is spawned up front. Results are awaited in listing
/// order and the first failure is returned; tasks still running are left to
/// finish and their results are dropped.
async fn fetch_posts<R: RemoteRepo + 'static>(
    source: &PostSource<R>,
    references: Vec<RemotePostReference>,
    markdown_config: &MarkdownConfig,
) -> Result<Vec<PostRecord>, BuildError> {
    let markdown_config = Arc::new(markdown_config.clone());

    let handles: Vec<_> = references
        .into_iter()
        .map(|reference| {
            let source = source.clone();
            let markdown_config = Arc::clone(&markdown_config);
            tokio::spawn(async move {
                let content = source.fetch_content(&reference).await?;
                let post = transform(&content, &markdown_config)?;
                Ok::<_, BuildError>(post)
            })
        })
        .collect();

    try_join_all(handles.into_iter().map(|handle| async move {
        handle.await.map_err(BuildError::from).and_then(|result| result)
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::MemoryRepo;
    use std::time::Duration;
    use tempfile::TempDir;

    const POST_TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n<head>\n<title>Blog</title>\n</head>\n<body>\n</body>\n</html>\n";
    const MAIN_TEMPLATE: &str = "<!DOCTYPE html>\n<html>\n<body>\n<div id=\"posts\"></div>\n</body>\n</html>\n";

    /// Lay out templates and an existing `public/posts` directory.
    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("post_template.html"), POST_TEMPLATE).unwrap();
        std::fs::write(dir.path().join("main.html"), MAIN_TEMPLATE).unwrap();
        std::fs::create_dir_all(dir.path().join("public/posts")).unwrap();
        dir
    }

    fn builder(dir: &TempDir, repo: MemoryRepo) -> Builder<MemoryRepo> {
        Builder::with_repo(Config::default(), dir.path().to_path_buf(), Arc::new(repo))
    }

    fn posts_in(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path().join("public/posts"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let dir = site();
        let repo =
            MemoryRepo::new().with_file("md-posts", "hello.md", "# Hello World\n\nSome *text*.");

        let result = builder(&dir, repo).build().await.unwrap();

        assert_eq!(result.posts, 1);
        let page = std::fs::read_to_string(dir.path().join("public/posts/hello.html")).unwrap();
        assert!(page.contains("<title>Hello World</title>"));
        assert!(page.contains("<p>Some <em>text</em>.</p>"));
        let index = std::fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains("<a href=\"/posts/hello.html\">Hello World</a>"));
    }

    #[tokio::test]
    async fn test_listing_order_survives_completion_order() {
        let dir = site();
        let repo = MemoryRepo::new()
            .with_file("md-posts", "a.md", "# A")
            .with_file("md-posts", "b.md", "# B")
            .with_file("md-posts", "c.md", "# C")
            .with_delay("md-posts/a.md", Duration::from_millis(60))
            .with_delay("md-posts/b.md", Duration::from_millis(30));

        builder(&dir, repo).build().await.unwrap();

        let index = std::fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains(
            "<a href=\"/posts/a.html\">A</a><a href=\"/posts/b.html\">B</a><a href=\"/posts/c.html\">C</a>"
        ));
    }

    #[tokio::test]
    async fn test_rebuild_removes_stale_files() {
        let dir = site();
        std::fs::write(dir.path().join("public/posts/old.html"), "stale").unwrap();
        let repo = MemoryRepo::new()
            .with_file("md-posts", "one.md", "# One")
            .with_file("md-posts", "two.md", "# Two");
        let builder = builder(&dir, repo);

        builder.build().await.unwrap();
        builder.build().await.unwrap();

        assert_eq!(posts_in(&dir), vec!["one.html", "two.html"]);
    }

    #[tokio::test]
    async fn test_listing_failure_writes_nothing() {
        let dir = site();
        std::fs::write(dir.path().join("public/posts/old.html"), "stale").unwrap();

        let err = builder(&dir, MemoryRepo::new().failing_listing())
            .build()
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::Fetch(SourceError::List { .. })));
        assert_eq!(posts_in(&dir), vec!["old.html"]);
        assert!(!dir.path().join("public/index.html").exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_batch() {
        let dir = site();
        let repo = MemoryRepo::new()
            .with_file("md-posts", "ok.md", "# Ok")
            // Listed but never stored, so fetching it fails.
            .with_entry("md-posts", "gone.md", crate::remote::EntryKind::File);

        let err = builder(&dir, repo).build().await.unwrap_err();

        assert!(matches!(err, BuildError::Fetch(SourceError::Fetch { .. })));
        assert!(!dir.path().join("public/index.html").exists());
        assert!(posts_in(&dir).is_empty());
    }

    #[tokio::test]
    async fn test_transform_failure_aborts_batch() {
        let dir = site();
        let repo = MemoryRepo::new()
            .with_file("md-posts", "ok.md", "# Ok")
            .with_raw_file("md-posts", "bad.md", "%%% not base64 %%%");

        let err = builder(&dir, repo).build().await.unwrap_err();

        assert!(matches!(err, BuildError::Transform(_)));
        assert!(!dir.path().join("public/index.html").exists());
    }

    #[tokio::test]
    async fn test_non_utf8_post_still_builds() {
        use base64::Engine;

        let dir = site();
        let latin = base64::engine::general_purpose::STANDARD.encode(b"# Caf\xe9\n");
        let repo = MemoryRepo::new()
            .with_file("md-posts", "ok.md", "# Ok")
            .with_raw_file("md-posts", "latin.md", &latin);

        let result = builder(&dir, repo).build().await.unwrap();

        assert_eq!(result.posts, 2);
        assert_eq!(posts_in(&dir), vec!["latin.html", "ok.html"]);
        let page = std::fs::read_to_string(dir.path().join("public/posts/latin.html")).unwrap();
        assert!(page.contains("<title>Caf\u{fffd}</title>"));
    }

    #[tokio::test]
    async fn test_template_without_body_end_tag_keeps_post() {
        let dir = site();
        std::fs::write(
            dir.path().join("post_template.html"),
            "<html><head><title>t</title></head><body><a href=\"/\">Home</a>",
        )
        .unwrap();
        let repo = MemoryRepo::new().with_file("md-posts", "hello.md", "# Hello\n\nSome *text*.");

        builder(&dir, repo).build().await.unwrap();

        let page = std::fs::read_to_string(dir.path().join("public/posts/hello.html")).unwrap();
        assert!(page.starts_with("<html><head><title>Hello</title></head><body><a href=\"/\">Home</a>"));
        assert!(page.contains("<p>Some <em>text</em>.</p>"));
    }

    #[tokio::test]
    async fn test_missing_posts_dir_is_fatal() {
        let dir = site();
        std::fs::remove_dir(dir.path().join("public/posts")).unwrap();
        let repo = MemoryRepo::new().with_file("md-posts", "a.md", "# A");

        let err = builder(&dir, repo).build().await.unwrap_err();

        assert!(matches!(
            err,
            BuildError::Filesystem {
                action: "remove",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_template_is_fatal() {
        let dir = site();
        std::fs::remove_file(dir.path().join("main.html")).unwrap();
        let repo = MemoryRepo::new().with_file("md-posts", "a.md", "# A");

        let err = builder(&dir, repo).build().await.unwrap_err();

        match err {
            BuildError::Filesystem { action, path, .. } => {
                assert_eq!(action, "read");
                assert!(path.ends_with("main.html"));
            }
            other => panic!("expected filesystem error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_listing_writes_empty_index() {
        let dir = site();
        let repo = MemoryRepo::new().with_entry("md-posts", "drafts", crate::remote::EntryKind::Dir);

        let result = builder(&dir, repo).build().await.unwrap();

        assert_eq!(result.posts, 0);
        let index = std::fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains("<div id=\"posts\"></div>"));
    }
}
