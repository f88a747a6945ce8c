use std::path::Path;

use crate::{
    InitArgs,
    config::{Config, DEFAULT_CONFIG_FILE},
};

const STARTER_POST_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title></title>
</head>
<body>
  <a href="/">Home</a>
</body>
</html>
"#;

const STARTER_MAIN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Blog</title>
</head>
<body>
  <h1>Blog</h1>
  <nav id="posts"></nav>
</body>
</html>
"#;

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    println!("Initializing project in {}", path.display());

    let config = Config::default();
    let config_text = serde_yaml::to_string(&config)?;
    write_if_missing(&path.join(DEFAULT_CONFIG_FILE), &config_text).await?;
    write_if_missing(&path.join(&config.templates.post), STARTER_POST_TEMPLATE).await?;
    write_if_missing(&path.join(&config.templates.main), STARTER_MAIN_TEMPLATE).await?;

    // The build deletes this directory first, so it has to exist up front.
    let posts_dir = config.output.posts_path(&path);
    tokio::fs::create_dir_all(&posts_dir).await?;
    println!("Created directory {}", posts_dir.display());

    Ok(())
}

async fn write_if_missing(path: &Path, contents: &str) -> Result<(), anyhow::Error> {
    if tokio::fs::try_exists(path).await? {
        println!("Keeping existing {}", path.display());
        return Ok(());
    }
    tokio::fs::write(path, contents).await?;
    println!("Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_scaffolds_project() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs {
            path: dir.path().join("blog"),
            create: true,
        };

        run(&args).await.unwrap();

        let root = dir.path().join("blog");
        assert!(root.join("public/posts").is_dir());
        assert!(root.join("post_template.html").is_file());
        assert!(root.join("main.html").is_file());

        let config = Config::load_from_file(&root.join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config.repository.path, "md-posts");
    }

    #[tokio::test]
    async fn test_init_keeps_existing_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("main.html"), "custom").unwrap();
        let args = InitArgs {
            path: dir.path().to_path_buf(),
            create: false,
        };

        run(&args).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("main.html")).unwrap(),
            "custom"
        );
    }

    #[tokio::test]
    async fn test_init_requires_directory() {
        let dir = TempDir::new().unwrap();
        let args = InitArgs {
            path: dir.path().join("missing"),
            create: false,
        };

        assert!(run(&args).await.is_err());
    }
}
