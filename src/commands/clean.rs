use std::path::Path;

use crate::{CleanArgs, build::base_path_from_config, config::Config};

pub async fn run(args: &CleanArgs) -> Result<(), anyhow::Error> {
    // Determine the config file path
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;

    let config = Config::load_from_file(&config_path)?;

    // Get the base path for resolving relative paths
    let base_path = base_path_from_config(&config_path);

    // Delete the generated posts folder
    let posts_dir = config.output.posts_path(&base_path);
    if posts_dir.exists() {
        if args.dry_run {
            println!("Would delete {}", posts_dir.display());
        } else {
            tokio::fs::remove_dir_all(&posts_dir).await?;
            println!("Deleted {}", posts_dir.display());
        }
    }

    // Delete the generated index page
    let index_path = config.output.index_path(&base_path);
    remove_file(&index_path, args.dry_run).await?;

    Ok(())
}

async fn remove_file(path: &Path, dry_run: bool) -> Result<(), anyhow::Error> {
    if path.is_file() {
        if dry_run {
            println!("Would delete {}", path.display());
        } else {
            tokio::fs::remove_file(path).await?;
            println!("Deleted {}", path.display());
        }
    }
    Ok(())
}
