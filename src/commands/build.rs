use crate::{
    BuildArgs,
    build::{Builder, base_path_from_config},
    config::Config,
};

pub async fn run(args: &BuildArgs) -> Result<(), anyhow::Error> {
    // Determine the config file path
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;

    let config = Config::load_from_file(&config_path)?;

    // Relative paths in the config resolve against the config file's directory
    let base_path = base_path_from_config(&config_path);

    let builder = Builder::new(config, base_path)?;
    let result = builder.build().await?;

    println!(
        "Built {} post(s) to {} (index: {})",
        result.posts,
        result.posts_dir.display(),
        result.index_path.display()
    );

    Ok(())
}
