use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod build;
mod commands;
mod config;
mod remote;
mod util;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// The command to execute (defaults to `build`)
    #[command(subcommand)]
    command: Option<PostbuildCommand>,
}

#[derive(Parser)]
struct InitArgs {
    /// The path to initialize the project in
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser, Default)]
struct BuildArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "postbuild.yaml")]
    config_file: Option<PathBuf>,
}

#[derive(Parser)]
struct CleanArgs {
    /// The path to the configuration file
    #[arg(short, long, default_value = "postbuild.yaml")]
    config_file: Option<PathBuf>,

    /// Only print what would be deleted
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum PostbuildCommand {
    /// Scaffold a config file, templates and the output directory
    Init(InitArgs),

    /// Fetch the posts and build the site
    Build(BuildArgs),

    /// Delete the generated posts and index page
    Clean(CleanArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let filter = if args.debug {
        "postbuild=debug,info"
    } else {
        "postbuild=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(PostbuildCommand::Init(args)) => {
            commands::init::run(&args).await?;
        }
        Some(PostbuildCommand::Build(args)) => {
            commands::build::run(&args).await?;
        }
        Some(PostbuildCommand::Clean(args)) => {
            commands::clean::run(&args).await?;
        }
        None => {
            commands::build::run(&BuildArgs::default()).await?;
        }
    }

    Ok(())
}
