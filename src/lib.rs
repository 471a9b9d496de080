pub mod cancel;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod metadata;
pub mod models;
pub mod parser;
pub mod progress;
pub mod scanner;
pub mod services;

use clap::Parser;
use cli::{
    Cli, Commands, cmd_init, cmd_inspect, cmd_list_shows, cmd_reload_show, cmd_scan_library,
};
pub use config::Config;
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Some(Commands::Scan { force, tree }) => cmd_scan_library(&config, force, tree).await,
        Some(Commands::Reload { show_dir }) => cmd_reload_show(&config, &show_dir).await,
        Some(Commands::List) => cmd_list_shows(&config).await,
        Some(Commands::Inspect { path }) => cmd_inspect(&config, &path),
        Some(Commands::Init) => cmd_init(),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
