mod init;
mod inspect;
mod list;
mod reload;
mod scan;

pub use init::cmd_init;
pub use inspect::cmd_inspect;
pub use list::cmd_list_shows;
pub use reload::cmd_reload_show;
pub use scan::cmd_scan_library;

use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::db::Store;
use crate::domain::events::ScanEvent;
use crate::metadata::NfoMetadataLoader;
use crate::models::Show;
use crate::progress::ProgressReporter;
use crate::scanner::{DirectoryScanner, FsDirectorySource, MediaFilter};
use crate::services::ShowImportPipeline;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

pub(crate) async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
}

pub(crate) fn event_bus(config: &Config) -> ProgressReporter {
    let (tx, _) = broadcast::channel(config.general.event_bus_buffer_size);
    ProgressReporter::new(tx)
}

pub(crate) fn directory_scanner(config: &Config, reporter: &ProgressReporter) -> DirectoryScanner {
    DirectoryScanner::new(
        Arc::new(FsDirectorySource),
        MediaFilter::new(&config.library.media_extensions),
        reporter.clone(),
    )
}

pub(crate) fn build_pipeline(
    config: &Config,
    store: Store,
    reporter: &ProgressReporter,
) -> ShowImportPipeline {
    ShowImportPipeline::new(
        config.library.library_roots(),
        Arc::new(store),
        Arc::new(NfoMetadataLoader::new()),
        directory_scanner(config, reporter),
        reporter.clone(),
    )
    .with_concurrency(config.library.effective_concurrency())
    .with_show_missing_episodes(config.library.show_missing_episodes)
}

/// Prints status events until the bus closes.
pub(crate) fn spawn_status_printer(reporter: &ProgressReporter) -> tokio::task::JoinHandle<()> {
    let mut rx = reporter.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ScanEvent::SearchStarted { message }) => println!("{message}"),
                Ok(ScanEvent::CurrentDir { path }) if !path.is_empty() => {
                    println!("  {path}");
                }
                Ok(ScanEvent::Progress { current, total }) if current == total => {
                    println!("  {current}/{total} episodes");
                }
                Ok(ScanEvent::ShowsLoaded) => println!("Done."),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Cancels `token` on Ctrl-C.
pub(crate) fn cancel_on_ctrl_c(token: &CancellationToken) -> tokio::task::JoinHandle<()> {
    let token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                println!("Cancelling...");
                token.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    })
}

pub(crate) fn print_shows<'a>(shows: impl IntoIterator<Item = &'a Show>) {
    for show in shows {
        println!("{} ({})", show.display_name(), show.dir.display());
        for season in show.seasons() {
            let present = season.episodes.iter().filter(|e| !e.placeholder).count();
            let missing = season.episodes.len() - present;
            if missing > 0 {
                println!("  {}: {} episodes, {} missing", season.number, present, missing);
            } else {
                println!("  {}: {} episodes", season.number, present);
            }
        }
    }
}
