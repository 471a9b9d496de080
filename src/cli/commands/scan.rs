use super::{
    build_pipeline, cancel_on_ctrl_c, event_bus, open_store, print_shows, spawn_status_printer,
};
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::services::ReloadOutcome;

pub async fn cmd_scan_library(config: &Config, force: bool, tree: bool) -> anyhow::Result<()> {
    if config.library.roots.is_empty() {
        println!("No library roots configured.");
        println!();
        println!("Add one to config.toml:");
        println!("  [[library.roots]]");
        println!("  path = \"/media/tv\"");
        return Ok(());
    }

    let store = open_store(config).await?;
    let reporter = event_bus(config);
    let printer = spawn_status_printer(&reporter);
    let cancel = CancellationToken::new();
    let ctrl_c = cancel_on_ctrl_c(&cancel);

    let mut pipeline = build_pipeline(config, store, &reporter);
    let outcome = pipeline.reload(force, &cancel).await?;
    ctrl_c.abort();

    let library = pipeline.library().clone();
    drop(pipeline);
    drop(reporter);
    printer.await.ok();

    match outcome {
        ReloadOutcome::Aborted => println!("Scan cancelled."),
        ReloadOutcome::Completed(summary) => {
            if tree {
                println!();
                print_shows(library.iter());
            }
            println!();
            println!("{:-<70}", "");
            println!("Scan complete!");
            println!("  Shows:    {}", summary.shows);
            println!("  Episodes: {}", summary.episodes);
            if summary.unmatched_groups > 0 {
                println!(
                    "  Skipped:  {} files without episode numbers",
                    summary.unmatched_groups
                );
            }
            if summary.failed_shows > 0 {
                println!(
                    "  Failed:   {} shows could not be stored",
                    summary.failed_shows
                );
            }
        }
    }

    Ok(())
}
