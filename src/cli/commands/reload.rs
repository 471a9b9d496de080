use super::{
    build_pipeline, cancel_on_ctrl_c, event_bus, open_store, print_shows, spawn_status_printer,
};
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::services::ReloadOutcome;
use anyhow::Context;
use std::path::Path;

pub async fn cmd_reload_show(config: &Config, show_dir: &str) -> anyhow::Result<()> {
    let dir = std::fs::canonicalize(Path::new(show_dir))
        .with_context(|| format!("Show directory not found: {show_dir}"))?;

    let store = open_store(config).await?;
    let reporter = event_bus(config);
    let printer = spawn_status_printer(&reporter);
    let cancel = CancellationToken::new();
    let ctrl_c = cancel_on_ctrl_c(&cancel);

    let mut pipeline = build_pipeline(config, store, &reporter);
    if pipeline.resolve_root(&dir).is_none() {
        println!(
            "Warning: {} is not inside a configured library root",
            dir.display()
        );
    }

    let outcome = pipeline.reload_show(&dir, &cancel).await?;
    ctrl_c.abort();

    let library = pipeline.library().clone();
    drop(pipeline);
    drop(reporter);
    printer.await.ok();

    match outcome {
        ReloadOutcome::Aborted => println!("Reload cancelled."),
        ReloadOutcome::Completed(summary) if summary.failed_shows > 0 => {
            println!("Show could not be stored, see log for details.");
        }
        ReloadOutcome::Completed(summary) => {
            print_shows(library.get(&dir));
            println!("{} episodes loaded.", summary.episodes);
        }
    }

    Ok(())
}
