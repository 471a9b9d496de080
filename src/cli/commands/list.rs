//! List stored shows command handler

use super::open_store;
use crate::config::Config;
use crate::db::LibraryStore;

pub async fn cmd_list_shows(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let mut total = 0usize;
    for root in config.library.library_roots() {
        let shows = store.shows(&root.path).await?;
        if shows.is_empty() {
            continue;
        }

        println!("{} ({} shows)", root.path.display(), shows.len());
        println!("{:-<70}", "");

        for show in &shows {
            let episodes = match show.id {
                Some(id) => store.count_episodes_for_show(id).await.unwrap_or(0),
                None => 0,
            };
            println!("  {} [{} episodes]", show.display_name(), episodes);
        }
        println!();
        total += shows.len();
    }

    if total == 0 {
        println!("No shows stored.");
        println!();
        println!("Scan your library with: showarr scan");
    }

    Ok(())
}
