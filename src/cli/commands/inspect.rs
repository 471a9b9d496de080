//! Shows what the scanner and parser make of a path.

use super::{directory_scanner, event_bus};
use crate::cancel::CancellationToken;
use crate::config::Config;
use crate::parser::infer;
use crate::scanner::FileGroup;
use crate::scanner::disc::naming_base;
use std::path::{Path, PathBuf};

pub fn cmd_inspect(config: &Config, path: &str) -> anyhow::Result<()> {
    let path = Path::new(path);

    let groups = if path.is_dir() {
        let reporter = event_bus(config);
        let scanner = directory_scanner(config, &reporter);
        let start = path.parent().unwrap_or(path);
        scanner.scan(start, path, &CancellationToken::new())
    } else {
        vec![FileGroup::new(PathBuf::from(path))]
    };

    if groups.is_empty() {
        println!("No media files found in {}", path.display());
        return Ok(());
    }

    for group in &groups {
        let inference = infer(group.files());
        let episodes = if inference.episodes.is_empty() {
            "none".to_string()
        } else {
            inference
                .episodes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };

        println!("{}", group.primary().display());
        println!("  Name:     {}", naming_base(group.primary()));
        println!("  Season:   {}", inference.season);
        println!("  Episodes: {episodes}");
        for part in group.files().iter().skip(1) {
            println!("  Part:     {}", part.display());
        }
    }

    Ok(())
}
