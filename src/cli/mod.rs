//! CLI module - Command-line interface for showarr
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// showarr - TV show library scanner
/// Finds episodes on disk and works out their season and episode numbers
#[derive(Parser)]
#[command(name = "showarr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan all library roots and load the show library
    #[command(alias = "s")]
    Scan {
        /// Discard cached shows and rescan everything
        #[arg(long, short)]
        force: bool,
        /// Print the loaded show tree
        #[arg(long)]
        tree: bool,
    },

    /// Rescan a single show directory
    #[command(alias = "r")]
    Reload {
        /// Show directory
        show_dir: String,
    },

    /// List stored shows
    #[command(alias = "ls", alias = "l")]
    List,

    /// Show how a file or directory would be identified
    #[command(alias = "i")]
    Inspect {
        /// File or directory path
        path: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
