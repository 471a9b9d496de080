//! Domain events for the show library.
//!
//! Scan and load progress is published on a broadcast event bus. Receivers that
//! fall behind simply miss intermediate status lines; progress counters are
//! monotonic so the latest one received is always the most accurate.

use serde::Serialize;

/// Events published while discovering and loading shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ScanEvent {
    /// A new phase started ("Searching for TV Shows...", "Loading Episodes...").
    SearchStarted { message: String },

    /// Directory currently being scanned, relative to the root, or the name
    /// of the show being loaded. An empty path clears the status line.
    CurrentDir { path: String },

    Progress { current: usize, total: usize },

    /// Terminal event. Never sent when the reload was cancelled.
    ShowsLoaded,
}
