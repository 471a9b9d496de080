//! Show import pipeline.
//!
//! Builds the in-memory show library from the configured roots. Roots are
//! either rescanned from disk or, when they have cached shows and are not set
//! to auto reload, restored from the store. Freshly scanned shows are
//! persisted one transaction per show.

use crate::cancel::CancellationToken;
use crate::constants::progress::STATUS_REFRESH_EPISODES;
use crate::db::LibraryStore;
use crate::metadata::{LoadMode, MetadataLoader};
use crate::models::{Episode, Show, ShowLibrary};
use crate::parser::infer;
use crate::progress::{ProgressCounter, ProgressReporter};
use crate::scanner::{DirectoryScanner, FileGroup, RootContents};
use futures::StreamExt;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Store(String),

    #[error("Scan task failed: {0}")]
    Scan(String),
}

impl From<anyhow::Error> for ImportError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

impl From<tokio::task::JoinError> for ImportError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Scan(err.to_string())
    }
}

/// A configured library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoot {
    pub path: PathBuf,
    /// Rescan on every reload instead of restoring cached shows.
    pub auto_reload: bool,
}

impl LibraryRoot {
    pub fn new(path: impl Into<PathBuf>, auto_reload: bool) -> Self {
        Self {
            path: path.into(),
            auto_reload,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReloadSummary {
    pub shows: usize,
    pub episodes: usize,
    /// File groups no episode number could be inferred for.
    pub unmatched_groups: usize,
    /// Shows that could not be persisted and were left out.
    pub failed_shows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Completed(ReloadSummary),
    /// Cancelled before finishing; the library holds whatever was loaded.
    Aborted,
}

/// Episodes built from one show's file groups, before metadata is loaded.
struct PlannedShow {
    dir: PathBuf,
    episodes: Vec<Episode>,
    unmatched_groups: usize,
}

pub struct ShowImportPipeline {
    roots: Vec<LibraryRoot>,
    store: Arc<dyn LibraryStore>,
    metadata: Arc<dyn MetadataLoader>,
    scanner: DirectoryScanner,
    reporter: ProgressReporter,
    concurrency: usize,
    show_missing_episodes: bool,
    library: ShowLibrary,
}

impl ShowImportPipeline {
    /// Roots that are not existing directories are dropped. The rest are
    /// resolved through the scanner's directory source, so show directories
    /// found under them use the same form as paths handed to
    /// [`Self::reload_show`].
    pub fn new(
        roots: Vec<LibraryRoot>,
        store: Arc<dyn LibraryStore>,
        metadata: Arc<dyn MetadataLoader>,
        scanner: DirectoryScanner,
        reporter: ProgressReporter,
    ) -> Self {
        let roots = roots
            .into_iter()
            .filter(|root| {
                let exists = scanner.source().is_dir(&root.path);
                if exists {
                    debug!(path = %root.path.display(), "Adding show directory");
                } else {
                    warn!(path = %root.path.display(), "Show directory does not exist, ignoring");
                }
                exists
            })
            .map(|root| LibraryRoot {
                path: scanner.source().resolve(&root.path),
                ..root
            })
            .collect();

        Self {
            roots,
            store,
            metadata,
            scanner,
            reporter,
            concurrency: std::thread::available_parallelism().map_or(4, usize::from),
            show_missing_episodes: false,
            library: ShowLibrary::new(),
        }
    }

    /// Upper bound on concurrent episode metadata loads.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Default for newly discovered shows; cached shows keep their own flag.
    #[must_use]
    pub const fn with_show_missing_episodes(mut self, enabled: bool) -> Self {
        self.show_missing_episodes = enabled;
        self
    }

    #[must_use]
    pub fn roots(&self) -> &[LibraryRoot] {
        &self.roots
    }

    #[must_use]
    pub const fn library(&self) -> &ShowLibrary {
        &self.library
    }

    /// The configured root owning `dir`: the longest root path `dir` lives
    /// under. Matching is done on whole path components.
    #[must_use]
    pub fn resolve_root(&self, dir: &Path) -> Option<&Path> {
        let dir = self.scanner.source().resolve(dir);
        self.roots
            .iter()
            .filter(|root| dir.starts_with(&root.path))
            .fold(None, |best: Option<&LibraryRoot>, root| match best {
                Some(b) if b.path.components().count() >= root.path.components().count() => {
                    Some(b)
                }
                _ => Some(root),
            })
            .map(|root| root.path.as_path())
    }

    /// Rebuilds the whole library.
    ///
    /// With `force` every cached show is discarded and all roots are
    /// rescanned.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Store`] when clearing or querying the store
    /// fails, and [`ImportError::Scan`] when a scan task panics. Failing to
    /// persist a single show is not an error; it is counted in the summary.
    #[allow(clippy::too_many_lines)]
    pub async fn reload(
        &mut self,
        force: bool,
        cancel: &CancellationToken,
    ) -> Result<ReloadOutcome, ImportError> {
        cancel.reset();
        let start = Instant::now();

        info!(
            event = "library_reload_started",
            force,
            roots = self.roots.len(),
            "Reloading TV show library"
        );

        if force {
            self.store.clear_all().await?;
        }

        self.reporter.search_started("Searching for TV Shows...");
        self.library.clear();

        let mut contents = RootContents::new();
        let mut cached = Vec::new();

        for root in self.roots.clone() {
            if cancel.is_cancelled() {
                return Ok(self.aborted());
            }

            let stored = self.store.shows(&root.path).await?;
            if root.auto_reload || force || stored.is_empty() {
                self.store.clear_root(&root.path).await?;
                contents.extend(self.scan_root(&root.path, cancel).await?);
            } else {
                debug!(
                    root = %root.path.display(),
                    shows = stored.len(),
                    "Using cached shows"
                );
                cached.extend(stored);
            }
        }
        self.reporter.current_dir("");

        if cancel.is_cancelled() {
            return Ok(self.aborted());
        }

        self.reporter.search_started("Loading TV Shows...");

        let planned: Vec<PlannedShow> = contents
            .into_iter()
            .map(|(dir, groups)| plan_show(dir, groups))
            .collect();

        let cached_episodes = usize::try_from(self.store.episode_count().await?).unwrap_or(usize::MAX);
        let fresh_episodes: usize = planned.iter().map(|p| p.episodes.len()).sum();
        let mut counter = ProgressCounter::new(cached_episodes.saturating_add(fresh_episodes));
        let mut summary = ReloadSummary::default();

        for plan in planned {
            if cancel.is_cancelled() {
                return Ok(self.aborted());
            }

            summary.unmatched_groups += plan.unmatched_groups;
            let root = self.owning_root(&plan.dir);

            let mut show = Show::new(&plan.dir, &root);
            show.show_missing_episodes = self.show_missing_episodes;
            self.load_show_metadata(&mut show, LoadMode::Reload).await;
            self.reporter.current_dir(show.display_name());

            let mut episodes = plan.episodes;
            self.load_episode_metadata(&mut episodes, LoadMode::Reload).await;

            if !self.persist(&mut show, &root, &mut episodes).await {
                summary.failed_shows += 1;
                for _ in &episodes {
                    counter.advance(&self.reporter);
                }
                continue;
            }

            for episode in episodes {
                show.add_episode(episode);
                counter.advance(&self.reporter);
                summary.episodes += 1;
            }
            self.library.push(show);
        }

        self.reporter.current_dir("");

        for mut show in cached {
            if cancel.is_cancelled() {
                return Ok(self.aborted());
            }

            self.load_show_metadata(&mut show, LoadMode::KeepExisting).await;

            let mut episodes = match show.id {
                Some(id) => self.store.episodes(id).await?,
                None => Vec::new(),
            };
            self.load_episode_metadata(&mut episodes, LoadMode::KeepExisting)
                .await;

            for episode in episodes {
                show.add_episode(episode);
                summary.episodes += 1;
                if counter.advance(&self.reporter) % STATUS_REFRESH_EPISODES == 0 {
                    self.reporter.current_dir("");
                }
            }
            self.library.push(show);
        }

        self.finish_library();

        if cancel.is_cancelled() {
            return Ok(self.aborted());
        }

        summary.shows = self.library.len();
        self.reporter.shows_loaded();

        info!(
            event = "library_reload_finished",
            shows = summary.shows,
            episodes = summary.episodes,
            unmatched_groups = summary.unmatched_groups,
            failed_shows = summary.failed_shows,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "TV show library loaded"
        );

        Ok(ReloadOutcome::Completed(summary))
    }

    /// Rescans a single show directory and replaces it in the library.
    ///
    /// # Errors
    ///
    /// Same as [`Self::reload`].
    pub async fn reload_show(
        &mut self,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<ReloadOutcome, ImportError> {
        cancel.reset();
        let start = Instant::now();

        let dir = self.scanner.source().resolve(dir);
        let dir = dir.as_path();

        info!(event = "show_reload_started", path = %dir.display(), "Reloading show");

        self.store.clear_show(dir).await?;
        self.reporter.search_started("Searching for Episodes...");
        self.library.remove_by_dir(dir);

        let root = self.owning_root(dir);

        let scanner = self.scanner.clone();
        let scan_cancel = cancel.clone();
        let (scan_root, scan_dir) = (root.clone(), dir.to_path_buf());
        let groups =
            tokio::task::spawn_blocking(move || scanner.scan(&scan_root, &scan_dir, &scan_cancel))
                .await?;

        if cancel.is_cancelled() {
            return Ok(self.aborted());
        }

        let mut show = Show::new(dir, &root);
        show.show_missing_episodes = self.show_missing_episodes;
        self.load_show_metadata(&mut show, LoadMode::Reload).await;

        self.reporter.search_started("Loading Episodes...");
        self.reporter.current_dir(show.display_name());

        let plan = plan_show(dir.to_path_buf(), groups);
        let mut summary = ReloadSummary {
            unmatched_groups: plan.unmatched_groups,
            ..ReloadSummary::default()
        };
        let mut counter = ProgressCounter::new(plan.episodes.len());

        let mut episodes = plan.episodes;
        self.load_episode_metadata(&mut episodes, LoadMode::Reload).await;

        if cancel.is_cancelled() {
            return Ok(self.aborted());
        }

        if self.persist(&mut show, &root, &mut episodes).await {
            for episode in episodes {
                show.add_episode(episode);
                counter.advance(&self.reporter);
                summary.episodes += 1;
                tokio::task::yield_now().await;
            }
            self.library.push(show);
            summary.shows = 1;
        } else {
            summary.failed_shows = 1;
        }

        self.finish_library();
        self.reporter.shows_loaded();

        info!(
            event = "show_reload_finished",
            path = %dir.display(),
            episodes = summary.episodes,
            unmatched_groups = summary.unmatched_groups,
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Show reloaded"
        );

        Ok(ReloadOutcome::Completed(summary))
    }

    fn aborted(&self) -> ReloadOutcome {
        info!(
            event = "library_reload_aborted",
            shows = self.library.len(),
            "Reload cancelled"
        );
        ReloadOutcome::Aborted
    }

    fn owning_root(&self, dir: &Path) -> PathBuf {
        self.resolve_root(dir).map_or_else(
            || {
                warn!(path = %dir.display(), "Show is not inside a configured root");
                PathBuf::new()
            },
            Path::to_path_buf,
        )
    }

    async fn scan_root(
        &self,
        root: &Path,
        cancel: &CancellationToken,
    ) -> Result<RootContents, ImportError> {
        let scanner = self.scanner.clone();
        let cancel = cancel.clone();
        let root = root.to_path_buf();

        Ok(tokio::task::spawn_blocking(move || scanner.scan_root(&root, &cancel)).await?)
    }

    async fn load_show_metadata(&self, show: &mut Show, mode: LoadMode) {
        if let Err(e) = self.metadata.load_show(show, mode).await {
            warn!(path = %show.dir.display(), error = %e, "Failed to load show metadata");
        }
    }

    /// Loads metadata for a batch of episodes concurrently and waits for all
    /// of them.
    async fn load_episode_metadata(&self, episodes: &mut [Episode], mode: LoadMode) {
        let loader = &self.metadata;

        futures::stream::iter(episodes.iter_mut())
            .map(|episode| async move {
                if let Err(e) = loader.load_episode(episode, mode).await {
                    warn!(episode = %episode.label(), error = %e, "Failed to load episode metadata");
                }
            })
            .buffer_unordered(self.concurrency)
            .collect::<Vec<()>>()
            .await;
    }

    /// Stores the show and its episodes, filling in their ids. Returns false
    /// when nothing could be stored.
    async fn persist(&self, show: &mut Show, root: &Path, episodes: &mut [Episode]) -> bool {
        match self.store.save_show(show, root, episodes).await {
            Ok((show_id, episode_ids)) => {
                show.id = Some(show_id);
                for (episode, id) in episodes.iter_mut().zip(episode_ids) {
                    episode.id = Some(id);
                }
                true
            }
            Err(e) => {
                error!(
                    event = "show_persist_failed",
                    path = %show.dir.display(),
                    error = %e,
                    "Failed to store show, skipping"
                );
                false
            }
        }
    }

    fn finish_library(&mut self) {
        for show in self.library.iter_mut().filter(|s| s.show_missing_episodes) {
            show.fill_missing_episodes();
        }
        self.library.sort_by_dir();
    }
}

/// Turns file groups into episodes, one per inferred episode number.
fn plan_show(dir: PathBuf, groups: Vec<FileGroup>) -> PlannedShow {
    let mut episodes = Vec::new();
    let mut unmatched_groups = 0;

    for group in groups {
        let inference = infer(group.files());
        if inference.episodes.is_empty() {
            warn!(
                path = %group.primary().display(),
                "No episode number found, skipping"
            );
            unmatched_groups += 1;
            continue;
        }

        for number in inference.episodes {
            episodes.push(Episode::new(
                &dir,
                group.files().to_vec(),
                inference.season,
                number,
            ));
        }
    }

    PlannedShow {
        dir,
        episodes,
        unmatched_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EpisodeNumber, SeasonNumber};
    use crate::metadata::NfoMetadataLoader;
    use crate::scanner::MediaFilter;
    use crate::scanner::fs::memory::MemoryDirectory;
    use tokio::sync::broadcast;

    struct UnusedStore;

    #[async_trait::async_trait]
    impl LibraryStore for UnusedStore {
        async fn clear_all(&self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn clear_root(&self, _: &Path) -> anyhow::Result<()> {
            Ok(())
        }
        async fn clear_show(&self, _: &Path) -> anyhow::Result<bool> {
            Ok(false)
        }
        async fn save_show(
            &self,
            _: &Show,
            _: &Path,
            _: &[Episode],
        ) -> anyhow::Result<(crate::domain::ShowId, Vec<crate::domain::EpisodeId>)> {
            anyhow::bail!("not available")
        }
        async fn shows(&self, _: &Path) -> anyhow::Result<Vec<Show>> {
            Ok(Vec::new())
        }
        async fn episodes(&self, _: crate::domain::ShowId) -> anyhow::Result<Vec<Episode>> {
            Ok(Vec::new())
        }
        async fn episode_count(&self) -> anyhow::Result<u64> {
            Ok(0)
        }
    }

    fn pipeline(roots: &[&str], files: &[&str]) -> ShowImportPipeline {
        let (tx, _) = broadcast::channel(16);
        let reporter = ProgressReporter::new(tx);
        let scanner = DirectoryScanner::new(
            Arc::new(MemoryDirectory::new(files.iter().copied())),
            MediaFilter::default(),
            reporter.clone(),
        );
        ShowImportPipeline::new(
            roots.iter().map(|r| LibraryRoot::new(*r, false)).collect(),
            Arc::new(UnusedStore),
            Arc::new(NfoMetadataLoader),
            scanner,
            reporter,
        )
    }

    #[test]
    fn test_resolve_root_prefers_longest_prefix() {
        let pipeline = pipeline(
            &["/media", "/media/tv"],
            &["/media/tv/showX/a.mkv", "/media/movies/b.mkv"],
        );

        assert_eq!(
            pipeline.resolve_root(Path::new("/media/tv/showX")),
            Some(Path::new("/media/tv"))
        );
        assert_eq!(
            pipeline.resolve_root(Path::new("/media/movies")),
            Some(Path::new("/media"))
        );
        assert_eq!(pipeline.resolve_root(Path::new("/other/show")), None);
    }

    #[test]
    fn test_resolve_root_matches_whole_components() {
        let pipeline = pipeline(&["/media/tv"], &["/media/tv/a.mkv", "/media/tv2/b.mkv"]);
        assert_eq!(pipeline.resolve_root(Path::new("/media/tv2/Show")), None);
    }

    #[test]
    fn test_missing_roots_are_dropped() {
        let pipeline = pipeline(&["/tv", "/gone"], &["/tv/Show/a.mkv"]);
        assert_eq!(pipeline.roots(), &[LibraryRoot::new("/tv", false)]);
    }

    #[test]
    fn test_plan_show_expands_multi_episode_groups() {
        let groups = vec![
            FileGroup::new(PathBuf::from("/tv/Show/Show.S01E05E06.mkv")),
            FileGroup::new(PathBuf::from("/tv/Show/Behind the scenes.mkv")),
            FileGroup::new(PathBuf::from("/tv/Show/Show.S02E01.mkv")),
        ];

        let plan = plan_show(PathBuf::from("/tv/Show"), groups);
        assert_eq!(plan.unmatched_groups, 1);

        let numbers: Vec<_> = plan
            .episodes
            .iter()
            .map(|e| (e.season, e.episode))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (SeasonNumber::new(1), EpisodeNumber::new(5)),
                (SeasonNumber::new(1), EpisodeNumber::new(6)),
                (SeasonNumber::new(2), EpisodeNumber::new(1)),
            ]
        );
        assert_eq!(plan.episodes[0].files, plan.episodes[1].files);
        assert!(plan.episodes.iter().all(|e| e.show_dir == Path::new("/tv/Show")));
    }
}
