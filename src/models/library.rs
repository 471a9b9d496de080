use crate::models::show::Show;
use serde::Serialize;
use std::path::Path;

/// In-memory tree of every loaded show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShowLibrary {
    shows: Vec<Show>,
}

impl ShowLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.shows.clear();
    }

    pub fn push(&mut self, show: Show) {
        self.shows.push(show);
    }

    /// Removes the show living in `dir`, if any.
    pub fn remove_by_dir(&mut self, dir: &Path) -> Option<Show> {
        let index = self.shows.iter().position(|s| s.dir == dir)?;
        Some(self.shows.remove(index))
    }

    pub fn sort_by_dir(&mut self) {
        self.shows.sort_by(|a, b| a.dir.cmp(&b.dir));
    }

    #[must_use]
    pub fn get(&self, dir: &Path) -> Option<&Show> {
        self.shows.iter().find(|s| s.dir == dir)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Show> {
        self.shows.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Show> {
        self.shows.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }
}
