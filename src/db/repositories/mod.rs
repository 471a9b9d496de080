pub mod episode;
pub mod show;
