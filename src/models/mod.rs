pub mod episode;
pub mod library;
pub mod show;

pub use episode::Episode;
pub use library::ShowLibrary;
pub use show::{Season, Show};
