pub mod import;
pub use import::{
    ImportError, LibraryRoot, ReloadOutcome, ReloadSummary, ShowImportPipeline,
};
