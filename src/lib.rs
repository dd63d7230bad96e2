//! dirsort - sort a folder tree by file type
//!
//! Files are classified by extension into images, video, documents, audio and
//! archives, copied (or extracted) under Cyrillic-transliterated names into a
//! timestamped results folder, and the recognized and unknown extensions are
//! reported. Source files are left in place; only emptied subdirectories are
//! removed.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod transliterate;

pub use cli::{Cli, RunOptions, RunSummary, run, run_cli};
pub use config::{CompiledFilters, ConfigError, SortConfig};
pub use error::{SortError, SortResult};
pub use file_category::{Category, ExtensionReport, FileMapper};
pub use file_organizer::Organizer;
pub use transliterate::transliterate;
