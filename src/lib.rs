//! clean-folder - sort a messy directory tree into category folders
//!
//! This library classifies files by extension, moves them into per-category
//! subfolders with transliterated names, unpacks archives, removes the folders
//! left empty and writes a report of where everything went.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod normalize;
pub mod output;
pub mod report;
pub mod sorter;
pub mod stats;

pub use archive::{ArchiveExtractor, ExtractOutcome};
pub use config::{CompiledFilters, Config, ConfigError};
pub use file_category::{Category, FileMapper};
pub use file_organizer::{FileOrganizer, MoveOutcome, OrganizeError};
pub use normalize::Normalizer;
pub use sorter::{RunContext, RunSummary, SortOptions, sort_folder};
pub use stats::{Stats, StatsStore};

pub use cli::{Cli, RunOutcome, run_cli};
