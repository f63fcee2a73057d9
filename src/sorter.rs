//! The sorting pass over a directory tree.
//!
//! A run enumerates everything under the root, dispatches files to a worker
//! pool (move or unpack, then record), and once the pool is done removes the
//! directories that were emptied, deepest first.

use crate::archive::ArchiveExtractor;
use crate::config::{CompiledFilters, Config, DEFAULT_WORKERS};
use crate::file_category::{Category, FileMapper};
use crate::file_organizer::{FileOrganizer, OrganizeError};
use crate::normalize::Normalizer;
use crate::output::OutputFormatter;
use crate::report::{build_report, save_report};
use crate::stats::{Stats, StatsStore};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Options that shape a single run.
#[derive(Debug, Clone)]
pub struct SortOptions {
    /// Worker pool size.
    pub workers: usize,
    /// Show a progress bar while dispatching.
    pub show_progress: bool,
    /// Report file name under the root.
    pub report_file: String,
    /// User exclusions on top of the built-in ones.
    pub filters: CompiledFilters,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            show_progress: false,
            report_file: crate::config::DEFAULT_REPORT_FILE.to_string(),
            filters: CompiledFilters::default(),
        }
    }
}

impl SortOptions {
    /// Builds options from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, crate::config::ConfigError> {
        Ok(Self {
            workers: config.run.workers,
            show_progress: false,
            report_file: config.run.report_file.clone(),
            filters: config.compile_filters()?,
        })
    }
}

/// An entry found while walking the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub depth: usize,
}

/// Orders entries so deeper paths come first, ties broken by descending
/// path. Children therefore always precede their parents.
pub fn deepest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| (b.depth, &b.path).cmp(&(a.depth, &a.path)));
}

/// What happened to one dispatched entry.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Dispatch {
    Skipped,
    File { category: Category, succeeded: bool },
    Directory(Entry),
}

/// Counters and aggregates returned by a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Where every processed file ended up.
    pub stats: Stats,
    /// Number of files dispatched, per category in declaration order.
    pub files_per_category: Vec<(Category, usize)>,
    /// Files that could not be moved.
    pub failed_moves: usize,
    /// Archives that could not be unpacked.
    pub failed_extractions: usize,
    /// Emptied directories that were removed.
    pub removed_dirs: usize,
    /// Directories that could not be removed.
    pub kept_dirs: usize,
    /// Location of the report file.
    pub report_path: PathBuf,
    /// False when the report had to be dumped to stdout instead.
    pub report_saved: bool,
}

impl RunSummary {
    /// Total number of files dispatched.
    pub fn total_files(&self) -> usize {
        self.files_per_category.iter().map(|(_, n)| n).sum()
    }
}

/// Everything one run needs; built at the start and dropped at the end.
pub struct RunContext {
    root: PathBuf,
    mapper: FileMapper,
    normalizer: Normalizer,
    excluded: Vec<PathBuf>,
    report_path: PathBuf,
    filters: CompiledFilters,
    stats: StatsStore,
}

impl RunContext {
    /// Creates a context for sorting `root` with the built-in tables.
    pub fn new(root: &Path, options: &SortOptions) -> Self {
        Self::with_tables(root, options, FileMapper::default(), Normalizer::default())
    }

    /// Creates a context with explicit category and transliteration tables.
    pub fn with_tables(
        root: &Path,
        options: &SortOptions,
        mapper: FileMapper,
        normalizer: Normalizer,
    ) -> Self {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let excluded = Category::ALL
            .iter()
            .map(|category| root.join(category.dir_name()))
            .collect();
        let report_path = root.join(&options.report_file);

        Self {
            root,
            mapper,
            normalizer,
            excluded,
            report_path,
            filters: options.filters.clone(),
            stats: StatsStore::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Whether a path is a category folder, lies inside one, is the report
    /// file, or matches a user exclusion.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if path == self.report_path || self.excluded.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }

        match path.strip_prefix(&self.root) {
            Ok(relative) => self.filters.is_excluded(relative),
            Err(_) => false,
        }
    }

    /// Lists every non-excluded entry below the root, deepest first.
    ///
    /// Excluded directories are not descended into. Unreadable entries are
    /// logged and left out.
    pub fn enumerate(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e.path()))
            .filter_map(|result| match result {
                Ok(e) => Some(Entry {
                    is_dir: e.file_type().is_dir(),
                    depth: e.depth(),
                    path: e.into_path(),
                }),
                Err(e) => {
                    let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                    warn!(path = %path, "Failed to read entry: {e}");
                    None
                }
            })
            .collect();

        deepest_first(&mut entries);
        entries
    }

    fn dispatch(&self, entry: &Entry) -> Dispatch {
        if self.is_excluded(&entry.path) {
            return Dispatch::Skipped;
        }
        if entry.is_dir {
            return Dispatch::Directory(entry.clone());
        }

        let category = self.mapper.categorize(&entry.path, &self.stats);
        let (result_path, succeeded) = if category == Category::Archives {
            let outcome = ArchiveExtractor::extract(&entry.path, &self.root, &self.normalizer);
            (outcome.path, outcome.extracted)
        } else {
            let normalizer = category.normalizes_names().then_some(&self.normalizer);
            let outcome =
                FileOrganizer::move_to_category(&self.root, &entry.path, category, normalizer);
            (outcome.path, outcome.moved)
        };

        self.stats
            .record(category, result_path.to_string_lossy().into_owned());
        Dispatch::File {
            category,
            succeeded,
        }
    }

    fn dispatch_all(
        &self,
        entries: &[Entry],
        workers: usize,
        progress: &ProgressBar,
    ) -> Vec<Dispatch> {
        let run = |entry: &Entry| {
            let result = self.dispatch(entry);
            progress.inc(1);
            result
        };

        match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(|| entries.par_iter().map(run).collect()),
            Err(e) => {
                warn!("Failed to start worker pool, sorting sequentially: {e}");
                entries.iter().map(run).collect()
            }
        }
    }

    /// Removes directories in the given order, leaving any that still hold
    /// something. Returns `(removed, kept)`.
    fn delete_dirs(&self, dirs: &[Entry]) -> (usize, usize) {
        let mut removed = 0;
        let mut kept = 0;
        for dir in dirs {
            match fs::remove_dir(&dir.path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    OrganizeError::DirectoryDeleteFailed {
                        path: dir.path.clone(),
                        source: e,
                    }
                    .log();
                    kept += 1;
                }
            }
        }
        (removed, kept)
    }

    /// Runs the full pass: dispatch, directory cleanup, report.
    pub fn run(self, options: &SortOptions) -> RunSummary {
        let entries = self.enumerate();
        debug!(
            root = %self.root.display(),
            entries = entries.len(),
            workers = options.workers,
            "Starting sort"
        );

        let progress = if options.show_progress {
            OutputFormatter::create_progress_bar(entries.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        let dispatched = self.dispatch_all(&entries, options.workers.max(1), &progress);
        progress.finish_and_clear();

        let mut summary = RunSummary {
            files_per_category: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            ..RunSummary::default()
        };
        let mut pending = Vec::new();
        for result in dispatched {
            match result {
                Dispatch::Skipped => {}
                Dispatch::Directory(entry) => pending.push(entry),
                Dispatch::File {
                    category,
                    succeeded,
                } => {
                    if let Some((_, count)) =
                        summary.files_per_category.iter_mut().find(|(c, _)| *c == category)
                    {
                        *count += 1;
                    }
                    match (category, succeeded) {
                        (_, true) => {}
                        (Category::Archives, false) => summary.failed_extractions += 1,
                        (_, false) => summary.failed_moves += 1,
                    }
                }
            }
        }

        deepest_first(&mut pending);
        let (removed, kept) = self.delete_dirs(&pending);
        summary.removed_dirs = removed;
        summary.kept_dirs = kept;

        let stats = self.stats.into_stats();
        let report = build_report(&stats);
        summary.report_saved = match save_report(&report, &self.report_path) {
            Ok(()) => true,
            Err(e) => {
                e.log();
                OutputFormatter::plain(&report.join("\n"));
                false
            }
        };
        summary.report_path = self.report_path;
        summary.stats = stats;
        summary
    }
}

/// Sorts `root` in place and writes its report.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::sorter::{SortOptions, sort_folder};
/// use std::path::Path;
///
/// let summary = sort_folder(Path::new("/path/to/Downloads"), &SortOptions::default());
/// println!("{} files sorted", summary.total_files());
/// ```
pub fn sort_folder(root: &Path, options: &SortOptions) -> RunSummary {
    RunContext::new(root, options).run(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(path: &str, depth: usize) -> Entry {
        Entry {
            path: PathBuf::from(path),
            is_dir: false,
            depth,
        }
    }

    #[test]
    fn test_deepest_first_puts_children_before_parents() {
        let mut entries = vec![
            entry("/r/a", 1),
            entry("/r/a/b/c.txt", 3),
            entry("/r/z.txt", 1),
            entry("/r/a/b", 2),
            entry("/r/a-long-sibling", 1),
        ];
        deepest_first(&mut entries);

        let order: Vec<_> = entries.iter().map(|e| e.path.to_string_lossy().into_owned()).collect();
        assert_eq!(
            order,
            vec!["/r/a/b/c.txt", "/r/a/b", "/r/z.txt", "/r/a-long-sibling", "/r/a"]
        );
    }

    #[test]
    fn test_exclusion_set() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let ctx = RunContext::new(root, &SortOptions::default());

        assert!(ctx.is_excluded(&ctx.root().join("audio")));
        assert!(ctx.is_excluded(&ctx.root().join("archives").join("x").join("y.txt")));
        assert!(ctx.is_excluded(&ctx.root().join("report.txt")));
        assert!(!ctx.is_excluded(&ctx.root().join("audiobooks")));
        assert!(!ctx.is_excluded(&ctx.root().join("report.txt.bak")));
        assert!(!ctx.is_excluded(&ctx.root().join("nested").join("audio")));
    }

    #[test]
    fn test_enumerate_skips_category_folders() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("images")).expect("mkdir");
        fs::write(root.join("images").join("old.png"), "png").expect("write");
        fs::create_dir_all(root.join("inbox").join("deep")).expect("mkdir");
        fs::write(root.join("inbox").join("deep").join("new.png"), "png").expect("write");
        fs::write(root.join("report.txt"), "old report").expect("write");

        let ctx = RunContext::new(root, &SortOptions::default());
        let entries = ctx.enumerate();
        let names: Vec<_> = entries
            .iter()
            .map(|e| e.path.strip_prefix(ctx.root()).expect("under root").to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("inbox/deep/new.png"),
                PathBuf::from("inbox/deep"),
                PathBuf::from("inbox"),
            ]
        );
        assert!(entries[1].is_dir && !entries[0].is_dir);
    }

    #[test]
    fn test_run_counts_and_cleans_up() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a").join("b")).expect("mkdir");
        fs::write(root.join("a").join("b").join("song.mp3"), "mp3").expect("write");
        fs::write(root.join("a").join("notes"), "n").expect("write");

        let options = SortOptions {
            workers: 2,
            ..SortOptions::default()
        };
        let summary = sort_folder(root, &options);

        assert_eq!(summary.total_files(), 2);
        assert_eq!(summary.failed_moves, 0);
        assert_eq!(summary.removed_dirs, 2);
        assert_eq!(summary.kept_dirs, 0);
        assert!(summary.report_saved);
        assert!(root.join("audio").join("song.mp3").exists());
        assert!(root.join("other").join("notes").exists());
        assert!(!root.join("a").exists());
    }
}
