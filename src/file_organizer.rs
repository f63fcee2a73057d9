//! Moving files into category directories.
//!
//! Every operation here is best-effort: failures are logged where they happen
//! and the caller always gets an outcome back, never an error.

use crate::file_category::Category;
use crate::normalize::Normalizer;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Errors that can occur while sorting a directory.
///
/// Only `InvalidBasePath` stops a run. Every other variant is logged at its
/// origin and processing moves on to the next entry.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Failed to rename an archive before extracting it.
    ArchiveRenameFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// The archive could not be unpacked.
    ArchiveExtractFailed { path: PathBuf, reason: String },
    /// The archive could not be removed after extraction.
    ArchiveDeleteFailed { path: PathBuf, source: io::Error },
    /// A directory queued for deletion could not be removed.
    DirectoryDeleteFailed { path: PathBuf, source: io::Error },
    /// The report file could not be written.
    ReportWriteFailed { path: PathBuf, source: io::Error },
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath { path: PathBuf, source: io::Error },
}

impl OrganizeError {
    /// The path the failed operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryCreationFailed { path, .. }
            | Self::ArchiveExtractFailed { path, .. }
            | Self::ArchiveDeleteFailed { path, .. }
            | Self::DirectoryDeleteFailed { path, .. }
            | Self::ReportWriteFailed { path, .. }
            | Self::InvalidBasePath { path, .. } => path,
            Self::FileMoveFailure { source, .. } | Self::ArchiveRenameFailed { source, .. } => {
                source
            }
        }
    }

    /// Emits the error as a warning event.
    pub fn log(&self) {
        warn!(path = %self.path().display(), "{self}");
    }
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::ArchiveRenameFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to rename archive {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::ArchiveExtractFailed { path, reason } => {
                write!(f, "Failed to unpack archive {}: {}", path.display(), reason)
            }
            Self::ArchiveDeleteFailed { path, source } => {
                write!(f, "Failed to delete archive {}: {}", path.display(), source)
            }
            Self::DirectoryDeleteFailed { path, source } => {
                write!(
                    f,
                    "Failed to delete directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::ReportWriteFailed { path, source } => {
                write!(f, "Failed to save report {}: {}", path.display(), source)
            }
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DirectoryCreationFailed { source, .. }
            | Self::ArchiveDeleteFailed { source, .. }
            | Self::DirectoryDeleteFailed { source, .. }
            | Self::ReportWriteFailed { source, .. }
            | Self::InvalidBasePath { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. }
            | Self::ArchiveRenameFailed { source_error, .. } => Some(source_error),
            Self::ArchiveExtractFailed { .. } => None,
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Where a file was sent and whether it actually got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The destination the file was moved (or was meant to be moved) to.
    pub path: PathBuf,
    /// False when the move failed and the file is still at its source.
    pub moved: bool,
}

/// Splits a file name into its stem and its original final suffix.
///
/// The suffix keeps its dot and its case. Names without a usable extension
/// (`Makefile`, `.bashrc`, `trailing.`) come back whole as the stem.
///
/// ```
/// use clean_folder::file_organizer::split_file_name;
/// use std::path::Path;
///
/// assert_eq!(split_file_name(Path::new("a/Song.MP3")), ("Song".to_string(), ".MP3".to_string()));
/// assert_eq!(split_file_name(Path::new("x.tar.gz")), ("x.tar".to_string(), ".gz".to_string()));
/// assert_eq!(split_file_name(Path::new(".bashrc")), (".bashrc".to_string(), String::new()));
/// ```
pub fn split_file_name(path: &Path) -> (String, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => (
            stem.to_string_lossy().into_owned(),
            format!(".{}", ext.to_string_lossy()),
        ),
        _ => (name, String::new()),
    }
}

/// Moves files into category subdirectories of a root.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Creates `dir` (and missing parents), treating an existing directory as
    /// success so concurrent workers can race on the same category.
    pub fn ensure_dir(dir: &Path) -> OrganizeResult<()> {
        match fs::create_dir_all(dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(()),
            Err(e) => Err(OrganizeError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Moves `source` to `destination`, replacing whatever is there.
    ///
    /// Falls back to copy-and-delete when the two paths are on different
    /// filesystems.
    pub fn replace(source: &Path, destination: &Path) -> OrganizeResult<()> {
        let to_error = |e: io::Error| OrganizeError::FileMoveFailure {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        };

        match fs::rename(source, destination) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(source, destination).map_err(to_error)?;
                fs::remove_file(source).map_err(to_error)
            }
            Err(e) => Err(to_error(e)),
        }
    }

    /// Computes where a file lands inside `root/<category>/`.
    ///
    /// Without a normalizer the raw file name is kept byte for byte.
    pub fn destination(
        root: &Path,
        file_path: &Path,
        category: Category,
        normalizer: Option<&Normalizer>,
    ) -> PathBuf {
        let dir = root.join(category.dir_name());
        let Some(normalizer) = normalizer else {
            return match file_path.file_name() {
                Some(name) => dir.join(name),
                None => dir,
            };
        };

        let (stem, suffix) = split_file_name(file_path);
        dir.join(normalizer.normalize(&stem) + &suffix)
    }

    /// Moves a file into its category directory under `root`.
    ///
    /// When a normalizer is given the stem is transliterated; the suffix is
    /// kept as is. A failure to create the category directory is logged and
    /// the move is still attempted. A failed move is logged and reported
    /// through [`MoveOutcome::moved`]; the outcome path is the attempted
    /// destination either way.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use clean_folder::file_category::Category;
    /// use clean_folder::file_organizer::FileOrganizer;
    /// use clean_folder::normalize::Normalizer;
    /// use std::path::Path;
    ///
    /// let normalizer = Normalizer::new();
    /// let outcome = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/Фото.png"),
    ///     Category::Images,
    ///     Some(&normalizer),
    /// );
    /// println!("{} (moved: {})", outcome.path.display(), outcome.moved);
    /// ```
    pub fn move_to_category(
        root: &Path,
        file_path: &Path,
        category: Category,
        normalizer: Option<&Normalizer>,
    ) -> MoveOutcome {
        if let Err(e) = Self::ensure_dir(&root.join(category.dir_name())) {
            e.log();
        }

        let destination = Self::destination(root, file_path, category, normalizer);
        let moved = match Self::replace(file_path, &destination) {
            Ok(()) => true,
            Err(e) => {
                e.log();
                false
            }
        };

        MoveOutcome {
            path: destination,
            moved,
        }
    }
}
