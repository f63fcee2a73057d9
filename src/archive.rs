//! Unpacking archives into `archives/<name>/`.
//!
//! Supports `.zip`, `.tar` and `.gz`. A gzip stream holding a tarball is
//! unpacked as a tarball; any other gzip payload is written out as a single
//! file. Entries whose paths would escape the destination are skipped and
//! the rest of the archive is still unpacked.

use crate::file_category::{Category, file_extension};
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeResult, split_file_name};
use crate::normalize::Normalizer;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tar::Archive as TarArchive;
use tracing::warn;
use zip::ZipArchive;

/// Where an archive was unpacked and whether unpacking succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutcome {
    /// `root/archives/<normalized stem>`; always exists after extraction
    /// unless it could not be created.
    pub path: PathBuf,
    /// False when the archive was corrupt or in an unsupported format.
    pub extracted: bool,
}

fn extract_error(path: &Path, reason: impl ToString) -> OrganizeError {
    OrganizeError::ArchiveExtractFailed {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn is_tar(data: &[u8]) -> bool {
    data.len() >= 512 && &data[257..262] == b"ustar"
}

fn unpack_zip(archive_path: &Path, dest_dir: &Path) -> OrganizeResult<()> {
    let file = File::open(archive_path).map_err(|e| extract_error(archive_path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| extract_error(archive_path, e))?;

    for idx in 0..archive.len() {
        let mut entry = archive
            .by_index(idx)
            .map_err(|e| extract_error(archive_path, e))?;
        let Some(relative) = entry.enclosed_name() else {
            warn!(
                path = %archive_path.display(),
                entry = entry.name(),
                "Skipping archive entry outside the destination"
            );
            continue;
        };
        let dest_path = dest_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path).map_err(|e| extract_error(archive_path, e))?;
            continue;
        }
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| extract_error(archive_path, e))?;
        }
        let mut out = File::create(&dest_path).map_err(|e| extract_error(archive_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| extract_error(archive_path, e))?;
    }
    Ok(())
}

fn unpack_tar<R: Read>(reader: R, archive_path: &Path, dest_dir: &Path) -> OrganizeResult<()> {
    TarArchive::new(reader)
        .unpack(dest_dir)
        .map_err(|e| extract_error(archive_path, e))
}

fn unpack_gz(archive_path: &Path, dest_dir: &Path) -> OrganizeResult<()> {
    let file = File::open(archive_path).map_err(|e| extract_error(archive_path, e))?;
    let mut decoder = GzDecoder::new(file);
    let mut data = Vec::new();
    decoder
        .read_to_end(&mut data)
        .map_err(|e| extract_error(archive_path, e))?;

    if is_tar(&data) {
        return unpack_tar(data.as_slice(), archive_path, dest_dir);
    }

    // The gzip header may carry the original file name; only its last
    // component is trusted.
    let inner_name = decoder
        .header()
        .and_then(|h| h.filename())
        .map(|raw| String::from_utf8_lossy(raw).into_owned())
        .and_then(|name| Path::new(&name).file_name().map(|n| n.to_owned()))
        .unwrap_or_else(|| split_file_name(archive_path).0.into());

    fs::write(dest_dir.join(inner_name), data).map_err(|e| extract_error(archive_path, e))
}

/// Unpacks an archive into `dest_dir`, picking the reader from the suffix.
pub fn unpack(archive_path: &Path, dest_dir: &Path) -> OrganizeResult<()> {
    match file_extension(archive_path).as_str() {
        ".zip" => unpack_zip(archive_path, dest_dir),
        ".tar" => {
            let file = File::open(archive_path).map_err(|e| extract_error(archive_path, e))?;
            unpack_tar(file, archive_path, dest_dir)
        }
        ".gz" => unpack_gz(archive_path, dest_dir),
        other => Err(extract_error(
            archive_path,
            format!("unsupported archive format '{other}'"),
        )),
    }
}

/// Renames, unpacks and removes archive files.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Extracts `archive_path` into `root/archives/<normalized stem>/`.
    ///
    /// The archive is first renamed in place to its normalized name. It is
    /// deleted afterwards whether or not unpacking worked. Every failure is
    /// logged; the destination directory is returned regardless.
    pub fn extract(archive_path: &Path, root: &Path, normalizer: &Normalizer) -> ExtractOutcome {
        let (stem, suffix) = split_file_name(archive_path);
        let normalized_stem = normalizer.normalize(&stem);
        let renamed = archive_path.with_file_name(format!("{normalized_stem}{suffix}"));

        let source = if renamed == archive_path {
            renamed
        } else {
            match fs::rename(archive_path, &renamed) {
                Ok(()) => renamed,
                Err(e) => {
                    OrganizeError::ArchiveRenameFailed {
                        source: archive_path.to_path_buf(),
                        destination: renamed,
                        source_error: e,
                    }
                    .log();
                    archive_path.to_path_buf()
                }
            }
        };

        let dest_dir = root.join(Category::Archives.dir_name()).join(&normalized_stem);
        if let Err(e) = FileOrganizer::ensure_dir(&dest_dir) {
            e.log();
        }

        let extracted = match unpack(&source, &dest_dir) {
            Ok(()) => true,
            Err(e) => {
                e.log();
                false
            }
        };

        if let Err(e) = fs::remove_file(&source) {
            OrganizeError::ArchiveDeleteFailed {
                path: source,
                source: e,
            }
            .log();
        }

        ExtractOutcome {
            path: dest_dir,
            extracted,
        }
    }
}
