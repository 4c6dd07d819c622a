//! Bundled archive extraction.
//!
//! Extracts the zip archives shipped next to the installer into the
//! installation directory, with path traversal protection to prevent
//! zip-slip attacks.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Trait for extracting bundled archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor: Sync {
    /// Extract the archive at `archive_path` into `dest_dir`, creating any
    /// directories the entries need.
    ///
    /// Returns the number of file entries that were written.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry attempts to
    /// escape the destination directory.
    /// Returns [`ExtractionError::EmptyArchive`] if no files are found.
    /// Returns [`ExtractionError::Archive`] on malformed archives and
    /// [`ExtractionError::Io`] on I/O failures.
    fn extract(&self, archive_path: &Utf8Path, dest_dir: &Utf8Path)
    -> Result<usize, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive could not be read as a zip file.
    #[error("invalid zip archive: {0}")]
    Archive(String),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no files.
    #[error("archive contains no files")]
    EmptyArchive,
}

/// Default extractor using the `zip` crate.
///
/// Validates each entry path before extraction to guard against path
/// traversal attacks (zip-slip).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<usize, ExtractionError> {
        let file = fs::File::open(archive_path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| ExtractionError::Archive(e.to_string()))?;
        let mut extracted = 0;

        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|e| ExtractionError::Archive(e.to_string()))?;
            let entry_path = Utf8PathBuf::from(entry.name());

            validate_entry_path(&entry_path)?;

            let dest_path = dest_dir.join(&entry_path);
            if entry.is_dir() {
                fs::create_dir_all(&dest_path)?;
                continue;
            }

            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&dest_path)?;
            io::copy(&mut entry, &mut out)?;
            extracted += 1;
        }

        if extracted == 0 {
            return Err(ExtractionError::EmptyArchive);
        }

        Ok(extracted)
    }
}

/// Validate that a zip entry path does not escape the destination directory
/// via `..` components or absolute paths.
fn validate_entry_path(path: &Utf8Path) -> Result<(), ExtractionError> {
    if path.is_absolute() || path.as_str().starts_with('/') {
        return Err(ExtractionError::PathTraversal {
            path: path.to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Utf8Component::ParentDir | Utf8Component::Prefix(_)) {
            return Err(ExtractionError::PathTraversal {
                path: path.to_string(),
            });
        }
    }
    Ok(())
}
