//! Error types for the adbsetup installer CLI.
//!
//! This module defines semantic error variants that provide actionable
//! guidance to users when an action fails. Each error includes recovery hints
//! where applicable.

use crate::extraction::ExtractionError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during installation or removal.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The platform tools are already installed.
    #[error("platform tools already installed at {path}; run `adbsetup-installer uninstall` first")]
    AlreadyInstalled {
        /// Path recorded for the existing installation.
        path: Utf8PathBuf,
    },

    /// The platform tools are not installed.
    #[error("platform tools are not installed; nothing to remove")]
    NotInstalled,

    /// The process lacks the administrative rights needed for HKLM writes.
    #[error("administrator privileges are required; re-run from an elevated prompt")]
    ElevationRequired,

    /// The system stores this installer mutates only exist on Windows.
    #[error("this installer manages Windows registry state and only runs on Windows")]
    UnsupportedPlatform,

    /// No installation directory was given and no default could be derived.
    #[error("could not determine an installation directory: {reason}")]
    InstallDirUnresolved {
        /// Description of why resolution failed.
        reason: String,
    },

    /// A bundled archive was not found at any of the expected locations.
    #[error("bundled archive {name} not found under {search_root}")]
    ResourceMissing {
        /// File name of the missing archive.
        name: &'static str,
        /// First directory that was searched for the archive.
        search_root: Utf8PathBuf,
    },

    /// Extracting a bundled archive failed.
    #[error("failed to extract {archive}")]
    Extraction {
        /// File name of the archive being extracted.
        archive: String,
        /// The underlying extraction failure.
        #[source]
        source: ExtractionError,
    },

    /// The installation directory exists but is not writable.
    #[error("installation directory {path} is not writable: {reason}")]
    TargetNotWritable {
        /// Path to the non-writable directory.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// A registry operation on the installation record failed.
    #[error("registry {operation} failed: {reason}")]
    Registry {
        /// The registry operation that failed (read, write, delete).
        operation: &'static str,
        /// Description of the failure.
        reason: String,
    },

    /// Reading or rewriting the system PATH value failed.
    #[error("system PATH update failed: {reason}")]
    PathUpdate {
        /// Description of the failure.
        reason: String,
    },

    /// An external command could not be spawned.
    #[error("failed to run {command}")]
    CommandSpawn {
        /// Name of the command that could not be spawned.
        command: &'static str,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The background worker executing the action sequence panicked.
    #[error("the installer worker thread terminated unexpectedly")]
    WorkerPanicked,

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
