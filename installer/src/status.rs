//! Installation state detection.
//!
//! Installation state is derived from the registry record and the files it
//! points at. A record whose target no longer contains the tool executable
//! is stale; detection deletes it (best effort) and reports not installed.

use crate::error::Result;
use crate::registry::InstallRecordStore;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};

/// Directory inside the install path holding the tool executables.
pub const PLATFORM_TOOLS_DIR: &str = "platform-tools";

/// Executable whose presence defines a complete installation.
pub const TOOL_EXECUTABLE: &str = "adb.exe";

/// Installation state of the platform tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    /// The tools are installed at the contained path.
    Installed(Utf8PathBuf),
    /// No (valid) installation exists.
    NotInstalled,
}

impl InstallStatus {
    /// Returns `true` when the tools are installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

/// Path of the tool executable inside an installation directory.
#[must_use]
pub fn tool_executable_path(install_path: &Utf8Path) -> Utf8PathBuf {
    install_path.join(PLATFORM_TOOLS_DIR).join(TOOL_EXECUTABLE)
}

/// Directory that gets prepended to the system PATH for an installation.
#[must_use]
pub fn tools_dir(install_path: &Utf8Path) -> Utf8PathBuf {
    install_path.join(PLATFORM_TOOLS_DIR)
}

/// Determines the installation state from the record store and filesystem.
///
/// A record pointing at a directory without the tool executable is deleted
/// (best effort) before reporting [`InstallStatus::NotInstalled`].
///
/// # Errors
///
/// Returns an error when the record store cannot be read.
pub fn check_status(records: &dyn InstallRecordStore) -> Result<InstallStatus> {
    match records.read_install_path()? {
        Some(path) if tool_executable_path(&path).is_file() => Ok(InstallStatus::Installed(path)),
        Some(path) => {
            debug!("installation record points at {path} but the tools are gone");
            if let Err(e) = records.delete_record() {
                warn!("could not remove stale installation record: {e}");
            }
            Ok(InstallStatus::NotInstalled)
        }
        None => Ok(InstallStatus::NotInstalled),
    }
}
