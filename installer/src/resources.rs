//! Bundled archive discovery.
//!
//! The installer ships with two zip archives in a `data` directory next to
//! the executable: the platform-tools bundle and the USB driver package.
//! The current directory is the fallback search root for development
//! layouts.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};

/// Directory next to the executable holding the bundled archives.
pub const DATA_DIR: &str = "data";

/// File name of the platform-tools bundle.
pub const PLATFORM_TOOLS_ARCHIVE: &str = "platform-tools-latest-windows.zip";

/// File name of the USB driver package.
pub const USB_DRIVER_ARCHIVE: &str = "usb_driver_r13-windows.zip";

/// Resolved locations of both bundled archives.
#[derive(Debug, Clone)]
pub struct BundledArchives {
    /// Path to the platform-tools bundle.
    pub platform_tools: Utf8PathBuf,
    /// Path to the USB driver package.
    pub usb_driver: Utf8PathBuf,
}

/// Locates both bundled archives under the standard search roots.
///
/// # Errors
///
/// Returns [`InstallerError::ResourceMissing`] naming the first archive that
/// could not be found.
pub fn locate_bundled_archives() -> Result<BundledArchives> {
    let roots = search_roots();
    Ok(BundledArchives {
        platform_tools: resource_path(&roots, PLATFORM_TOOLS_ARCHIVE)?,
        usb_driver: resource_path(&roots, USB_DRIVER_ARCHIVE)?,
    })
}

/// Finds a bundled archive by name under `roots`.
///
/// # Errors
///
/// Returns [`InstallerError::ResourceMissing`] when the archive exists under
/// none of the roots.
pub fn resource_path(roots: &[Utf8PathBuf], name: &'static str) -> Result<Utf8PathBuf> {
    roots
        .iter()
        .map(|root| root.join(DATA_DIR).join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| InstallerError::ResourceMissing {
            name,
            search_root: roots
                .first()
                .map_or_else(|| Utf8PathBuf::from(DATA_DIR), |root| root.join(DATA_DIR)),
        })
}

/// Search roots for bundled resources: the executable's directory, then the
/// current directory.
#[must_use]
pub fn search_roots() -> Vec<Utf8PathBuf> {
    let mut roots = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            if let Ok(dir) = Utf8PathBuf::try_from(dir.to_owned()) {
                roots.push(dir);
            }
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Ok(cwd) = Utf8PathBuf::try_from(cwd) {
            roots.push(cwd);
        }
    }
    roots
}

impl BundledArchives {
    /// The archives in extraction order with their display names.
    #[must_use]
    pub fn in_order(&self) -> [(&'static str, &Utf8Path); 2] {
        [
            (PLATFORM_TOOLS_ARCHIVE, self.platform_tools.as_path()),
            (USB_DRIVER_ARCHIVE, self.usb_driver.as_path()),
        ]
    }
}
