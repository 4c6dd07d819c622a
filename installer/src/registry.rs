//! Installation record persistence.
//!
//! The installer remembers where the platform tools were installed as a
//! single string value under a fixed registry key. This module defines the
//! record-store trait the action sequences use and the Windows-backed
//! implementation.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};

/// Registry key (under HKLM) holding the installation record.
pub const INSTALL_KEY_PATH: &str = r"SOFTWARE\ADBInstaller";

/// Name of the value storing the install path.
pub const INSTALL_VALUE_NAME: &str = "InstallPath";

/// Persistence for the installation record.
#[cfg_attr(test, mockall::automock)]
pub trait InstallRecordStore: Sync {
    /// Reads the recorded install path, or `None` when no record exists.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::Registry` when the store cannot be read.
    fn read_install_path(&self) -> Result<Option<Utf8PathBuf>>;

    /// Writes the install path, creating the record if needed.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::Registry` when the store cannot be written.
    fn write_install_path(&self, path: &Utf8Path) -> Result<()>;

    /// Deletes the record. Succeeds when no record exists.
    ///
    /// # Errors
    ///
    /// Returns `InstallerError::Registry` when an existing record cannot be
    /// deleted.
    fn delete_record(&self) -> Result<()>;
}

#[cfg(windows)]
pub use system::SystemRegistry;

#[cfg(windows)]
mod system {
    //! Windows registry implementation of the record store.

    use super::{INSTALL_KEY_PATH, INSTALL_VALUE_NAME, InstallRecordStore};
    use crate::error::{InstallerError, Result};
    use camino::{Utf8Path, Utf8PathBuf};
    use std::io;
    use winreg::RegKey;
    use winreg::enums::HKEY_LOCAL_MACHINE;

    /// Record store backed by `HKLM\SOFTWARE\ADBInstaller`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemRegistry;

    impl InstallRecordStore for SystemRegistry {
        fn read_install_path(&self) -> Result<Option<Utf8PathBuf>> {
            let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
            let key = match hklm.open_subkey(INSTALL_KEY_PATH) {
                Ok(key) => key,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(registry_error("read", &e)),
            };
            match key.get_value::<String, _>(INSTALL_VALUE_NAME) {
                Ok(value) => Ok(Some(Utf8PathBuf::from(value))),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(registry_error("read", &e)),
            }
        }

        fn write_install_path(&self, path: &Utf8Path) -> Result<()> {
            let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
            let (key, _) = hklm
                .create_subkey(INSTALL_KEY_PATH)
                .map_err(|e| registry_error("write", &e))?;
            key.set_value(INSTALL_VALUE_NAME, &path.as_str())
                .map_err(|e| registry_error("write", &e))
        }

        fn delete_record(&self) -> Result<()> {
            let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
            match hklm.delete_subkey_all(INSTALL_KEY_PATH) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(registry_error("delete", &e)),
            }
        }
    }

    fn registry_error(operation: &'static str, source: &io::Error) -> InstallerError {
        InstallerError::Registry {
            operation,
            reason: source.to_string(),
        }
    }
}
