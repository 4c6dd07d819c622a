//! Administrator privilege check.
//!
//! Both action sequences write under HKLM, so they refuse to start from an
//! unelevated process rather than failing halfway through.

use crate::error::{InstallerError, Result};

/// Returns `true` when the current process runs with administrative rights.
#[cfg(windows)]
#[must_use]
pub fn is_elevated() -> bool {
    unsafe { windows_sys::Win32::UI::Shell::IsUserAnAdmin() != 0 }
}

/// Non-Windows hosts never satisfy the elevation requirement.
#[cfg(not(windows))]
#[must_use]
pub fn is_elevated() -> bool {
    false
}

/// Fails with [`InstallerError::ElevationRequired`] unless the process is
/// elevated.
///
/// # Errors
///
/// Returns [`InstallerError::ElevationRequired`] when the process lacks
/// administrative rights.
pub fn ensure_elevated() -> Result<()> {
    if is_elevated() {
        Ok(())
    } else {
        Err(InstallerError::ElevationRequired)
    }
}
