//! System PATH list editing and persistence.
//!
//! The system PATH is one semicolon-delimited registry string value. The
//! edit rules are pure functions over that string; persistence and the
//! environment-change broadcast sit behind [`EnvironmentStore`] so the action
//! sequences can be tested anywhere.

use crate::error::Result;
use camino::Utf8Path;

/// Registry key (under HKLM) holding the machine environment values.
pub const ENVIRONMENT_KEY_PATH: &str =
    r"SYSTEM\CurrentControlSet\Control\Session Manager\Environment";

/// Name of the PATH value under the environment key.
pub const PATH_VALUE_NAME: &str = "Path";

/// Timeout for the environment-change broadcast, in milliseconds.
pub const BROADCAST_TIMEOUT_MS: u32 = 5000;

/// Persistence for the system PATH value.
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentStore: Sync {
    /// Reads the current PATH value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::InstallerError::PathUpdate`] when the value
    /// cannot be read.
    fn read_path(&self) -> Result<String>;

    /// Rewrites the PATH value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::InstallerError::PathUpdate`] when the value
    /// cannot be written.
    fn write_path(&self, value: &str) -> Result<()>;

    /// Broadcasts the environment change to running applications.
    ///
    /// Best effort: failures are ignored, matching the fire-and-forget
    /// nature of the system broadcast.
    fn broadcast_change(&self);
}

/// Returns `value` with `entry` as the first element, removing any existing
/// exact matches and blank segments.
#[must_use]
pub fn prepend_entry(value: &str, entry: &str) -> String {
    let mut parts = vec![entry];
    parts.extend(retained_segments(value, entry));
    parts.join(";")
}

/// Returns `value` with every exact match of `entry` and all blank segments
/// removed, preserving the order of the remainder.
#[must_use]
pub fn remove_entry(value: &str, entry: &str) -> String {
    retained_segments(value, entry).collect::<Vec<_>>().join(";")
}

/// Segments of `value` that are neither blank nor an exact match of `entry`.
///
/// Matching trims surrounding whitespace; retained segments keep their
/// original spelling.
fn retained_segments<'a>(value: &'a str, entry: &'a str) -> impl Iterator<Item = &'a str> {
    value.split(';').filter(move |segment| {
        let trimmed = segment.trim();
        !trimmed.is_empty() && trimmed != entry
    })
}

/// Prepends `entry` to the stored PATH and broadcasts the change.
///
/// # Errors
///
/// Propagates store read and write failures.
pub fn prepend_to_path(store: &dyn EnvironmentStore, entry: &Utf8Path) -> Result<()> {
    let current = store.read_path()?;
    store.write_path(&prepend_entry(&current, entry.as_str()))?;
    store.broadcast_change();
    Ok(())
}

/// Removes `entry` from the stored PATH and broadcasts the change.
///
/// # Errors
///
/// Propagates store read and write failures.
pub fn remove_from_path(store: &dyn EnvironmentStore, entry: &Utf8Path) -> Result<()> {
    let current = store.read_path()?;
    store.write_path(&remove_entry(&current, entry.as_str()))?;
    store.broadcast_change();
    Ok(())
}

#[cfg(windows)]
pub use system::SystemEnvironment;

#[cfg(windows)]
mod system {
    //! Windows registry implementation of the environment store.

    use super::{BROADCAST_TIMEOUT_MS, ENVIRONMENT_KEY_PATH, EnvironmentStore, PATH_VALUE_NAME};
    use crate::error::{InstallerError, Result};
    use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_READ, KEY_SET_VALUE, RegType};
    use winreg::{RegKey, RegValue};

    /// Environment store backed by the Session Manager registry key.
    ///
    /// The PATH value is rewritten as `REG_EXPAND_SZ`, matching the type the
    /// system itself uses for expandable path lists.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemEnvironment;

    impl EnvironmentStore for SystemEnvironment {
        fn read_path(&self) -> Result<String> {
            let key = open_environment_key()?;
            key.get_value::<String, _>(PATH_VALUE_NAME)
                .map_err(|e| path_update_error("read", &e))
        }

        fn write_path(&self, value: &str) -> Result<()> {
            let key = open_environment_key()?;
            key.set_raw_value(
                PATH_VALUE_NAME,
                &RegValue {
                    bytes: utf16_bytes(value),
                    vtype: RegType::REG_EXPAND_SZ,
                },
            )
            .map_err(|e| path_update_error("write", &e))
        }

        fn broadcast_change(&self) {
            use windows_sys::Win32::UI::WindowsAndMessaging::{
                HWND_BROADCAST, SMTO_ABORTIFHUNG, SendMessageTimeoutW, WM_SETTINGCHANGE,
            };

            let section: Vec<u16> = "Environment"
                .encode_utf16()
                .chain(std::iter::once(0))
                .collect();
            let mut result: usize = 0;
            unsafe {
                SendMessageTimeoutW(
                    HWND_BROADCAST,
                    WM_SETTINGCHANGE,
                    0,
                    section.as_ptr() as isize,
                    SMTO_ABORTIFHUNG,
                    BROADCAST_TIMEOUT_MS,
                    &mut result,
                );
            }
        }
    }

    fn open_environment_key() -> Result<RegKey> {
        RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(ENVIRONMENT_KEY_PATH, KEY_READ | KEY_SET_VALUE)
            .map_err(|e| path_update_error("open", &e))
    }

    fn path_update_error(operation: &str, source: &std::io::Error) -> InstallerError {
        InstallerError::PathUpdate {
            reason: format!("{operation}: {source}"),
        }
    }

    /// UTF-16LE bytes with a terminating nul, the registry string encoding.
    fn utf16_bytes(value: &str) -> Vec<u8> {
        value
            .encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_le_bytes)
            .collect()
    }
}
