//! Existing-tool and driver presence probes.
//!
//! Both probes shell out through the [`CommandExecutor`] seam: `where`
//! resolves the tool name against the caller's PATH, and `wmic` enumerates
//! plug-and-play devices for an Android entry. Probe failures are treated as
//! "not present" so a broken system utility never blocks an install.

use crate::exec::{CommandExecutor, command_succeeds};

/// Tool name resolved against the PATH during the pre-install check.
pub const TOOL_COMMAND: &str = "adb";

/// Substring identifying an Android device entry in the device enumeration.
pub const DRIVER_CLASS_MARKER: &str = "Android";

/// Returns `true` when a same-named tool already resolves on the PATH.
#[must_use]
pub fn existing_tool_on_path(executor: &dyn CommandExecutor) -> bool {
    command_succeeds(executor, "where", &[TOOL_COMMAND])
}

/// Returns `true` when an Android device class is already present in the
/// system device enumeration.
#[must_use]
pub fn driver_present(executor: &dyn CommandExecutor) -> bool {
    executor
        .run(
            "wmic",
            &[
                "path",
                "Win32_PnPEntity",
                "where",
                "Name like '%Android%'",
                "get",
                "Name",
            ],
        )
        .is_ok_and(|output| String::from_utf8_lossy(&output.stdout).contains(DRIVER_CLASS_MARKER))
}
