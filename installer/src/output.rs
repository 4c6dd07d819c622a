//! Status and result formatting.
//!
//! This module turns installation state and action outcomes into the text
//! the CLI shows, including the JSON form of `status` for scripting.

use crate::status::InstallStatus;
use camino::Utf8Path;
use serde::Serialize;
use std::io::Write;

/// Format installation state for human-readable output.
#[must_use]
pub fn format_human(status: &InstallStatus) -> String {
    match status {
        InstallStatus::Installed(path) => format!(
            "Platform tools installed at: {path}\n\nRun `adbsetup-installer uninstall` to remove them."
        ),
        InstallStatus::NotInstalled => String::from(
            "Platform tools are not installed.\n\nRun `adbsetup-installer install` to install them.",
        ),
    }
}

/// Format installation state as JSON.
#[must_use]
pub fn format_json(status: &InstallStatus) -> String {
    let report = StatusReport::from_status(status);

    // Use pretty printing for readability
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON-serializable view of the installation state.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    /// Whether a valid installation exists.
    pub installed: bool,
    /// Recorded install path when installed.
    pub install_path: Option<String>,
}

impl StatusReport {
    /// Create from an [`InstallStatus`].
    #[must_use]
    pub fn from_status(status: &InstallStatus) -> Self {
        match status {
            InstallStatus::Installed(path) => Self {
                installed: true,
                install_path: Some(path.to_string()),
            },
            InstallStatus::NotInstalled => Self {
                installed: false,
                install_path: None,
            },
        }
    }
}

/// Format the message shown after a successful install.
#[must_use]
pub fn install_success_message(target: &Utf8Path) -> String {
    format!(
        "Platform tools installed to {target}.\nOpen a new terminal for the updated PATH to take effect."
    )
}

/// Format the message shown after a successful uninstall.
#[must_use]
pub fn uninstall_success_message() -> String {
    String::from("Platform tools removed.")
}

/// Preview of what an install run would do.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Directory that would be installed into.
    pub target: &'a Utf8Path,
    /// Resolved platform-tools archive, when found.
    pub platform_tools_archive: Option<&'a Utf8Path>,
    /// Resolved USB driver archive, when found.
    pub usb_driver_archive: Option<&'a Utf8Path>,
    /// Whether driver staging would be skipped.
    pub skip_driver: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let describe = |archive: Option<&Utf8Path>| {
            archive.map_or_else(|| "not found".to_owned(), ToString::to_string)
        };

        [
            "Dry run - no changes will be made".to_owned(),
            String::new(),
            format!("Install directory: {}", self.target),
            format!(
                "Platform-tools archive: {}",
                describe(self.platform_tools_archive)
            ),
            format!("USB driver archive: {}", describe(self.usb_driver_archive)),
            format!(
                "PATH entry to prepend: {}",
                crate::status::tools_dir(self.target)
            ),
            format!(
                "Installation record: HKLM\\{}\\{}",
                crate::registry::INSTALL_KEY_PATH,
                crate::registry::INSTALL_VALUE_NAME
            ),
            format!("Skip driver: {}", self.skip_driver),
        ]
        .join("\n")
    }
}

/// Writes a line to the given writer, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
