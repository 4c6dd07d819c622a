//! USB driver installation via the OS driver utility.
//!
//! The driver package extracts to `usb_driver\android_winusb.inf` inside the
//! installation directory; `pnputil /a` stages it into the driver store. A
//! failed staging is logged and tolerated: the tools work for many devices
//! without the bundled driver, and the user can install it manually later.

use crate::error::{InstallerError, Result};
use crate::exec::CommandExecutor;
use camino::{Utf8Path, Utf8PathBuf};
use log::warn;

/// Directory inside the install path holding the driver package.
pub const DRIVER_DIR: &str = "usb_driver";

/// INF file describing the USB driver.
pub const DRIVER_INF: &str = "android_winusb.inf";

/// Path of the driver INF inside an installation directory.
#[must_use]
pub fn driver_inf_path(install_path: &Utf8Path) -> Utf8PathBuf {
    install_path.join(DRIVER_DIR).join(DRIVER_INF)
}

/// Stages the bundled USB driver with `pnputil /a`.
///
/// A nonzero exit from the utility is logged as a warning and reported as
/// success; only a failure to spawn the utility is an error.
///
/// # Errors
///
/// Returns [`InstallerError::CommandSpawn`] when `pnputil` cannot be run.
pub fn install_driver(executor: &dyn CommandExecutor, install_path: &Utf8Path) -> Result<()> {
    let inf = driver_inf_path(install_path);
    let output = executor
        .run("pnputil", &["/a", inf.as_str()])
        .map_err(|source| InstallerError::CommandSpawn {
            command: "pnputil",
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("driver staging may have failed: {}", stderr.trim());
    }

    Ok(())
}
