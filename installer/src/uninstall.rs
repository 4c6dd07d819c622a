//! The linear uninstall sequence.
//!
//! The reverse of installation: take the tools off the PATH first so no new
//! shells resolve them, delete the installed tree, then drop the record.
//! Nothing is rolled back on failure.

use crate::env_path;
use crate::error::Result;
use crate::install::InstallContext;
use crate::progress::ProgressSink;
use crate::status::tools_dir;
use camino::Utf8Path;
use log::info;
use std::fs;

/// Runs the uninstall sequence for the installation at `installed_path`.
///
/// # Errors
///
/// Propagates the first failing step; earlier steps are not undone.
pub fn run_uninstall(
    ctx: &InstallContext<'_>,
    installed_path: &Utf8Path,
    progress: &dyn ProgressSink,
) -> Result<()> {
    info!("removing platform tools from {installed_path}");

    progress.update("Removing the tools from the system PATH...");
    env_path::remove_from_path(ctx.environment, &tools_dir(installed_path))?;

    progress.update("Deleting the installed files...");
    if installed_path.exists() {
        fs::remove_dir_all(installed_path)?;
    }

    progress.update("Removing the installation record...");
    ctx.records.delete_record()?;

    info!("platform tools removed");
    Ok(())
}
