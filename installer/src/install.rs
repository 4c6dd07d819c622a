//! The linear install sequence.
//!
//! Ordering matters and mirrors what users see: create the directory, prove
//! it writable, extract both archives, put the tools on the PATH, deal with
//! the driver, and only then write the installation record. A failure at any
//! step surfaces immediately; nothing is rolled back, and the record is only
//! written on full success.

use crate::detect;
use crate::driver;
use crate::env_path::{self, EnvironmentStore};
use crate::error::{InstallerError, Result};
use crate::exec::CommandExecutor;
use crate::extraction::ArchiveExtractor;
use crate::progress::ProgressSink;
use crate::registry::InstallRecordStore;
use crate::resources::BundledArchives;
use crate::status::{InstallStatus, check_status, tools_dir};
use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use std::fs;

/// The OS boundaries an action sequence works through.
pub struct InstallContext<'a> {
    /// Installation record persistence.
    pub records: &'a dyn InstallRecordStore,
    /// System PATH persistence.
    pub environment: &'a dyn EnvironmentStore,
    /// Bundled archive extraction.
    pub extractor: &'a dyn ArchiveExtractor,
    /// External command execution.
    pub executor: &'a dyn CommandExecutor,
}

/// Options controlling a single install run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Directory to install into.
    pub target: Utf8PathBuf,
    /// Skip the USB driver check and staging entirely.
    pub skip_driver: bool,
}

/// Default installation directory (`%APPDATA%\ADB`).
#[must_use]
pub fn default_install_dir() -> Option<Utf8PathBuf> {
    dirs::config_dir()
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .map(|p| p.join("ADB"))
}

/// Runs the install sequence.
///
/// # Errors
///
/// Returns [`InstallerError::AlreadyInstalled`] when a valid installation
/// exists, and propagates the first failing step otherwise. Driver staging
/// failures are downgraded to warnings.
pub fn run_install(
    ctx: &InstallContext<'_>,
    archives: &BundledArchives,
    options: &InstallOptions,
    progress: &dyn ProgressSink,
) -> Result<()> {
    if let InstallStatus::Installed(path) = check_status(ctx.records)? {
        return Err(InstallerError::AlreadyInstalled { path });
    }
    let target = options.target.as_path();
    info!("installing platform tools to {target}");

    progress.update("Creating the installation directory...");
    fs::create_dir_all(target)?;
    ensure_writable(target)?;

    progress.update("Extracting the platform tools...");
    extract_archive(ctx, &archives.platform_tools, target)?;

    progress.update("Extracting the USB driver package...");
    extract_archive(ctx, &archives.usb_driver, target)?;

    progress.update("Adding the tools to the system PATH...");
    env_path::prepend_to_path(ctx.environment, &tools_dir(target))?;

    if options.skip_driver {
        progress.update("Skipping the USB driver as requested.");
    } else {
        progress.update("Checking for an existing Android USB driver...");
        if detect::driver_present(ctx.executor) {
            progress.update("An Android driver is already present; skipping driver staging.");
        } else {
            progress.update("Staging the USB driver...");
            if let Err(e) = driver::install_driver(ctx.executor, target) {
                warn!("driver staging failed: {e}");
                progress.update("Driver staging failed; continuing without it.");
            }
        }
    }

    progress.update("Recording the installation...");
    ctx.records.write_install_path(target)?;

    info!("platform tools installed at {target}");
    Ok(())
}

fn extract_archive(
    ctx: &InstallContext<'_>,
    archive: &Utf8Path,
    target: &Utf8Path,
) -> Result<()> {
    ctx.extractor
        .extract(archive, target)
        .map_err(|source| InstallerError::Extraction {
            archive: archive
                .file_name()
                .unwrap_or(archive.as_str())
                .to_owned(),
            source,
        })?;
    Ok(())
}

/// Verifies writability by creating and removing a marker file.
fn ensure_writable(dir: &Utf8Path) -> Result<()> {
    let marker = dir.join(".adbsetup-write-test");
    match fs::write(&marker, b"test") {
        Ok(()) => {
            let _ = fs::remove_file(&marker);
            Ok(())
        }
        Err(e) => Err(InstallerError::TargetNotWritable {
            path: dir.to_owned(),
            reason: e.to_string(),
        }),
    }
}
