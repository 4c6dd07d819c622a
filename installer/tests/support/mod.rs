//! Test support utilities for installer behavioural tests.
//!
//! This module provides in-memory fakes of the OS-boundary traits plus
//! helpers for building realistic archive bundles in temporary directories.

use adbsetup_installer::driver::{DRIVER_DIR, DRIVER_INF};
use adbsetup_installer::env_path::EnvironmentStore;
use adbsetup_installer::error::{InstallerError, Result};
use adbsetup_installer::exec::CommandExecutor;
use adbsetup_installer::registry::InstallRecordStore;
use adbsetup_installer::resources::BundledArchives;
use adbsetup_installer::status::{PLATFORM_TOOLS_DIR, TOOL_EXECUTABLE};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory installation record store.
#[derive(Default)]
pub struct MemoryRecordStore {
    record: Mutex<Option<Utf8PathBuf>>,
}

impl MemoryRecordStore {
    /// A store with no record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the record directly, bypassing the trait.
    pub fn set_record(&self, path: &Utf8Path) {
        *self.record.lock().expect("record lock poisoned") = Some(path.to_owned());
    }

    /// Returns the currently recorded path, if any.
    pub fn recorded(&self) -> Option<Utf8PathBuf> {
        self.record.lock().expect("record lock poisoned").clone()
    }
}

impl InstallRecordStore for MemoryRecordStore {
    fn read_install_path(&self) -> Result<Option<Utf8PathBuf>> {
        Ok(self.recorded())
    }

    fn write_install_path(&self, path: &Utf8Path) -> Result<()> {
        self.set_record(path);
        Ok(())
    }

    fn delete_record(&self) -> Result<()> {
        *self.record.lock().expect("record lock poisoned") = None;
        Ok(())
    }
}

/// In-memory system PATH store that counts broadcasts.
pub struct MemoryEnvironment {
    path: Mutex<String>,
    broadcasts: AtomicUsize,
}

impl MemoryEnvironment {
    /// A store seeded with the given PATH value.
    pub fn with_path(value: &str) -> Self {
        Self {
            path: Mutex::new(value.to_owned()),
            broadcasts: AtomicUsize::new(0),
        }
    }

    /// Returns the current PATH value.
    pub fn path_value(&self) -> String {
        self.path.lock().expect("path lock poisoned").clone()
    }

    /// Number of environment-change broadcasts seen so far.
    pub fn broadcast_count(&self) -> usize {
        self.broadcasts.load(Ordering::SeqCst)
    }
}

impl EnvironmentStore for MemoryEnvironment {
    fn read_path(&self) -> Result<String> {
        Ok(self.path_value())
    }

    fn write_path(&self, value: &str) -> Result<()> {
        *self.path.lock().expect("path lock poisoned") = value.to_owned();
        Ok(())
    }

    fn broadcast_change(&self) {
        self.broadcasts.fetch_add(1, Ordering::SeqCst);
    }
}

/// Command executor that records invocations and answers the two probes the
/// installer makes (`wmic` device enumeration, `pnputil` staging).
pub struct RecordingExecutor {
    invoked: Mutex<Vec<String>>,
    driver_present: AtomicBool,
}

impl RecordingExecutor {
    /// An executor whose device enumeration reports the given driver state.
    pub fn with_driver_present(driver_present: bool) -> Self {
        Self {
            invoked: Mutex::new(Vec::new()),
            driver_present: AtomicBool::new(driver_present),
        }
    }

    /// Changes the reported driver state.
    pub fn set_driver_present(&self, present: bool) {
        self.driver_present.store(present, Ordering::SeqCst);
    }

    /// Names of the commands run so far, in order.
    pub fn invocations(&self) -> Vec<String> {
        self.invoked.lock().expect("invocation lock poisoned").clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn run(&self, cmd: &str, _args: &[&str]) -> std::io::Result<Output> {
        self.invoked
            .lock()
            .expect("invocation lock poisoned")
            .push(cmd.to_owned());

        let stdout = match cmd {
            "wmic" if self.driver_present.load(Ordering::SeqCst) => {
                "Name\nAndroid Composite ADB Interface\n"
            }
            "wmic" => "Name\n",
            _ => "",
        };
        Ok(Output {
            status: exit_status(0),
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
        })
    }
}

/// Writes both bundled archives under `root/data` and returns their
/// locations. The platform-tools archive contains the tool executable; the
/// driver archive contains the INF.
pub fn write_bundle(root: &Utf8Path) -> BundledArchives {
    let data = root.join("data");
    std::fs::create_dir_all(&data).expect("create data dir");

    let tool_entry = format!("{PLATFORM_TOOLS_DIR}/{TOOL_EXECUTABLE}");
    let platform_tools = data.join(adbsetup_installer::resources::PLATFORM_TOOLS_ARCHIVE);
    write_zip(
        &platform_tools,
        &[(tool_entry.as_str(), b"binary".as_slice())],
    );

    let inf_entry = format!("{DRIVER_DIR}/{DRIVER_INF}");
    let usb_driver = data.join(adbsetup_installer::resources::USB_DRIVER_ARCHIVE);
    write_zip(
        &usb_driver,
        &[(inf_entry.as_str(), b"[Version]".as_slice())],
    );

    BundledArchives {
        platform_tools,
        usb_driver,
    }
}

/// Builds a zip archive with the given entries.
pub fn write_zip(path: &Utf8Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).expect("create archive");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(contents).expect("write entry");
    }
    writer.finish().expect("finish archive");
}

/// Converts a temp dir handle into a UTF-8 path.
pub fn utf8_path(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().to_owned()).expect("non-UTF8 temp path")
}

/// Keeps [`InstallerError`] in the support prelude for step assertions.
pub type FlowResult = std::result::Result<(), InstallerError>;

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code.unsigned_abs())
}
