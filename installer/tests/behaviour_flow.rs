//! Behaviour-driven tests for the install and uninstall sequences.
//!
//! These scenarios drive the real sequences against in-memory stores, real
//! zip archives in temporary directories, and a recording command executor.

mod support;

use adbsetup_installer::error::InstallerError;
use adbsetup_installer::extraction::ZipExtractor;
use adbsetup_installer::install::{InstallContext, InstallOptions, run_install};
use adbsetup_installer::progress::SilentProgress;
use adbsetup_installer::resources::BundledArchives;
use adbsetup_installer::status::{InstallStatus, check_status, tools_dir};
use adbsetup_installer::uninstall::run_uninstall;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use support::{MemoryEnvironment, MemoryRecordStore, RecordingExecutor, utf8_path, write_bundle};
use tempfile::TempDir;

const INITIAL_PATH: &str = r"C:\Windows;C:\Windows\System32";

struct FlowWorld {
    _temp: TempDir,
    target: Utf8PathBuf,
    archives: BundledArchives,
    records: MemoryRecordStore,
    environment: MemoryEnvironment,
    executor: RecordingExecutor,
    outcome: RefCell<Option<support::FlowResult>>,
    status: RefCell<Option<InstallStatus>>,
}

#[fixture]
fn flow_world() -> FlowWorld {
    let temp = TempDir::new().expect("temp dir");
    let root = utf8_path(&temp);
    let archives = write_bundle(&root);
    FlowWorld {
        _temp: temp,
        target: root.join("ADB"),
        archives,
        records: MemoryRecordStore::empty(),
        environment: MemoryEnvironment::with_path(INITIAL_PATH),
        executor: RecordingExecutor::with_driver_present(true),
        outcome: RefCell::new(None),
        status: RefCell::new(None),
    }
}

fn install_now(flow_world: &FlowWorld) -> support::FlowResult {
    let extractor = ZipExtractor;
    let ctx = InstallContext {
        records: &flow_world.records,
        environment: &flow_world.environment,
        extractor: &extractor,
        executor: &flow_world.executor,
    };
    let options = InstallOptions {
        target: flow_world.target.clone(),
        skip_driver: false,
    };
    run_install(&ctx, &flow_world.archives, &options, &SilentProgress)
}

// ---------------------------------------------------------------------------
// Given
// ---------------------------------------------------------------------------

#[given("no installation is recorded")]
fn given_nothing_recorded(flow_world: &FlowWorld) {
    assert!(flow_world.records.recorded().is_none());
}

#[given("a completed installation")]
fn given_completed_install(flow_world: &FlowWorld) {
    install_now(flow_world).expect("seed installation should succeed");
}

#[given("an installation record pointing at a missing installation")]
fn given_stale_record(flow_world: &FlowWorld) {
    flow_world.records.set_record(&flow_world.target.join("gone"));
}

#[given("an Android driver is already present")]
fn given_driver_present(flow_world: &FlowWorld) {
    flow_world.executor.set_driver_present(true);
}

#[given("no Android driver is present")]
fn given_driver_absent(flow_world: &FlowWorld) {
    flow_world.executor.set_driver_present(false);
}

#[given("the platform-tools archive is corrupt")]
fn given_corrupt_archive(flow_world: &FlowWorld) {
    std::fs::write(&flow_world.archives.platform_tools, b"not a zip")
        .expect("overwrite archive");
}

// ---------------------------------------------------------------------------
// When
// ---------------------------------------------------------------------------

#[when("the install sequence runs")]
fn when_install_runs(flow_world: &FlowWorld) {
    let outcome = install_now(flow_world);
    flow_world.outcome.replace(Some(outcome));
}

#[when("the uninstall sequence runs")]
fn when_uninstall_runs(flow_world: &FlowWorld) {
    let installed = flow_world
        .records
        .recorded()
        .expect("an installation should be recorded before uninstalling");
    let extractor = ZipExtractor;
    let ctx = InstallContext {
        records: &flow_world.records,
        environment: &flow_world.environment,
        extractor: &extractor,
        executor: &flow_world.executor,
    };
    let outcome = run_uninstall(&ctx, &installed, &SilentProgress);
    flow_world.outcome.replace(Some(outcome));
}

#[when("the status is checked")]
fn when_status_checked(flow_world: &FlowWorld) {
    let status = check_status(&flow_world.records).expect("status check should succeed");
    flow_world.status.replace(Some(status));
}

// ---------------------------------------------------------------------------
// Then
// ---------------------------------------------------------------------------

#[then("the tools are extracted into the target directory")]
fn then_tools_extracted(flow_world: &FlowWorld) {
    assert!(flow_world.outcome.borrow().as_ref().is_some_and(Result::is_ok));
    assert!(
        adbsetup_installer::status::tool_executable_path(&flow_world.target).is_file(),
        "tool executable should exist after extraction"
    );
}

#[then("the tools directory is first on the PATH")]
fn then_tools_first_on_path(flow_world: &FlowWorld) {
    let path_value = flow_world.environment.path_value();
    let tools = tools_dir(&flow_world.target);
    assert_eq!(path_value.split(';').next(), Some(tools.as_str()));
}

#[then("the installation record points at the target directory")]
fn then_record_points_at_target(flow_world: &FlowWorld) {
    assert_eq!(flow_world.records.recorded().as_ref(), Some(&flow_world.target));
}

#[then("an environment change was broadcast")]
fn then_change_broadcast(flow_world: &FlowWorld) {
    assert!(flow_world.environment.broadcast_count() >= 1);
}

#[then("the driver utility was not invoked")]
fn then_driver_not_invoked(flow_world: &FlowWorld) {
    let invocations = flow_world.executor.invocations();
    assert!(
        !invocations.iter().any(|cmd| cmd == "pnputil"),
        "got: {invocations:?}"
    );
}

#[then("the driver utility was invoked")]
fn then_driver_invoked(flow_world: &FlowWorld) {
    let invocations = flow_world.executor.invocations();
    assert!(
        invocations.iter().any(|cmd| cmd == "pnputil"),
        "got: {invocations:?}"
    );
}

#[then("the attempt fails as already installed")]
fn then_fails_already_installed(flow_world: &FlowWorld) {
    let outcome = flow_world.outcome.borrow();
    assert!(matches!(
        outcome.as_ref(),
        Some(Err(InstallerError::AlreadyInstalled { .. }))
    ));
}

#[then("the attempt fails")]
fn then_attempt_fails(flow_world: &FlowWorld) {
    let outcome = flow_world.outcome.borrow();
    assert!(outcome.as_ref().is_some_and(Result::is_err));
}

#[then("the status is not installed")]
fn then_status_not_installed(flow_world: &FlowWorld) {
    assert_eq!(
        flow_world.status.borrow().as_ref(),
        Some(&InstallStatus::NotInstalled)
    );
}

#[then("the stale record is gone")]
fn then_stale_record_gone(flow_world: &FlowWorld) {
    assert!(flow_world.records.recorded().is_none());
}

#[then("the target directory is gone")]
fn then_target_gone(flow_world: &FlowWorld) {
    assert!(flow_world.outcome.borrow().as_ref().is_some_and(Result::is_ok));
    assert!(!flow_world.target.exists());
}

#[then("the PATH no longer mentions the tools directory")]
fn then_path_without_tools(flow_world: &FlowWorld) {
    let path_value = flow_world.environment.path_value();
    let tools = tools_dir(&flow_world.target);
    assert!(!path_value.contains(tools.as_str()), "got: {path_value}");
}

#[then("a subsequent status check reports not installed")]
fn then_followup_status_not_installed(flow_world: &FlowWorld) {
    let status = check_status(&flow_world.records).expect("status check should succeed");
    assert_eq!(status, InstallStatus::NotInstalled);
}

#[then("the PATH is unchanged")]
fn then_path_unchanged(flow_world: &FlowWorld) {
    assert_eq!(flow_world.environment.path_value(), INITIAL_PATH);
}

#[then("no record is written")]
fn then_no_record(flow_world: &FlowWorld) {
    assert!(flow_world.records.recorded().is_none());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/install_flow.feature", index = 0)]
fn scenario_fresh_install(flow_world: FlowWorld) {
    let _ = flow_world;
}

#[scenario(path = "tests/features/install_flow.feature", index = 1)]
fn scenario_driver_staged_when_absent(flow_world: FlowWorld) {
    let _ = flow_world;
}

#[scenario(path = "tests/features/install_flow.feature", index = 2)]
fn scenario_second_install_refused(flow_world: FlowWorld) {
    let _ = flow_world;
}

#[scenario(path = "tests/features/install_flow.feature", index = 3)]
fn scenario_stale_record_cleanup(flow_world: FlowWorld) {
    let _ = flow_world;
}

#[scenario(path = "tests/features/install_flow.feature", index = 4)]
fn scenario_uninstall_removes_everything(flow_world: FlowWorld) {
    let _ = flow_world;
}

#[scenario(path = "tests/features/install_flow.feature", index = 5)]
fn scenario_failed_extraction_changes_nothing(flow_world: FlowWorld) {
    let _ = flow_world;
}
