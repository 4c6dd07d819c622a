//! adbsetup installer CLI entrypoint.
//!
//! This binary installs or removes the Android platform tools and USB
//! driver: it extracts the bundled archives, prepends the tools directory to
//! the system PATH, stages the USB driver when needed, and records the
//! installation in the registry. The blocking action sequences run on a
//! background worker; this thread only renders status lines.

use adbsetup_installer::cli::Cli;
use adbsetup_installer::error::Result;
use adbsetup_installer::output::write_stderr_line;
use clap::Parser;
use std::io::Write;

fn main() {
    init_logging();
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    use adbsetup_installer::cli::Command;

    match &cli.command {
        Command::Install(args) => actions::install(args, stderr),
        Command::Uninstall(args) => actions::uninstall(args, stderr),
        Command::Status(args) => actions::status(args),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err}");
            write_stderr_line(stderr, err);
            1
        }
    }
}

#[cfg(windows)]
mod actions {
    //! Action handlers wired to the Windows system stores.

    use adbsetup_installer::cli::{InstallArgs, StatusArgs, UninstallArgs};
    use adbsetup_installer::detect;
    use adbsetup_installer::elevation;
    use adbsetup_installer::env_path::SystemEnvironment;
    use adbsetup_installer::error::{InstallerError, Result};
    use adbsetup_installer::exec::SystemCommandExecutor;
    use adbsetup_installer::extraction::ZipExtractor;
    use adbsetup_installer::install::{
        InstallContext, InstallOptions, default_install_dir, run_install,
    };
    use adbsetup_installer::output::{
        DryRunInfo, format_human, format_json, install_success_message,
        uninstall_success_message, write_stderr_line,
    };
    use adbsetup_installer::progress::run_on_worker;
    use adbsetup_installer::registry::SystemRegistry;
    use adbsetup_installer::resources::{
        self, PLATFORM_TOOLS_ARCHIVE, USB_DRIVER_ARCHIVE, locate_bundled_archives,
    };
    use adbsetup_installer::status::{InstallStatus, check_status};
    use adbsetup_installer::uninstall::run_uninstall;
    use camino::{Utf8Path, Utf8PathBuf};
    use std::io::Write;

    /// Handles `install`, including the dry-run preview and the pre-install
    /// confirmation when a same-named tool is already on the PATH.
    pub(crate) fn install(args: &InstallArgs, stderr: &mut dyn Write) -> Result<()> {
        let target = resolve_target(args.path.clone())?;

        if args.dry_run {
            write_stderr_line(stderr, dry_run_text(&target, args.skip_driver));
            return Ok(());
        }

        elevation::ensure_elevated()?;

        let records = SystemRegistry;
        if let InstallStatus::Installed(path) = check_status(&records)? {
            return Err(InstallerError::AlreadyInstalled { path });
        }

        let archives = locate_bundled_archives()?;
        let executor = SystemCommandExecutor;
        if detect::existing_tool_on_path(&executor) && !args.yes && !confirm_override() {
            write_stderr_line(stderr, "Installation cancelled.");
            return Ok(());
        }

        let environment = SystemEnvironment;
        let extractor = ZipExtractor;
        let ctx = InstallContext {
            records: &records,
            environment: &environment,
            extractor: &extractor,
            executor: &executor,
        };
        let options = InstallOptions {
            target: target.clone(),
            skip_driver: args.skip_driver,
        };

        run_on_worker(stderr, args.quiet, |progress| {
            run_install(&ctx, &archives, &options, progress)
        })?;

        write_stderr_line(stderr, install_success_message(&target));
        Ok(())
    }

    /// Handles `uninstall` after confirming with the user.
    pub(crate) fn uninstall(args: &UninstallArgs, stderr: &mut dyn Write) -> Result<()> {
        elevation::ensure_elevated()?;

        let records = SystemRegistry;
        let InstallStatus::Installed(installed_path) = check_status(&records)? else {
            return Err(InstallerError::NotInstalled);
        };

        if !args.yes && !confirm_uninstall() {
            write_stderr_line(stderr, "Uninstall cancelled.");
            return Ok(());
        }

        let environment = SystemEnvironment;
        let extractor = ZipExtractor;
        let executor = SystemCommandExecutor;
        let ctx = InstallContext {
            records: &records,
            environment: &environment,
            extractor: &extractor,
            executor: &executor,
        };

        run_on_worker(stderr, args.quiet, |progress| {
            run_uninstall(&ctx, &installed_path, progress)
        })?;

        write_stderr_line(stderr, uninstall_success_message());
        Ok(())
    }

    /// Handles `status`, writing to stdout for scripting.
    pub(crate) fn status(args: &StatusArgs) -> Result<()> {
        let records = SystemRegistry;
        let status = check_status(&records)?;

        let text = if args.json {
            format_json(&status)
        } else {
            format_human(&status)
        };

        let mut stdout = std::io::stdout();
        writeln!(stdout, "{text}")?;
        Ok(())
    }

    fn resolve_target(cli_path: Option<Utf8PathBuf>) -> Result<Utf8PathBuf> {
        cli_path.or_else(default_install_dir).ok_or_else(|| {
            InstallerError::InstallDirUnresolved {
                reason: "no --path given and no application data directory found".to_owned(),
            }
        })
    }

    fn dry_run_text(target: &Utf8Path, skip_driver: bool) -> String {
        let roots = resources::search_roots();
        let platform_tools = resources::resource_path(&roots, PLATFORM_TOOLS_ARCHIVE).ok();
        let usb_driver = resources::resource_path(&roots, USB_DRIVER_ARCHIVE).ok();

        DryRunInfo {
            target,
            platform_tools_archive: platform_tools.as_deref(),
            usb_driver_archive: usb_driver.as_deref(),
            skip_driver,
        }
        .display_text()
    }

    fn confirm_override() -> bool {
        confirm("adb is already available on the PATH. Install anyway and take precedence?")
    }

    fn confirm_uninstall() -> bool {
        confirm("Remove the installed platform tools?")
    }

    /// Asks a yes/no question, defaulting to no; prompt failures (for
    /// example a non-interactive terminal) count as declined.
    fn confirm(prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

#[cfg(not(windows))]
mod actions {
    //! Fallback handlers for non-Windows hosts.

    use adbsetup_installer::cli::{InstallArgs, StatusArgs, UninstallArgs};
    use adbsetup_installer::error::{InstallerError, Result};
    use std::io::Write;

    pub(crate) fn install(_args: &InstallArgs, _stderr: &mut dyn Write) -> Result<()> {
        Err(InstallerError::UnsupportedPlatform)
    }

    pub(crate) fn uninstall(_args: &UninstallArgs, _stderr: &mut dyn Write) -> Result<()> {
        Err(InstallerError::UnsupportedPlatform)
    }

    pub(crate) fn status(_args: &StatusArgs) -> Result<()> {
        Err(InstallerError::UnsupportedPlatform)
    }
}
