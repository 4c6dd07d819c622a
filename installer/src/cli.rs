//! CLI argument definitions for the adbsetup installer.
//!
//! This module defines the command-line interface using clap. It is
//! separated from the main entrypoint to keep the binary small and focused
//! on orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install the Android platform tools and USB driver.
#[derive(Parser, Debug)]
#[command(name = "adbsetup-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the Android platform tools and USB driver on Windows.\n\n",
    "The installer extracts the bundled platform-tools and USB driver ",
    "archives into the chosen directory, puts the tools first on the system ",
    "PATH, stages the USB driver unless one is already present, and records ",
    "the installation in the registry so it can be removed cleanly later.\n\n",
    "Installing and uninstalling write machine-wide state and must run from ",
    "an elevated prompt.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install to the default directory (%APPDATA%\\ADB):\n",
    "    $ adbsetup-installer install\n\n",
    "  Install to a chosen directory without the USB driver:\n",
    "    $ adbsetup-installer install --path D:\\Android\\ADB --skip-driver\n\n",
    "  Preview an install without changing anything:\n",
    "    $ adbsetup-installer install --dry-run\n\n",
    "  Check the current state:\n",
    "    $ adbsetup-installer status --json\n\n",
    "  Remove an installation without prompting:\n",
    "    $ adbsetup-installer uninstall --yes\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install the platform tools and USB driver.
    Install(InstallArgs),

    /// Remove an existing installation.
    Uninstall(UninstallArgs),

    /// Show whether the platform tools are installed.
    Status(StatusArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Installation directory [default: %APPDATA%\ADB].
    #[arg(short, long, value_name = "DIR")]
    pub path: Option<Utf8PathBuf>,

    /// Skip the USB driver check and staging.
    #[arg(long)]
    pub skip_driver: bool,

    /// Answer yes to all prompts.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show what would be done and exit without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the uninstall command.
#[derive(Parser, Debug, Clone)]
pub struct UninstallArgs {
    /// Remove without asking for confirmation.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the status command.
#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

impl Default for InstallArgs {
    /// Creates an `InstallArgs` instance with all flags disabled and the
    /// default installation directory.
    ///
    /// This is useful for testing or programmatic construction where only
    /// specific fields need to be set.
    fn default() -> Self {
        Self {
            path: None,
            skip_driver: false,
            yes: false,
            dry_run: false,
            quiet: false,
        }
    }
}

impl Default for UninstallArgs {
    /// Creates an `UninstallArgs` instance with prompting and progress
    /// output enabled.
    fn default() -> Self {
        Self {
            yes: false,
            quiet: false,
        }
    }
}

impl Default for StatusArgs {
    /// Creates a `StatusArgs` instance with human-readable output.
    fn default() -> Self {
        Self { json: false }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
