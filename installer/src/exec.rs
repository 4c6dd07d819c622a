//! External command execution abstraction.
//!
//! This module provides the trait seam through which every subprocess the
//! installer spawns (`where`, `wmic`, `pnputil`) is invoked, so the action
//! sequences can be tested without touching the host system.

use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor: Sync {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    fn run(&self, cmd: &str, args: &[&str]) -> std::io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> std::io::Result<Output> {
        Command::new(cmd).args(args).output()
    }
}

/// Returns true if the given command executes successfully.
pub(crate) fn command_succeeds(executor: &dyn CommandExecutor, cmd: &str, args: &[&str]) -> bool {
    executor.run(cmd, args).is_ok_and(|o| o.status.success())
}

#[cfg(any(test, feature = "test-support"))]
pub use stub::{StubExecutor, StubbedCommand};

#[cfg(any(test, feature = "test-support"))]
mod stub {
    //! Scripted command execution for tests.

    use super::CommandExecutor;
    use std::collections::VecDeque;
    use std::process::{ExitStatus, Output};
    use std::sync::Mutex;

    /// One scripted command invocation and its canned result.
    pub struct StubbedCommand {
        /// Command name the stub expects next.
        pub cmd: &'static str,
        /// Exit code to report.
        pub exit_code: i32,
        /// Bytes to report on stdout.
        pub stdout: Vec<u8>,
    }

    impl StubbedCommand {
        /// A response that succeeds with the given stdout bytes.
        #[must_use]
        pub fn ok(cmd: &'static str, stdout: &str) -> Self {
            Self {
                cmd,
                exit_code: 0,
                stdout: stdout.as_bytes().to_vec(),
            }
        }

        /// A response that fails with the given exit code and empty output.
        #[must_use]
        pub fn failing(cmd: &'static str, exit_code: i32) -> Self {
            Self {
                cmd,
                exit_code,
                stdout: Vec::new(),
            }
        }
    }

    /// A [`CommandExecutor`] that replays canned responses in order.
    ///
    /// Invocations beyond the scripted list, or for a different command than
    /// the next scripted one, fail with `NotFound`, which callers treat the
    /// same way as a missing system utility.
    #[derive(Default)]
    pub struct StubExecutor {
        script: Mutex<VecDeque<StubbedCommand>>,
    }

    impl StubExecutor {
        /// Creates a stub that replays the given responses in order.
        #[must_use]
        pub fn new(script: Vec<StubbedCommand>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
            }
        }
    }

    impl CommandExecutor for StubExecutor {
        fn run(&self, cmd: &str, _args: &[&str]) -> std::io::Result<Output> {
            let Ok(mut script) = self.script.lock() else {
                return Err(std::io::Error::other("stub script lock poisoned"));
            };
            match script.pop_front() {
                Some(next) if next.cmd == cmd => Ok(Output {
                    status: exit_status(next.exit_code),
                    stdout: next.stdout,
                    stderr: Vec::new(),
                }),
                _ => Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no stubbed response for {cmd}"),
                )),
            }
        }
    }

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
}
