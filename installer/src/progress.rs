//! Worker-thread offload with status updates.
//!
//! The action sequences block on file, registry, and subprocess I/O, so they
//! run on a background worker while the foreground thread does nothing but
//! render status lines received over a channel. There is no cancellation
//! once a sequence starts.

use crate::error::{InstallerError, Result};
use std::io::Write;
use std::sync::mpsc;

/// Receives status updates from a running action sequence.
pub trait ProgressSink {
    /// Reports a human-readable status line.
    fn update(&self, message: &str);
}

/// Sink that forwards updates over a channel to the rendering thread.
pub struct ChannelProgress {
    sender: mpsc::Sender<String>,
}

impl ChannelProgress {
    /// Creates a sink sending over the given channel.
    #[must_use]
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self { sender }
    }
}

impl ProgressSink for ChannelProgress {
    fn update(&self, message: &str) {
        // The receiver hanging up just means nobody is rendering anymore.
        let _ = self.sender.send(message.to_owned());
    }
}

/// Sink that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn update(&self, _message: &str) {}
}

/// Runs `job` on a background worker thread, rendering its status updates to
/// `stderr` until the job finishes, then returns the job's result.
///
/// # Errors
///
/// Returns [`InstallerError::WorkerPanicked`] if the worker thread panics;
/// otherwise propagates the job's own result.
pub fn run_on_worker<T, F>(stderr: &mut dyn Write, quiet: bool, job: F) -> Result<T>
where
    T: Send,
    F: FnOnce(&dyn ProgressSink) -> Result<T> + Send,
{
    let (sender, receiver) = mpsc::channel::<String>();
    std::thread::scope(|scope| {
        let worker = scope.spawn(move || {
            let sink = ChannelProgress::new(sender);
            job(&sink)
        });

        // Ends when the worker finishes and drops its sender.
        for message in receiver {
            if !quiet {
                let _ = writeln!(stderr, "{message}");
            }
        }

        worker.join().map_err(|_| InstallerError::WorkerPanicked)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_result_is_returned_and_updates_rendered_in_order() {
        let mut rendered = Vec::new();
        let result = run_on_worker(&mut rendered, false, |progress| {
            progress.update("step one");
            progress.update("step two");
            Ok(42)
        });

        assert_eq!(result.expect("job should succeed"), 42);
        let text = String::from_utf8(rendered).expect("rendered output is UTF-8");
        assert_eq!(text, "step one\nstep two\n");
    }

    #[test]
    fn quiet_mode_suppresses_rendering() {
        let mut rendered = Vec::new();
        let result = run_on_worker(&mut rendered, true, |progress| {
            progress.update("hidden");
            Ok(())
        });

        assert!(result.is_ok());
        assert!(rendered.is_empty());
    }

    #[test]
    fn job_errors_propagate() {
        let mut rendered = Vec::new();
        let result: Result<()> = run_on_worker(&mut rendered, true, |_progress| {
            Err(InstallerError::NotInstalled)
        });

        assert!(matches!(result, Err(InstallerError::NotInstalled)));
    }

    #[test]
    fn worker_panic_is_reported() {
        let mut rendered = Vec::new();
        let result: Result<()> =
            run_on_worker(&mut rendered, true, |_progress| panic!("worker exploded"));

        assert!(matches!(result, Err(InstallerError::WorkerPanicked)));
    }
}
