//! Host Integration Module
//!
//! The console does not own a loop. It asks its host to call
//! [`Console::step`] repeatedly while running, and to shut the application
//! down on end of input. `LocalHost` provides both on a tokio current-thread
//! runtime: the driver runs one step, then yields so other local tasks
//! (timers, signal handlers) run between lines.

use std::cell::Cell;
use std::rc::Rc;

use tokio::sync::Notify;

use super::error::Result;
use super::repl::Console;

/// Capabilities the console needs from the application hosting it
pub trait Host {
    /// Start invoking the console step repeatedly, with no minimum delay
    fn schedule_step(&mut self);

    /// Stop invoking the console step
    fn cancel_step(&mut self);

    /// Shut the whole application down
    fn quit(&mut self);
}

#[derive(Default)]
struct HostState {
    scheduled: Cell<bool>,
    quit: Cell<bool>,
    wake: Notify,
}

/// Tokio-driven host for a console living on the current thread
#[derive(Clone, Default)]
pub struct LocalHost {
    state: Rc<HostState>,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the driver to return; safe to call from any local task
    pub fn request_quit(&self) {
        self.state.quit.set(true);
        self.state.wake.notify_one();
    }

    pub fn quit_requested(&self) -> bool {
        self.state.quit.get()
    }

    pub fn step_scheduled(&self) -> bool {
        self.state.scheduled.get()
    }

    /// Drive `console` until shutdown is requested.
    ///
    /// Must run inside a `LocalSet` (or on a current-thread runtime) since
    /// the console is not `Send`. Each step blocks the thread for one line.
    pub async fn drive(&self, console: &mut Console) -> Result<()> {
        loop {
            if self.quit_requested() {
                log::debug!("host shutdown requested");
                return Ok(());
            }

            if self.step_scheduled() {
                console.step()?;
                tokio::task::yield_now().await;
            } else {
                self.state.wake.notified().await;
            }
        }
    }
}

impl Host for LocalHost {
    fn schedule_step(&mut self) {
        self.state.scheduled.set(true);
        self.state.wake.notify_one();
    }

    fn cancel_step(&mut self) {
        self.state.scheduled.set(false);
    }

    fn quit(&mut self) {
        self.request_quit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    use crate::console::editor::ReadOutcome;
    use crate::console::output::SharedBuffer;
    use crate::console::testing::{console_lock, RecordingTerminal, ScriptedEditor};

    fn line(text: &str) -> ReadOutcome {
        ReadOutcome::Line(text.to_string())
    }

    #[test]
    fn test_local_host_flags() {
        let mut host = LocalHost::new();
        let observer = host.clone();

        assert!(!observer.step_scheduled());
        host.schedule_step();
        assert!(observer.step_scheduled());
        host.cancel_step();
        assert!(!observer.step_scheduled());

        assert!(!observer.quit_requested());
        host.quit();
        assert!(observer.quit_requested());
    }

    #[test]
    fn test_drive_follows_start_and_stop() {
        let _lock = console_lock();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let local = tokio::task::LocalSet::new();

        let host = LocalHost::new();
        let editor = ScriptedEditor::new(vec![
            line("ping"),
            line("pause"),
            line("ping"),
            ReadOutcome::Eof,
        ]);
        let prompts = editor.log();
        let mut console = Console::builder(host.clone())
            .editor(editor)
            .terminal(RecordingTerminal::default())
            .input(Cursor::new(Vec::new()))
            .output(SharedBuffer::new())
            .build()
            .unwrap();

        let pings = Rc::new(Cell::new(0));
        let counter = pings.clone();
        console.add_command("ping", "Count.", move |_, _| counter.set(counter.get() + 1));
        console.add_command("pause", "Stop reading.", |console, _| console.stop());

        local.block_on(&runtime, async {
            console.start();

            // Stopped from inside a command: the driver parks instead of stepping
            let parked = tokio::time::timeout(Duration::from_millis(50), host.drive(&mut console));
            assert!(parked.await.is_err());
            assert_eq!(prompts.borrow().prompts.len(), 2);
            assert_eq!(pings.get(), 1);
            assert!(!console.is_running());
            assert!(!host.step_scheduled());
            assert!(!host.quit_requested());

            // Restarting wakes the driver; end of input then quits it
            console.start();
            host.drive(&mut console).await.unwrap();
        });

        assert_eq!(prompts.borrow().prompts.len(), 4);
        assert_eq!(pings.get(), 2);
        assert!(host.quit_requested());
    }

    #[test]
    fn test_drive_returns_on_requested_quit() {
        let _lock = console_lock();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let local = tokio::task::LocalSet::new();

        let host = LocalHost::new();
        let editor = ScriptedEditor::new(Vec::new());
        let prompts = editor.log();
        let mut console = Console::builder(host.clone())
            .editor(editor)
            .terminal(RecordingTerminal::default())
            .input(Cursor::new(Vec::new()))
            .output(SharedBuffer::new())
            .build()
            .unwrap();

        local.block_on(&runtime, async {
            // Never started, so only the quit request can end the drive
            let shutdown = host.clone();
            tokio::task::spawn_local(async move { shutdown.request_quit() });
            host.drive(&mut console).await.unwrap();
        });

        assert!(prompts.borrow().prompts.is_empty());
    }
}
