//! In-memory doubles for driving a console in unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Cursor};
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard};

use super::config::ConsoleConfig;
use super::editor::{LineEditor, ReadOutcome};
use super::error::Result;
use super::host::Host;
use super::output::SharedBuffer;
use super::repl::Console;
use super::terminal::Terminal;

/// Consoles are process-wide singletons, so tests building one run one at a time
static CONSOLE_LOCK: Mutex<()> = Mutex::new(());

/// Hold while a console built outside [`Harness`] is alive
pub(crate) fn console_lock() -> MutexGuard<'static, ()> {
    CONSOLE_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, Default)]
pub(crate) struct EditorLog {
    pub prompts: Vec<String>,
    pub history: Vec<String>,
    pub configured: usize,
    pub cleared: bool,
}

/// Line editor replaying a fixed script, then reporting end of input
pub(crate) struct ScriptedEditor {
    script: VecDeque<ReadOutcome>,
    log: Rc<RefCell<EditorLog>>,
}

impl ScriptedEditor {
    pub fn new(script: Vec<ReadOutcome>) -> Self {
        Self {
            script: script.into(),
            log: Rc::default(),
        }
    }

    pub fn log(&self) -> Rc<RefCell<EditorLog>> {
        self.log.clone()
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        self.log.borrow_mut().prompts.push(prompt.to_string());
        Ok(self.script.pop_front().unwrap_or(ReadOutcome::Eof))
    }

    fn add_history_entry(&mut self, line: &str) {
        self.log.borrow_mut().history.push(line.to_string());
    }

    fn configure(&mut self, _config: &ConsoleConfig) -> Result<()> {
        self.log.borrow_mut().configured += 1;
        Ok(())
    }

    fn clear_line(&mut self) {
        self.log.borrow_mut().cleared = true;
    }
}

#[derive(Debug, Default)]
pub(crate) struct HostLog {
    pub scheduled: usize,
    pub cancelled: usize,
    pub quits: usize,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingHost {
    pub log: Rc<RefCell<HostLog>>,
}

impl Host for RecordingHost {
    fn schedule_step(&mut self) {
        self.log.borrow_mut().scheduled += 1;
    }

    fn cancel_step(&mut self) {
        self.log.borrow_mut().cancelled += 1;
    }

    fn quit(&mut self) {
        self.log.borrow_mut().quits += 1;
    }
}

/// Terminal recording every echo change
#[derive(Clone, Default)]
pub(crate) struct RecordingTerminal {
    pub changes: Rc<RefCell<Vec<bool>>>,
}

impl Terminal for RecordingTerminal {
    fn set_echo(&mut self, enabled: bool) -> io::Result<()> {
        self.changes.borrow_mut().push(enabled);
        Ok(())
    }
}

/// A console wired to in-memory doubles.
///
/// Field order matters: the console is dropped before the lock is released.
pub(crate) struct Harness {
    pub console: Console,
    pub buffer: SharedBuffer,
    pub host: Rc<RefCell<HostLog>>,
    pub editor: Rc<RefCell<EditorLog>>,
    pub echo: Rc<RefCell<Vec<bool>>>,
    _lock: MutexGuard<'static, ()>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_script(Vec::new(), "")
    }

    /// Console whose editor replays `script` and whose input stream is `input`
    pub fn with_script(script: Vec<ReadOutcome>, input: &str) -> Self {
        Self::with_config(ConsoleConfig::default(), script, input)
    }

    pub fn with_config(config: ConsoleConfig, script: Vec<ReadOutcome>, input: &str) -> Self {
        let lock = console_lock();

        let host = RecordingHost::default();
        let editor = ScriptedEditor::new(script);
        let terminal = RecordingTerminal::default();
        let buffer = SharedBuffer::new();

        let host_log = host.log.clone();
        let editor_log = editor.log();
        let echo = terminal.changes.clone();

        let console = Console::builder(host)
            .config(config)
            .editor(editor)
            .terminal(terminal)
            .input(Cursor::new(input.as_bytes().to_vec()))
            .output(buffer.clone())
            .build()
            .expect("no other console is alive");

        Self {
            console,
            buffer,
            host: host_log,
            editor: editor_log,
            echo,
            _lock: lock,
        }
    }

    /// Everything written to the console output so far
    pub fn output(&self) -> String {
        self.buffer.contents()
    }
}
