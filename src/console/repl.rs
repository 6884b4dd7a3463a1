//! Console Core
//!
//! `Console` is the access point to the REPL session and the terminal: the
//! command registry and dispatcher, the scheduler step driven by the host,
//! and the session state (prompts, history, echo, output sink).
//!
//! Only one console may be alive per process. Building a second one while
//! the first exists fails with [`ConsoleError::AlreadyActive`].

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::command::{Command, CommandTrie, Context, SharedRegistry};
use super::config::ConsoleConfig;
use super::editor::{LineEditor, ReadOutcome, RustylineEditor};
use super::error::{ConsoleError, Result};
use super::history::History;
use super::host::Host;
use super::output::OutputHandle;
use super::style::{paint, Color, Style};
use super::terminal::{self, LineReader, Terminal, TtyTerminal};

static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Claim on the process-wide console slot, released on drop
struct InstanceSlot;

impl InstanceSlot {
    fn acquire() -> Result<Self> {
        ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| InstanceSlot)
            .map_err(|_| ConsoleError::AlreadyActive)
    }
}

impl Drop for InstanceSlot {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Hides terminal input until dropped, then makes it visible again
struct EchoGuard<'a> {
    terminal: &'a mut Box<dyn Terminal>,
}

impl<'a> EchoGuard<'a> {
    fn hide(terminal: &'a mut Box<dyn Terminal>) -> Self {
        if let Err(e) = terminal.set_echo(false) {
            log::debug!("failed to hide terminal input: {}", e);
        }
        Self { terminal }
    }
}

impl Drop for EchoGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.set_echo(true) {
            log::debug!("failed to restore terminal echo: {}", e);
        }
    }
}

/// Builder for [`Console`]; unset parts default to the real terminal
pub struct ConsoleBuilder {
    host: Box<dyn Host>,
    config: ConsoleConfig,
    editor: Option<Box<dyn LineEditor>>,
    terminal: Option<Box<dyn Terminal>>,
    input: Option<LineReader>,
    output: Option<OutputHandle>,
}

impl ConsoleBuilder {
    pub fn config(mut self, config: ConsoleConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the rustyline editor
    pub fn editor(mut self, editor: impl LineEditor + 'static) -> Self {
        self.editor = Some(Box::new(editor));
        self
    }

    pub fn terminal(mut self, terminal: impl Terminal + 'static) -> Self {
        self.terminal = Some(Box::new(terminal));
        self
    }

    /// Stream read by `read_line`/`read_pass`; stdin by default
    pub fn input(mut self, input: impl Read + 'static) -> Self {
        self.input = Some(LineReader::new(input));
        self
    }

    /// Output sink; stdout by default
    pub fn output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Some(OutputHandle::new(output));
        self
    }

    pub fn build(self) -> Result<Console> {
        let slot = InstanceSlot::acquire()?;
        let registry: SharedRegistry = Rc::new(RefCell::new(CommandTrie::new()));

        let editor = match self.editor {
            Some(editor) => editor,
            None => Box::new(RustylineEditor::new(registry.clone(), &self.config)?),
        };

        Ok(Console {
            registry,
            editor,
            terminal: self.terminal.unwrap_or_else(|| Box::new(TtyTerminal::stdin())),
            host: self.host,
            input: self.input.unwrap_or_else(LineReader::stdin),
            output: self.output.unwrap_or_else(OutputHandle::stdout),
            history: History::new(self.config.max_history_size, self.config.unique_history),
            config: self.config,
            history_file_path: None,
            default_prompt: String::new(),
            prompt: String::new(),
            echo: true,
            running: false,
            _slot: slot,
        })
    }
}

/// Interactive command console
pub struct Console {
    registry: SharedRegistry,
    editor: Box<dyn LineEditor>,
    terminal: Box<dyn Terminal>,
    host: Box<dyn Host>,
    input: LineReader,
    output: OutputHandle,
    history: History,
    config: ConsoleConfig,
    history_file_path: Option<PathBuf>,
    default_prompt: String,
    prompt: String,
    echo: bool,
    running: bool,
    // Released last, after the teardown in `Drop`
    _slot: InstanceSlot,
}

impl Console {
    /// Start building a console driven by `host`
    pub fn builder(host: impl Host + 'static) -> ConsoleBuilder {
        ConsoleBuilder {
            host: Box::new(host),
            config: ConsoleConfig::default(),
            editor: None,
            terminal: None,
            input: None,
            output: None,
        }
    }

    // --- Command registry -------------------------------------------------

    /// Register a command; an existing command with the same name is replaced
    pub fn add_command<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        invoke: F,
    ) where
        F: Fn(&mut Console, &Context) + 'static,
    {
        self.insert_command(Command::new(name, description, invoke));
    }

    /// Register a prepared command record
    pub fn insert_command(&mut self, command: Command) {
        let name = command.name.clone();
        if self.registry.borrow_mut().insert(name.clone(), Rc::new(command)).is_some() {
            log::trace!("command '{}' replaced", name);
        }
    }

    /// Remove a command by name; unknown names are ignored
    pub fn remove_command_by_name(&mut self, name: &str) {
        self.registry.borrow_mut().remove(name);
    }

    /// Number of registered commands
    pub fn command_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Check if a command with exactly this name is registered
    pub fn has_command(&self, name: &str) -> bool {
        self.registry.borrow().find_exact(name).is_some()
    }

    /// Name and description of every command, in name order
    pub fn commands(&self) -> Vec<(String, String)> {
        self.registry
            .borrow()
            .iter()
            .map(|(name, command)| (name.to_string(), command.description.clone()))
            .collect()
    }

    /// Registered names starting with `prefix`, in name order
    pub fn commands_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.registry
            .borrow()
            .prefix_range(prefix)
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Invoke the command named exactly `name`.
    ///
    /// Returns `false` when no such command exists. The command is resolved
    /// before it runs, so registry changes it makes only affect later lookups.
    pub fn invoke_command_by_name(&mut self, name: &str, ctx: &Context) -> bool {
        let command = self.registry.borrow().find_exact(name).cloned();
        match command {
            Some(command) => {
                (command.invoke)(self, ctx);
                true
            }
            None => false,
        }
    }

    /// Add `exit`, `help`, `history`, `clear` and `version`
    pub fn add_default_commands(&mut self) {
        super::commands::add_default_commands(self);
    }

    // --- Dispatch ---------------------------------------------------------

    /// Evaluate one line of user input.
    ///
    /// Blank input is ignored. Anything else is recorded in history, split on
    /// single spaces (runs of spaces yield empty arguments) and dispatched on
    /// its first token.
    pub fn evaluate(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        self.history.add(line);
        self.editor.add_history_entry(line);

        let mut tokens = line.split(' ').map(str::to_string);
        let name = tokens.next().unwrap_or_default();
        let ctx = Context::new(tokens.collect());

        if !self.invoke_command_by_name(&name, &ctx) {
            let message = format!("Command not found: {}", name);
            let message = self.paint(&message, Color::Red, Style::Normal);
            self.write_line(&message);
        }
    }

    // --- Scheduler --------------------------------------------------------

    /// Begin reading input: the host starts calling [`Console::step`]
    pub fn start(&mut self) {
        if !self.running {
            self.host.schedule_step();
            self.running = true;
        }
    }

    /// Stop reading input after the current read finishes
    pub fn stop(&mut self) {
        if self.running {
            self.host.cancel_step();
            self.running = false;
        }
    }

    /// Check if the console is currently reading user input
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Read one line with the current prompt and dispatch it.
    ///
    /// Blocks until the line is complete. End of input shuts the host down.
    pub fn step(&mut self) -> Result<()> {
        let prompt = self.prompt.clone();
        match self.editor.read_line(&prompt)? {
            ReadOutcome::Line(line) => self.evaluate(&line),
            ReadOutcome::Interrupted => {}
            ReadOutcome::Eof => {
                log::debug!("end of input");
                self.host.quit();
            }
        }
        Ok(())
    }

    /// Ask the host application to shut down
    pub fn quit(&mut self) {
        self.host.quit();
    }

    // --- Prompt -----------------------------------------------------------

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn default_prompt(&self) -> &str {
        &self.default_prompt
    }

    /// Set the current prompt only
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Set the default prompt and make it current
    pub fn set_default_prompt(&mut self, prompt: impl Into<String>) {
        self.default_prompt = prompt.into();
        self.prompt = self.default_prompt.clone();
    }

    /// Reset the current prompt to the default prompt
    pub fn reset_prompt(&mut self) {
        self.prompt = self.default_prompt.clone();
    }

    // --- History ----------------------------------------------------------

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_file_path(&self) -> Option<&Path> {
        self.history_file_path.as_deref()
    }

    /// Set the history file and load it.
    ///
    /// Missing parent directories and a missing file are created. Failures
    /// are logged and leave the session without persisted history.
    pub fn set_history_file_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();

        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = fs::create_dir_all(parent) {
                    log::warn!("cannot create history directory {}: {}", parent.display(), e);
                }
            }
            if let Err(e) = File::create(path) {
                log::warn!("cannot create history file {}: {}", path.display(), e);
            }
        }

        self.history_file_path = Some(path.to_path_buf());

        match History::read_file(path) {
            Ok(entries) => {
                log::debug!("loaded {} history entries from {}", entries.len(), path.display());
                for entry in entries {
                    self.editor.add_history_entry(&entry.text);
                    self.history.push(entry);
                }
            }
            Err(e) => log::warn!("cannot read history file {}: {}", path.display(), e),
        }
    }

    /// Write the history to the history file, if one is set
    pub fn save_history(&self) {
        if let Some(path) = &self.history_file_path {
            if let Err(e) = self.history.save(path) {
                log::warn!("cannot save history to {}: {}", path.display(), e);
            }
        }
    }

    // --- Terminal ---------------------------------------------------------

    /// Show or hide typed input at the terminal level
    pub fn set_stdin_echo(&mut self, enable: bool) {
        if let Err(e) = self.terminal.set_echo(enable) {
            log::debug!("terminal echo control failed: {}", e);
        }
        self.echo = enable;
    }

    pub fn stdin_echo(&self) -> bool {
        self.echo
    }

    /// Print `prompt` and block until a line is read from the input stream.
    ///
    /// Independent of the line editor. End of input yields an empty string.
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        read_prompted(&mut self.input, &mut self.output, prompt)
    }

    /// Like [`Console::read_line`], with typed input hidden
    pub fn read_pass(&mut self, prompt: &str) -> Result<String> {
        let line = {
            let _hidden = EchoGuard::hide(&mut self.terminal);
            read_prompted(&mut self.input, &mut self.output, prompt)
        };
        self.echo = true;
        if let Err(e) = writeln!(self.output) {
            log::debug!("console output failed: {}", e);
        }
        line
    }

    /// Clear the visible screen
    pub fn clear_screen(&mut self) {
        if let Err(e) = terminal::clear_screen(&mut self.output) {
            log::debug!("failed to clear screen: {}", e);
        }
    }

    // --- Output -----------------------------------------------------------

    /// Shared handle on the output sink, for writers and the logger
    pub fn output(&self) -> OutputHandle {
        self.output.clone()
    }

    /// Replace the output sink; the previous sink is flushed and closed
    pub fn set_output(&mut self, output: impl Write + Send + 'static) {
        self.output.replace(output);
    }

    /// Write a line to the output sink
    pub fn write_line(&self, line: &str) {
        if let Err(e) = self.output.write_line(line) {
            log::debug!("console output failed: {}", e);
        }
    }

    /// Colorize `text` unless color is disabled
    pub fn paint(&self, text: &str, color: Color, style: Style) -> String {
        paint(text, color, style, self.config.color_enabled())
    }

    // --- Settings ---------------------------------------------------------

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.config.version = version.into();
    }

    /// Set the maximum number of saved history items
    pub fn set_max_history_size(&mut self, size: usize) {
        self.config.max_history_size = size;
        self.history.set_max_size(size);
        self.reconfigure_editor();
    }

    /// Discard older duplicates when a line is repeated
    pub fn set_unique_history(&mut self, unique: bool) {
        self.config.unique_history = unique;
        self.history.set_unique(unique);
        self.reconfigure_editor();
    }

    pub fn set_word_break_characters(&mut self, characters: &str) {
        self.config.word_break_characters = characters.to_string();
        self.reconfigure_editor();
    }

    /// Maximum number of completions shown before paginating
    pub fn set_completion_count_cutoff(&mut self, cutoff: usize) {
        self.config.completion_count_cutoff = cutoff;
        self.reconfigure_editor();
    }

    pub fn set_double_tab_completion(&mut self, enable: bool) {
        self.config.double_tab_completion = enable;
        self.reconfigure_editor();
    }

    pub fn set_complete_on_empty(&mut self, enable: bool) {
        self.config.complete_on_empty = enable;
        self.reconfigure_editor();
    }

    pub fn set_beep_on_ambiguous_completion(&mut self, enable: bool) {
        self.config.beep_on_ambiguous_completion = enable;
        self.reconfigure_editor();
    }

    pub fn set_no_color(&mut self, disable: bool) {
        self.config.no_color = disable;
        self.reconfigure_editor();
    }

    fn reconfigure_editor(&mut self) {
        if let Err(e) = self.editor.configure(&self.config) {
            log::warn!("failed to apply editor settings: {}", e);
        }
    }
}

fn read_prompted(
    input: &mut LineReader,
    output: &mut OutputHandle,
    prompt: &str,
) -> Result<String> {
    output.write_all(prompt.as_bytes())?;
    output.flush()?;
    Ok(input.read_line()?.unwrap_or_default())
}

impl Drop for Console {
    fn drop(&mut self) {
        if self.running {
            self.editor.clear_line();
        }
        if self.history_file_path.is_some() {
            self.save_history();
        }
        if !self.echo {
            self.set_stdin_echo(true);
        }
        let _ = self.output.flush();
    }
}
