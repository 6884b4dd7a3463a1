//! Line Editor Module
//!
//! The interactive line editor the scheduler reads from. `LineEditor` is the
//! seam the console depends on; `RustylineEditor` is the terminal-backed
//! implementation wired to the command registry through [`CommandHelper`].

use std::io;

use rustyline::config::{BellStyle, ColorMode, CompletionType, Config, Configurer};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use super::command::SharedRegistry;
use super::config::ConsoleConfig;
use super::error::Result;
use super::helper::CommandHelper;
use super::terminal::clear_current_line;

/// Result of one blocking line read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The user pressed Ctrl-C
    Interrupted,
    /// The input stream ended (Ctrl-D)
    Eof,
}

/// Interactive line editor used by the scheduler step
pub trait LineEditor {
    /// Block until a full line is entered or input ends
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Make `line` reachable through history navigation
    fn add_history_entry(&mut self, line: &str);

    /// Apply changed settings
    fn configure(&mut self, config: &ConsoleConfig) -> Result<()>;

    /// Erase whatever the editor left on the current terminal line
    fn clear_line(&mut self);
}

pub struct RustylineEditor {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Create an editor whose hints, completions and highlighting come from `registry`
    pub fn new(registry: SharedRegistry, config: &ConsoleConfig) -> Result<Self> {
        let mut editor = Editor::with_config(editor_config(config)?)?;
        editor.set_helper(Some(CommandHelper::new(registry, config)));
        Ok(Self { editor })
    }
}

fn completion_type(config: &ConsoleConfig) -> CompletionType {
    if config.double_tab_completion {
        CompletionType::List
    } else {
        CompletionType::Circular
    }
}

fn bell_style(config: &ConsoleConfig) -> BellStyle {
    if config.beep_on_ambiguous_completion {
        BellStyle::Audible
    } else {
        BellStyle::None
    }
}

fn color_mode(config: &ConsoleConfig) -> ColorMode {
    if config.no_color {
        ColorMode::Disabled
    } else {
        ColorMode::Enabled
    }
}

fn editor_config(config: &ConsoleConfig) -> Result<Config> {
    Ok(Config::builder()
        .max_history_size(config.max_history_size)?
        .history_ignore_dups(config.unique_history)?
        .auto_add_history(false)
        .completion_type(completion_type(config))
        .completion_prompt_limit(config.completion_count_cutoff)
        .bell_style(bell_style(config))
        .color_mode(color_mode(config))
        .build())
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history_entry(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            log::debug!("editor rejected history entry: {}", e);
        }
    }

    fn configure(&mut self, config: &ConsoleConfig) -> Result<()> {
        self.editor.set_max_history_size(config.max_history_size)?;
        self.editor.set_history_ignore_dups(config.unique_history)?;
        self.editor.set_completion_type(completion_type(config));
        self.editor.set_completion_prompt_limit(config.completion_count_cutoff);
        self.editor.set_bell_style(bell_style(config));
        self.editor.set_color_mode(color_mode(config));
        if let Some(helper) = self.editor.helper_mut() {
            helper.apply_config(config);
        }
        Ok(())
    }

    fn clear_line(&mut self) {
        let _ = clear_current_line(&mut io::stdout());
    }
}
