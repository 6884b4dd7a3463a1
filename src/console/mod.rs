//! Console Module
//!
//! An embeddable interactive command console: a prefix-trie command registry,
//! a rustyline-backed line editor with hints, completion and highlighting,
//! and a step-driven REPL that an external host loop drives.
//!
//! ## Module Structure
//!
//! - `trie` - Byte-keyed prefix trie
//! - `command` - Command records and execution context
//! - `repl` - The `Console` itself: registry, dispatch, scheduler, session state
//! - `commands` - Default command set
//! - `helper` - Hint, completion and highlight callbacks for the editor
//! - `editor` - Line editor seam and its rustyline implementation
//! - `host` - Host loop integration
//! - `history` - Timestamped interaction history
//! - `terminal` - Echo control, screen clearing, direct line reads
//! - `output` - Shared, replaceable output sink
//! - `logger` - `log` backend writing to the output sink
//! - `config` - Console settings
//! - `style` - ANSI colors

pub mod command;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod helper;
pub mod history;
pub mod host;
pub mod logger;
pub mod output;
pub mod repl;
pub mod style;
pub mod terminal;
pub mod trie;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use command::{Command, Context};
pub use commands::DefaultCommand;
pub use config::ConsoleConfig;
pub use editor::{LineEditor, ReadOutcome, RustylineEditor};
pub use error::{ConsoleError, Result};
pub use history::{History, HistoryEntry};
pub use host::{Host, LocalHost};
pub use output::OutputHandle;
pub use repl::{Console, ConsoleBuilder};
pub use style::{colorize, Color, Style};
pub use terminal::{Terminal, TtyTerminal};
pub use trie::Trie;
