//! termcon - embeddable interactive command console
//!
//! This library provides a line-oriented command console for host
//! applications: commands are registered by name at runtime, typed input is
//! hinted, completed and highlighted against the registry, and each entered
//! line is dispatched to the matching command.
//!
//! # Features
//!
//! - **Command Registry**: Prefix-trie keyed by command name, mutable from inside commands
//! - **Line Editing**: Hints, completion and highlighting through rustyline
//! - **History**: Timestamped, optionally unique, persisted to a file
//! - **Host Integration**: Step-driven REPL with a tokio host loop
//! - **Credential Prompts**: Blocking line and password reads with echo control
//! - **Logging**: `log` records written to the console's own output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use termcon::console::{Console, LocalHost};
//!
//! # async fn run() -> termcon::console::Result<()> {
//! let host = LocalHost::new();
//! let mut console = Console::builder(host.clone()).build()?;
//!
//! console.add_default_commands();
//! console.add_command("greet", "Say hello.", |console, ctx| {
//!     console.write_line(&format!("Hello, {}!", ctx.arg(0).unwrap_or("world")));
//! });
//! console.set_default_prompt("> ");
//!
//! console.start();
//! host.drive(&mut console).await?;
//! # Ok(())
//! # }
//! ```

pub mod console;

// Re-export commonly used types for convenience
pub use console::{Command, Console, ConsoleConfig, ConsoleError, Context, Host, LocalHost};
