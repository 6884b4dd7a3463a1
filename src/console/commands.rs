//! Default Commands Module
//!
//! The built-in command set every console can opt into: `exit`, `help`,
//! `history`, `clear` and `version`.

use std::fmt;

use super::command::Context;
use super::repl::Console;
use super::style::{Color, Style};

/// Built-in console commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCommand {
    Exit,
    Help,
    History,
    Clear,
    Version,
}

impl DefaultCommand {
    /// Name the command is registered under
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Help => "help",
            Self::History => "history",
            Self::Clear => "clear",
            Self::Version => "version",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Exit => "Exit the application.",
            Self::Help => "Print help information.",
            Self::History => "Print command history.",
            Self::Clear => "Clear the screen.",
            Self::Version => "Print the application version.",
        }
    }

    pub fn all_commands() -> Vec<Self> {
        vec![Self::Exit, Self::Help, Self::History, Self::Clear, Self::Version]
    }

    /// Execute the command against `console`
    pub fn run(&self, console: &mut Console, _ctx: &Context) {
        match self {
            Self::Exit => console.quit(),
            Self::Help => print_help(console),
            Self::History => print_history(console),
            Self::Clear => console.clear_screen(),
            Self::Version => {
                let version = console.version().to_string();
                console.write_line(&version);
            }
        }
    }
}

impl fmt::Display for DefaultCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Register every [`DefaultCommand`] on `console`
pub fn add_default_commands(console: &mut Console) {
    for command in DefaultCommand::all_commands() {
        console.add_command(command.name(), command.description(), move |console, ctx| {
            command.run(console, ctx)
        });
    }
}

fn print_help(console: &Console) {
    let mut text = String::from("\nList of commands:\n\n");
    for (name, description) in console.commands() {
        let name = console.paint(&name, Color::Green, Style::Bold);
        text.push_str(&format!("{}: {}\n", name, description));
    }
    text.push_str("\nUsage: <command> [arguments...]\n");
    console.write_line(&text);
}

fn print_history(console: &Console) {
    for (index, entry) in console.history().iter().enumerate() {
        let stamp = console.paint(&entry.timestamp_string(), Color::Blue, Style::Bold);
        console.write_line(&format!("{:>4} {} {}", index, stamp, entry.text));
    }
}
