//! Command Records Module
//!
//! The record stored in the registry for every invokable command, plus the
//! execution context handed to it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::repl::Console;
use super::trie::Trie;

/// Callback run when a command is invoked
pub type Callback = Rc<dyn Fn(&mut Console, &Context)>;

/// Registry of commands keyed by name
pub type CommandTrie = Trie<Rc<Command>>;

/// Registry shared between the console and the line-editor adapter
pub type SharedRegistry = Rc<RefCell<CommandTrie>>;

/// Command execution environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// The arguments used to invoke the command, without the command name
    pub arguments: Vec<String>,
}

impl Context {
    pub fn new(arguments: Vec<String>) -> Self {
        Self { arguments }
    }

    /// Get the argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Context {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// An invokable command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub invoke: Callback,
}

impl Command {
    /// Create a new command from any compatible closure
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, invoke: F) -> Self
    where
        F: Fn(&mut Console, &Context) + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            invoke: Rc::new(invoke),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_tokens() {
        let ctx: Context = ["a", "", "b"].into_iter().collect();
        assert_eq!(ctx.arguments, vec!["a", "", "b"]);
        assert_eq!(ctx.arg(2), Some("b"));
        assert_eq!(ctx.arg(3), None);
        assert!(Context::default().is_empty());
    }

    #[test]
    fn test_command_debug_omits_callback() {
        let cmd = Command::new("ping", "Reply with pong", |_, _| {});
        let text = format!("{:?}", cmd);
        assert!(text.contains("ping"));
        assert!(text.contains("Reply with pong"));
    }
}
