//! Line-Editor Adapter
//!
//! Binds the command registry to rustyline's hint, completion and highlight
//! callbacks. These run inside the editor's per-keystroke refresh, so they
//! only take a short shared borrow of the registry and never block.

use std::borrow::Cow;

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Helper};

use super::command::SharedRegistry;
use super::config::ConsoleConfig;
use super::style::{paint, Color, Style};

/// Color of hints and completion candidates
const SUGGESTION_COLOR: Color = Color::Yellow;

/// Color of a recognized command name
const COMMAND_COLOR: Color = Color::Green;

pub struct CommandHelper {
    registry: SharedRegistry,
    complete_on_empty: bool,
    color: bool,
}

impl CommandHelper {
    pub fn new(registry: SharedRegistry, config: &ConsoleConfig) -> Self {
        let mut helper = Self {
            registry,
            complete_on_empty: true,
            color: true,
        };
        helper.apply_config(config);
        helper
    }

    /// Pick up changed settings
    pub fn apply_config(&mut self, config: &ConsoleConfig) {
        self.complete_on_empty = config.complete_on_empty;
        self.color = config.color_enabled();
    }

    /// First registered name starting with `input`; nothing for empty input
    pub fn hint_for(&self, input: &str) -> Option<String> {
        if input.is_empty() {
            return None;
        }
        self.registry
            .borrow()
            .first_with_prefix(input)
            .map(|(key, _)| key.to_string())
    }

    /// Every registered name starting with `input`, in key order
    pub fn candidates_for(&self, input: &str) -> Vec<String> {
        if input.is_empty() && !self.complete_on_empty {
            return Vec::new();
        }
        self.registry
            .borrow()
            .prefix_range(input)
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Byte length of the leading token when it names a registered command
    pub fn command_span(&self, line: &str) -> Option<usize> {
        let token = line.split(' ').next().unwrap_or(line);
        if token.is_empty() {
            return None;
        }
        self.registry
            .borrow()
            .find_exact(token)
            .map(|_| token.len())
    }

    fn suggestion<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.color {
            Cow::Owned(paint(text, SUGGESTION_COLOR, Style::Normal, true))
        } else {
            Cow::Borrowed(text)
        }
    }
}

impl Helper for CommandHelper {}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        // The editor shows only the part past the cursor
        self.hint_for(line)
            .map(|key| key[line.len()..].to_string())
            .filter(|rest| !rest.is_empty())
    }
}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Names may contain spaces, so the whole input up to the cursor is the prefix
        let candidates = self
            .candidates_for(&line[..pos])
            .into_iter()
            .map(|key| Pair {
                display: key.clone(),
                replacement: key,
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match self.command_span(line) {
            Some(end) if self.color => Cow::Owned(format!(
                "{}{}",
                paint(&line[..end], COMMAND_COLOR, Style::Bold, true),
                &line[end..]
            )),
            _ => Cow::Borrowed(line),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        self.suggestion(hint)
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        _completion: CompletionType,
    ) -> Cow<'c, str> {
        self.suggestion(candidate)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        // The command span can change with any keystroke
        self.color
    }
}

impl Validator for CommandHelper {}
