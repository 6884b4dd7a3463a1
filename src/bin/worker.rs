//! termcon-worker - Console on a Worker Thread
//!
//! The console lives on its own thread with its own current-thread runtime,
//! so the main thread is never blocked by line reads. Commands do not touch
//! main-thread state: they send an [`Effect`] over a channel and the main
//! thread applies it to the document it owns.

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use log::LevelFilter;
use tokio::sync::mpsc::{self, UnboundedSender};

use termcon::console::{logger, Color, Console, LocalHost, Style};

const HISTORY_PATH: &str = "history.txt";

/// Change requested by the console thread
#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    SetText(String),
    Append(String),
    Show,
}

/// State owned by the main thread
#[derive(Debug)]
struct Document {
    text: String,
    ticks: u64,
}

impl Document {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ticks: 0,
        }
    }

    /// Apply an effect, returning a line to report if there is one
    fn apply(&mut self, effect: Effect) -> Option<String> {
        match effect {
            Effect::SetText(text) => {
                self.text = text;
                None
            }
            Effect::Append(text) => {
                if !self.text.is_empty() && !text.is_empty() {
                    self.text.push(' ');
                }
                self.text.push_str(&text);
                None
            }
            Effect::Show => Some(format!("[main thread, {} ticks] {}", self.ticks, self.text)),
        }
    }
}

fn main() -> Result<()> {
    let (effects, mut inbox) = mpsc::unbounded_channel();

    let worker = thread::Builder::new()
        .name("console".to_string())
        .spawn(move || run_console(effects))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut document = Document::new("You can change this text from the console!");

    runtime.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                effect = inbox.recv() => match effect {
                    Some(effect) => {
                        if let Some(line) = document.apply(effect) {
                            log::info!("{}", line);
                        }
                    }
                    // The console thread dropped its sender: it has shut down
                    None => break,
                },
                _ = interval.tick() => document.ticks += 1,
            }
        }
    });

    worker
        .join()
        .map_err(|_| anyhow!("console thread panicked"))?
}

/// Build and drive the console; runs on the worker thread
fn run_console(effects: UnboundedSender<Effect>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();

    local.block_on(&runtime, async move {
        let host = LocalHost::new();
        let mut console = Console::builder(host.clone()).build()?;

        logger::init(console.output(), LevelFilter::Info, console.config().color_enabled())?;

        console.add_default_commands();
        console.set_history_file_path(HISTORY_PATH);
        let prompt = console.paint(">> ", Color::Red, Style::Bold);
        console.set_default_prompt(prompt);
        add_effect_commands(&mut console, effects);

        let shutdown = host.clone();
        tokio::task::spawn_local(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.request_quit();
            }
        });

        console.start();
        host.drive(&mut console).await?;
        Ok::<_, anyhow::Error>(())
    })
}

fn add_effect_commands(console: &mut Console, effects: UnboundedSender<Effect>) {
    let sender = effects.clone();
    console.add_command(
        "set-text",
        "Change the text owned by the main thread.",
        move |_, ctx| send(&sender, Effect::SetText(ctx.arguments.join(" "))),
    );

    let sender = effects.clone();
    console.add_command(
        "append-text",
        "Append to the text owned by the main thread.",
        move |_, ctx| send(&sender, Effect::Append(ctx.arguments.join(" "))),
    );

    console.add_command(
        "show",
        "Ask the main thread to print its text.",
        move |_, _| send(&effects, Effect::Show),
    );
}

fn send(effects: &UnboundedSender<Effect>, effect: Effect) {
    if effects.send(effect).is_err() {
        log::warn!("The main thread is no longer listening.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_effects() {
        let mut document = Document::new("hello");

        assert_eq!(document.apply(Effect::Append("world".to_string())), None);
        assert_eq!(document.text, "hello world");

        assert_eq!(document.apply(Effect::SetText("fresh".to_string())), None);
        document.ticks = 3;
        assert_eq!(
            document.apply(Effect::Show).as_deref(),
            Some("[main thread, 3 ticks] fresh")
        );
    }

    #[test]
    fn test_append_to_empty_text() {
        let mut document = Document::new("");
        document.apply(Effect::Append("first".to_string()));
        assert_eq!(document.text, "first");
    }

    #[test]
    fn test_effects_cross_threads_in_order() {
        let (effects, mut inbox) = mpsc::unbounded_channel();

        thread::spawn(move || {
            send(&effects, Effect::SetText("from worker".to_string()));
            send(&effects, Effect::Show);
        })
        .join()
        .unwrap();

        let mut document = Document::new("");
        let mut report = None;
        while let Ok(effect) = inbox.try_recv() {
            report = document.apply(effect).or(report);
        }
        assert_eq!(report.as_deref(), Some("[main thread, 0 ticks] from worker"));
    }
}
