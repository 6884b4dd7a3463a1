//! Console Logger
//!
//! `log` backend that writes records to the console's output sink, so log
//! lines and command output share one stream. Warnings and errors get a
//! colored `Warning:`/`Error:` prefix.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

use super::output::OutputHandle;
use super::style::{paint, Color, Style};

pub struct ConsoleLogger {
    output: OutputHandle,
    level: LevelFilter,
    color: bool,
}

impl ConsoleLogger {
    pub fn new(output: OutputHandle, level: LevelFilter, color: bool) -> Self {
        Self {
            output,
            level,
            color,
        }
    }

    /// Render a record the way it appears on the console
    pub fn format(&self, level: Level, message: &str) -> String {
        match level {
            Level::Error => self.alert(&format!("Error: {}", message)),
            Level::Warn => self.alert(&format!("Warning: {}", message)),
            Level::Info | Level::Debug | Level::Trace => message.to_string(),
        }
    }

    fn alert(&self, text: &str) -> String {
        paint(text, Color::Red, Style::Normal, self.color)
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format(record.level(), &record.args().to_string());
        let _ = self.output.write_line(&line);
    }

    fn flush(&self) {
        let _ = self.output.clone().flush();
    }
}

/// Install a [`ConsoleLogger`] writing to `output` as the global logger
pub fn init(output: OutputHandle, level: LevelFilter, color: bool) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger::new(output, level, color)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::output::SharedBuffer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn logger(buffer: &SharedBuffer, level: LevelFilter, color: bool) -> ConsoleLogger {
        ConsoleLogger::new(OutputHandle::new(buffer.clone()), level, color)
    }

    #[test]
    fn test_prefixes() {
        let buffer = SharedBuffer::new();
        let logger = logger(&buffer, LevelFilter::Trace, false);
        assert_eq!(logger.format(Level::Error, "boom"), "Error: boom");
        assert_eq!(logger.format(Level::Warn, "careful"), "Warning: careful");
        assert_eq!(logger.format(Level::Info, "fyi"), "fyi");

        let colored = self::logger(&buffer, LevelFilter::Trace, true);
        assert_eq!(colored.format(Level::Error, "boom"), "\x1b[0;31mError: boom\x1b[0m");
    }

    #[test]
    fn test_level_filtering() {
        let buffer = SharedBuffer::new();
        let logger = logger(&buffer, LevelFilter::Warn, false);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("shown"))
                .build(),
        );

        assert_eq!(buffer.contents(), "Warning: shown\n");
    }

    struct FlushCounter {
        flushes: Arc<AtomicUsize>,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_flush_reaches_sink() {
        let flushes = Arc::new(AtomicUsize::new(0));
        let sink = FlushCounter {
            flushes: flushes.clone(),
        };
        let logger = ConsoleLogger::new(OutputHandle::new(sink), LevelFilter::Info, false);

        logger.flush();
        assert_eq!(flushes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_init_installs_global_logger() {
        let buffer = SharedBuffer::new();
        init(OutputHandle::new(buffer.clone()), LevelFilter::Warn, false).unwrap();

        log::warn!("disk almost full");
        log::info!("not shown");
        assert!(buffer.contents().contains("Warning: disk almost full\n"));
        assert!(!buffer.contents().contains("not shown"));

        let second = SharedBuffer::new();
        assert!(init(OutputHandle::new(second), LevelFilter::Warn, false).is_err());
    }
}
