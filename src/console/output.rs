//! Output Sink Module
//!
//! The console writes all interactive output through one replaceable sink.
//! The sink sits behind `Arc<Mutex<..>>` so the logger, which the `log`
//! facade requires to be `Send + Sync`, can share it with the console.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

type Sink = Box<dyn Write + Send>;

/// Shared handle to the console's output sink
#[derive(Clone)]
pub struct OutputHandle {
    sink: Arc<Mutex<Sink>>,
}

impl OutputHandle {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    /// Handle writing to the process stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Install a new sink; the previous one is flushed and dropped
    pub fn replace(&self, sink: impl Write + Send + 'static) {
        let mut guard = self.lock();
        let _ = guard.flush();
        *guard = Box::new(sink);
    }

    /// Write `line` followed by a newline and flush
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self.lock();
        guard.write_all(line.as_bytes())?;
        guard.write_all(b"\n")?;
        guard.flush()
    }

    fn lock(&self) -> MutexGuard<'_, Sink> {
        // A panic mid-write leaves the sink usable
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for OutputHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock().write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

/// In-memory sink whose contents stay readable after it is handed over
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
