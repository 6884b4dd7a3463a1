//! Terminal Control Module
//!
//! Echo control, screen clearing and the direct blocking line reader used
//! by credential prompts. Hiding input clears only the termios `ECHO` flag,
//! so line buffering, signals and output processing stay as they were.

use std::io::{self, Read, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};

#[cfg(unix)]
use nix::sys::termios::{self, LocalFlags, SetArg};
#[cfg(unix)]
use std::os::fd::AsFd;

/// OS-level terminal echo control
pub trait Terminal {
    /// Show (`true`) or hide (`false`) typed input
    fn set_echo(&mut self, enabled: bool) -> io::Result<()>;
}

/// Echo control on a terminal file descriptor, stdin by default
#[derive(Debug)]
pub struct TtyTerminal<F = io::Stdin> {
    fd: F,
}

impl TtyTerminal {
    pub fn stdin() -> Self {
        Self { fd: io::stdin() }
    }
}

impl Default for TtyTerminal {
    fn default() -> Self {
        Self::stdin()
    }
}

impl<F> TtyTerminal<F> {
    /// Control echo on another terminal, such as a pty
    pub fn new(fd: F) -> Self {
        Self { fd }
    }
}

#[cfg(unix)]
impl<F: AsFd> Terminal for TtyTerminal<F> {
    fn set_echo(&mut self, enabled: bool) -> io::Result<()> {
        let mut tty = termios::tcgetattr(self.fd.as_fd())?;
        tty.local_flags.set(LocalFlags::ECHO, enabled);
        termios::tcsetattr(self.fd.as_fd(), SetArg::TCSANOW, &tty)?;
        Ok(())
    }
}

#[cfg(not(unix))]
impl<F> Terminal for TtyTerminal<F> {
    fn set_echo(&mut self, _enabled: bool) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}

/// Clear the visible screen and move the cursor home
pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    out.flush()
}

/// Erase the line the cursor is on
pub fn clear_current_line<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(b"\r")?;
    queue!(out, Clear(ClearType::CurrentLine))?;
    out.flush()
}

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;

/// Blocking line reader over a raw byte stream
pub struct LineReader {
    input: Box<dyn Read>,
    after_cr: bool,
}

impl LineReader {
    pub fn new(input: impl Read + 'static) -> Self {
        Self {
            input: Box::new(input),
            after_cr: false,
        }
    }

    /// Reader over the process stdin
    pub fn stdin() -> Self {
        Self::new(io::stdin())
    }

    /// Read one line without its terminator.
    ///
    /// Returns `Ok(None)` at end of input when nothing was typed, and an
    /// `Interrupted` error when a Ctrl-C byte arrives (terminals with signals off).
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut bytes = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            if self.input.read(&mut byte)? == 0 {
                return Ok(if bytes.is_empty() { None } else { Some(decode(bytes)) });
            }

            let after_cr = std::mem::replace(&mut self.after_cr, false);
            match byte[0] {
                // The LF of a CRLF pair ends the line that CR already ended
                b'\n' if after_cr && bytes.is_empty() => continue,
                b'\n' => return Ok(Some(decode(bytes))),
                b'\r' => {
                    self.after_cr = true;
                    return Ok(Some(decode(bytes)));
                }
                CTRL_C => return Err(io::Error::from(io::ErrorKind::Interrupted)),
                CTRL_D if bytes.is_empty() => return Ok(None),
                BACKSPACE | DELETE => pop_char(&mut bytes),
                other => bytes.push(other),
            }
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Drop the last UTF-8 character, including its continuation bytes
fn pop_char(bytes: &mut Vec<u8>) {
    while let Some(last) = bytes.pop() {
        if last & 0b1100_0000 != 0b1000_0000 {
            break;
        }
    }
}
