//! Reply framing.
//!
//! The module answers every command with a variable number of lines
//! terminated by CR LF. [`read_reply`] accumulates those bytes into a
//! [`Reply`] until the caller's expected line count is reached, the reply
//! buffer fills up, or the tick budget runs out.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady};
use heapless::Vec;

use crate::fmt::Bytes;
use crate::watchdog::Watchdog;

/// Size of the reply buffer, including the slot reserved for a terminator.
pub const REPLY_CAPACITY: usize = 255;

/// Maximum number of content bytes a single reply holds.
pub const REPLY_LIMIT: usize = REPLY_CAPACITY - 1;

/// Length of one framer tick in milliseconds.
pub const TICK_MS: u32 = 1;

/// The content of one framed reply.
///
/// Carriage returns are stripped, and line feeds arriving while the reply is
/// still empty are dropped, so a reply never starts with a blank line.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Reply {
    buf: Vec<u8, REPLY_LIMIT>,
    lines: u8,
}

impl Reply {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            lines: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The reply as text, up to the first byte that is not valid UTF-8.
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.buf) {
            Ok(s) => s,
            // The prefix up to `valid_up_to` is valid by definition
            Err(e) => core::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of line feeds stored so far.
    pub fn lines(&self) -> u8 {
        self.lines
    }

    pub fn is_full(&self) -> bool {
        self.buf.len() >= REPLY_LIMIT
    }

    pub fn contains(&self, needle: &str) -> bool {
        find(&self.buf, needle.as_bytes()).is_some()
    }

    /// Feed one received byte. Bytes beyond [`REPLY_LIMIT`] are dropped.
    pub(crate) fn push(&mut self, byte: u8) {
        match byte {
            b'\r' => {}
            b'\n' if self.buf.is_empty() => {}
            _ => {
                if self.buf.push(byte).is_ok() && byte == b'\n' {
                    self.lines = self.lines.saturating_add(1);
                }
            }
        }
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reply(\"{}\")", Bytes(&self.buf))
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Reply {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "Reply({=[u8]:a})", self.buf.as_slice())
    }
}

/// Reasons a reply could not be framed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The budget ran out. Carries whatever was accumulated.
    Timeout(Reply),
    /// Reading from the serial transport failed.
    Transport,
}

impl FrameError {
    /// Partially accumulated content, if any was kept.
    pub fn partial(&self) -> Option<&Reply> {
        match self {
            Self::Timeout(reply) => Some(reply),
            Self::Transport => None,
        }
    }
}

/// Read one reply of `expected_lines` lines from `transport`.
///
/// Each tick drains every byte currently available, then, unless the reply
/// is complete, feeds the watchdog and sleeps [`TICK_MS`]. A budget of zero
/// ticks still drains once. Bytes that arrive after completion stay in the
/// transport for the next read.
pub fn read_reply<T, D, W>(
    transport: &mut T,
    delay: &mut D,
    watchdog: &mut W,
    timeout_ticks: u32,
    expected_lines: u8,
) -> Result<Reply, FrameError>
where
    T: Read + ReadReady,
    D: DelayNs,
    W: Watchdog + ?Sized,
{
    frame(transport, delay, watchdog, timeout_ticks, |reply| {
        reply.lines() >= expected_lines
    })
}

/// Read until the accumulated reply contains `expected`, with the same
/// tick budget, watchdog feeding and buffer limit as [`read_reply`].
pub fn read_until<T, D, W>(
    transport: &mut T,
    delay: &mut D,
    watchdog: &mut W,
    timeout_ticks: u32,
    expected: &str,
) -> Result<Reply, FrameError>
where
    T: Read + ReadReady,
    D: DelayNs,
    W: Watchdog + ?Sized,
{
    frame(transport, delay, watchdog, timeout_ticks, |reply| {
        reply.contains(expected)
    })
}

fn frame<T, D, W, F>(
    transport: &mut T,
    delay: &mut D,
    watchdog: &mut W,
    timeout_ticks: u32,
    mut done: F,
) -> Result<Reply, FrameError>
where
    T: Read + ReadReady,
    D: DelayNs,
    W: Watchdog + ?Sized,
    F: FnMut(&Reply) -> bool,
{
    let mut reply = Reply::new();
    let mut remaining = timeout_ticks;

    loop {
        if drain(transport, &mut reply, &mut done)? {
            return Ok(reply);
        }
        if remaining == 0 {
            return Err(FrameError::Timeout(reply));
        }
        remaining -= 1;
        watchdog.feed();
        delay.delay_ms(TICK_MS);
    }
}

fn drain<T, F>(transport: &mut T, reply: &mut Reply, done: &mut F) -> Result<bool, FrameError>
where
    T: Read + ReadReady,
    F: FnMut(&Reply) -> bool,
{
    if reply.is_full() || done(reply) {
        return Ok(true);
    }
    while transport.read_ready().map_err(|_| FrameError::Transport)? {
        let mut byte = [0u8; 1];
        if transport.read(&mut byte).map_err(|_| FrameError::Transport)? == 0 {
            break;
        }
        reply.push(byte[0]);
        if reply.is_full() || done(reply) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Position of the first occurrence of `needle` in `haystack`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
