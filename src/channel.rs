//! Command/reply transactions over the serial link.

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::command::error::ResultCode;
use crate::command::{information_text, render, AtCmd};
use crate::error::Error;
use crate::framer::{self, FrameError, Reply};
use crate::logger::{Logger, NoopLogger};
use crate::watchdog::{NoWatchdog, Watchdog};

/// Owns the serial transport and performs one command transaction at a
/// time: discard stale input, write the command line, frame the reply.
///
/// The result code of the most recent checked reply is kept, see
/// [`AtChannel::last_error`].
pub struct AtChannel<T, D, L = NoopLogger, W = NoWatchdog> {
    transport: T,
    delay: D,
    logger: L,
    watchdog: W,
    last_result: ResultCode,
}

impl<T, D, L, W> AtChannel<T, D, L, W> {
    pub fn new(transport: T, delay: D, logger: L, watchdog: W) -> Self {
        Self {
            transport,
            delay,
            logger,
            watchdog,
            last_result: ResultCode::Ok,
        }
    }

    /// Code of the last failed command: the numeric `+CME ERROR` code, `-1`
    /// for an unrecognized reply, `0` after a success.
    pub fn last_error(&self) -> i16 {
        self.last_result.code()
    }

    pub fn logger(&mut self) -> &mut L {
        &mut self.logger
    }

    pub(crate) fn with_logger<L2>(self, logger: L2) -> AtChannel<T, D, L2, W> {
        AtChannel {
            transport: self.transport,
            delay: self.delay,
            logger,
            watchdog: self.watchdog,
            last_result: self.last_result,
        }
    }

    pub(crate) fn with_watchdog<W2>(self, watchdog: W2) -> AtChannel<T, D, L, W2> {
        AtChannel {
            transport: self.transport,
            delay: self.delay,
            logger: self.logger,
            watchdog,
            last_result: self.last_result,
        }
    }

    pub(crate) fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

impl<T, D, L, W> AtChannel<T, D, L, W>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    L: Logger,
    W: Watchdog,
{
    /// Discard every byte currently waiting on the transport.
    pub fn flush_input(&mut self) {
        let mut buf = [0u8; 32];
        while let Ok(true) = self.transport.read_ready() {
            match self.transport.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
    }

    /// Frame one reply of `lines` lines within `timeout_ticks` milliseconds.
    pub fn read_reply(&mut self, timeout_ticks: u32, lines: u8) -> Result<Reply, FrameError> {
        let res = framer::read_reply(
            &mut self.transport,
            &mut self.delay,
            &mut self.watchdog,
            timeout_ticks,
            lines,
        );
        self.trace_reply(&res);
        res
    }

    /// Send `command` followed by CR LF and frame a reply of `lines` lines.
    pub fn send_and_wait_for_reply(
        &mut self,
        command: &str,
        timeout_ticks: u32,
        lines: u8,
    ) -> Result<Reply, FrameError> {
        self.flush_input();
        self.logger.trace(format_args!(" -> {}", command));
        self.write_line(command)?;
        self.read_reply(timeout_ticks, lines)
    }

    /// Send `command` followed by CR LF and read until the reply contains
    /// `expected`, or [`framer::REPLY_LIMIT`] bytes were read.
    pub fn send_and_wait_for(
        &mut self,
        command: &str,
        expected: &str,
        timeout_ticks: u32,
    ) -> Result<Reply, FrameError> {
        self.flush_input();
        self.logger.trace(format_args!(" -> {}", command));
        self.write_line(command)?;
        let res = framer::read_until(
            &mut self.transport,
            &mut self.delay,
            &mut self.watchdog,
            timeout_ticks,
            expected,
        );
        self.trace_reply(&res);
        res
    }

    /// Send `command`, frame a single line reply and check it contains
    /// `expected`. A partial reply left by a timeout is checked as well.
    ///
    /// The reply's result code is recorded in [`AtChannel::last_error`].
    pub fn send_and_check_reply(&mut self, command: &str, expected: &str, timeout_ticks: u32) -> bool {
        let reply = match self.send_and_wait_for_reply(command, timeout_ticks, 1) {
            Ok(reply) | Err(FrameError::Timeout(reply)) => reply,
            Err(FrameError::Transport) => {
                self.last_result = ResultCode::Unknown;
                return false;
            }
        };
        self.check_result(&reply).ok();
        reply.contains(expected)
    }

    /// Classify `reply` as `OK`, `+CME ERROR: <n>` or unrecognized, and
    /// record the outcome as the last error code.
    pub fn check_result(&mut self, reply: &Reply) -> Result<(), Error> {
        let code = match reply.as_str().parse::<ResultCode>() {
            Ok(code) => code,
            Err(never) => match never {},
        };
        self.last_result = code;
        match code {
            ResultCode::Ok => Ok(()),
            ResultCode::Cme(n) => {
                self.logger.debug(format_args!("CME ERROR: {}", n));
                Err(Error::Device(n))
            }
            ResultCode::Unknown => {
                self.logger.debug(format_args!("Unrecognized result"));
                Err(Error::UnrecognizedReply)
            }
        }
    }

    /// Render and send `cmd`, framing as many lines as it expects.
    pub fn send<Cmd: AtCmd>(&mut self, cmd: &Cmd) -> Result<Reply, Error> {
        let line = render(cmd)?;
        Ok(self.send_and_wait_for_reply(&line, Cmd::MAX_TIMEOUT_MS, Cmd::LINES)?)
    }

    /// Send `cmd` and parse its information text into `Cmd::Response`.
    ///
    /// A reply carrying an error result code is reported as such instead.
    pub fn query<Cmd: AtCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error> {
        let reply = self.send(cmd)?;
        if reply.contains("ERROR") {
            self.check_result(&reply)?;
        }
        cmd.parse(Ok(information_text(reply.as_str()).as_bytes()))
            .map_err(|e| {
                self.logger
                    .debug(format_args!("Failed to parse reply: {:?}", e));
                Error::UnrecognizedReply
            })
    }

    /// Render and send `cmd`, then check the first reply line for `expected`.
    pub fn check<Cmd: AtCmd>(&mut self, cmd: &Cmd, expected: &str) -> bool {
        match render(cmd) {
            Ok(line) => self.send_and_check_reply(&line, expected, Cmd::MAX_TIMEOUT_MS),
            Err(_) => {
                self.logger.error(format_args!("Command does not fit the line buffer"));
                false
            }
        }
    }

    /// Error describing why the last checked command failed.
    pub(crate) fn command_error(&self) -> Error {
        match self.last_result {
            ResultCode::Cme(code) => Error::Device(code),
            _ => Error::UnrecognizedReply,
        }
    }

    /// Read up to `buf.len()` raw bytes, bypassing the framer. Stops early
    /// once `timeout_ticks` pass without the buffer filling up.
    pub(crate) fn read_raw(&mut self, buf: &mut [u8], timeout_ticks: u32) -> Result<usize, Error> {
        let mut filled = 0;
        let mut remaining = timeout_ticks;
        while filled < buf.len() {
            if self.transport.read_ready().map_err(|_| Error::Transport)? {
                let n = self
                    .transport
                    .read(&mut buf[filled..])
                    .map_err(|_| Error::Transport)?;
                filled += n;
                if n > 0 {
                    continue;
                }
            }
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            self.watchdog.feed();
            self.delay.delay_ms(framer::TICK_MS);
        }
        Ok(filled)
    }

    /// Feed the watchdog, then sleep for `ms` milliseconds.
    pub(crate) fn pause(&mut self, ms: u32) {
        self.watchdog.feed();
        self.delay.delay_ms(ms);
    }

    /// Sleep without feeding the watchdog.
    pub(crate) fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    pub(crate) fn feed_watchdog(&mut self) {
        self.watchdog.feed();
    }

    fn trace_reply(&mut self, res: &Result<Reply, FrameError>) {
        match res {
            Ok(reply) => {
                self.logger.trace_start(format_args!(" <- "));
                self.logger.trace_part_ascii_dump(reply.as_bytes());
                self.logger.trace_end(format_args!(""));
            }
            Err(FrameError::Timeout(partial)) => {
                self.logger.trace_start(format_args!(" <- (Timeout) "));
                self.logger.trace_part_ascii_dump(partial.as_bytes());
                self.logger.trace_end(format_args!(""));
            }
            Err(FrameError::Transport) => {
                self.logger.error(format_args!("Serial read failed"));
            }
        }
    }

    fn write_line(&mut self, command: &str) -> Result<(), FrameError> {
        self.transport
            .write_all(command.as_bytes())
            .and_then(|_| self.transport.write_all(b"\r\n"))
            .and_then(|_| self.transport.flush())
            .map_err(|_| FrameError::Transport)
    }
}
