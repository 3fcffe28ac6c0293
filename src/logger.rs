//! Injectable logging capability.
//!
//! The driver never logs through a global directly; every message goes
//! through a [`Logger`] owned by the device. [`NoopLogger`] is the default
//! and discards everything, [`FacadeLogger`] forwards to `log` or `defmt`
//! depending on the enabled crate feature.

use core::fmt::{self, Write as _};

use heapless::String;

use crate::fmt::Bytes;

const LINE_CAPACITY: usize = 256;

/// Leveled logger with an incremental mode for assembling a single trace
/// line out of several parts, plus hex and ASCII dumps of raw bytes.
///
/// All methods default to doing nothing.
pub trait Logger {
    fn error(&mut self, _args: fmt::Arguments<'_>) {}

    fn info(&mut self, _args: fmt::Arguments<'_>) {}

    fn debug(&mut self, _args: fmt::Arguments<'_>) {}

    fn trace(&mut self, _args: fmt::Arguments<'_>) {}

    /// Start a new trace line, discarding any unfinished one.
    fn trace_start(&mut self, _args: fmt::Arguments<'_>) {}

    /// Append to the trace line started by [`Logger::trace_start`].
    fn trace_part(&mut self, _args: fmt::Arguments<'_>) {}

    /// Append a final part and emit the trace line.
    fn trace_end(&mut self, _args: fmt::Arguments<'_>) {}

    fn trace_part_hex_dump(&mut self, _bytes: &[u8]) {}

    fn trace_part_ascii_dump(&mut self, _bytes: &[u8]) {}
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn error(&mut self, args: fmt::Arguments<'_>) {
        (**self).error(args)
    }

    fn info(&mut self, args: fmt::Arguments<'_>) {
        (**self).info(args)
    }

    fn debug(&mut self, args: fmt::Arguments<'_>) {
        (**self).debug(args)
    }

    fn trace(&mut self, args: fmt::Arguments<'_>) {
        (**self).trace(args)
    }

    fn trace_start(&mut self, args: fmt::Arguments<'_>) {
        (**self).trace_start(args)
    }

    fn trace_part(&mut self, args: fmt::Arguments<'_>) {
        (**self).trace_part(args)
    }

    fn trace_end(&mut self, args: fmt::Arguments<'_>) {
        (**self).trace_end(args)
    }

    fn trace_part_hex_dump(&mut self, bytes: &[u8]) {
        (**self).trace_part_hex_dump(bytes)
    }

    fn trace_part_ascii_dump(&mut self, bytes: &[u8]) {
        (**self).trace_part_ascii_dump(bytes)
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {}

/// Forwards messages to the `log` or `defmt` facade.
///
/// Incremental trace lines are assembled in a fixed buffer and emitted as
/// one record on [`Logger::trace_end`]. Parts that do not fit are dropped.
#[derive(Debug, Default)]
pub struct FacadeLogger {
    line: String<LINE_CAPACITY>,
}

impl FacadeLogger {
    pub const fn new() -> Self {
        Self {
            line: String::new(),
        }
    }
}

struct Text<'a>(fmt::Arguments<'a>);

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Text<'_> {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{}", defmt::Display2Format(&self.0))
    }
}

impl Logger for FacadeLogger {
    fn error(&mut self, args: fmt::Arguments<'_>) {
        error!("{}", Text(args));
    }

    fn info(&mut self, args: fmt::Arguments<'_>) {
        info!("{}", Text(args));
    }

    fn debug(&mut self, args: fmt::Arguments<'_>) {
        debug!("{}", Text(args));
    }

    fn trace(&mut self, args: fmt::Arguments<'_>) {
        trace!("{}", Text(args));
    }

    fn trace_start(&mut self, args: fmt::Arguments<'_>) {
        self.line.clear();
        self.line.write_fmt(args).ok();
    }

    fn trace_part(&mut self, args: fmt::Arguments<'_>) {
        self.line.write_fmt(args).ok();
    }

    fn trace_end(&mut self, args: fmt::Arguments<'_>) {
        self.line.write_fmt(args).ok();
        trace!("{}", self.line.as_str());
        self.line.clear();
    }

    fn trace_part_hex_dump(&mut self, bytes: &[u8]) {
        write!(self.line, "{:x}", Bytes(bytes)).ok();
    }

    fn trace_part_ascii_dump(&mut self, bytes: &[u8]) {
        write!(self.line, "{}", Bytes(bytes)).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_incremental_line() {
        let mut logger = FacadeLogger::new();
        logger.trace_start(format_args!(" <- "));
        logger.trace_part_ascii_dump(b"+CESQ: 1\r\nOK\n");
        assert_eq!(logger.line.as_str(), " <- +CESQ: 1.<LF>OK<LF>");

        logger.trace_end(format_args!(""));
        assert!(logger.line.is_empty());
    }

    #[test]
    fn hex_dump_is_space_separated() {
        let mut logger = FacadeLogger::new();
        logger.trace_start(format_args!("raw: "));
        logger.trace_part_hex_dump(&[0x0a, 0xff, 0x41]);
        assert_eq!(logger.line.as_str(), "raw: 0a ff 41");
    }

    #[test]
    fn start_discards_unfinished_line() {
        let mut logger = FacadeLogger::new();
        logger.trace_start(format_args!("first"));
        logger.trace_start(format_args!("second {}", 2));
        assert_eq!(logger.line.as_str(), "second 2");
    }

    #[test]
    fn forwards_through_mut_reference() {
        let mut inner = FacadeLogger::new();
        {
            let mut by_ref: &mut FacadeLogger = &mut inner;
            Logger::trace_start(&mut by_ref, format_args!("via ref"));
        }
        assert_eq!(inner.line.as_str(), "via ref");
    }
}
