//! AT commands for the Nimbelink Skywire Nano (nRF9160 based)
//!
//! Commands and their responses are described with the `atat` derives.
//! [`AtCmd`] adds what the reply framer needs to know on top of
//! [`AtatCmd`]: how many lines a complete reply spans.

pub mod control;
pub mod error;
pub mod general;
pub mod ip_transport_layer;
pub mod mobile_control;
pub mod network_service;
pub mod psn;

use atat::atat_derive::{AtatCmd, AtatResp};
use atat::AtatCmd;
use heapless::String;

use crate::error::Error;

/// Capacity of a rendered command line, terminator included.
pub const COMMAND_CAPACITY: usize = 192;

pub type CommandLine = String<COMMAND_CAPACITY>;

/// A command the module understands, framed line by line.
///
/// The transaction budget is [`AtatCmd::MAX_TIMEOUT_MS`].
pub trait AtCmd: AtatCmd {
    /// Reply lines to frame before the transaction is complete.
    const LINES: u8 = 1;
}

#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct NoResponse;

/// Attention command, used as liveness check.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("", NoResponse)]
pub struct AT;

impl AtCmd for AT {}

/// Render `cmd` into a command line, without its terminator.
pub(crate) fn render<Cmd: AtatCmd>(cmd: &Cmd) -> Result<CommandLine, Error> {
    if Cmd::MAX_LEN > COMMAND_CAPACITY {
        return Err(Error::CommandOverflow);
    }
    let mut buf = [0u8; COMMAND_CAPACITY];
    let len = cmd.write(&mut buf);
    let text = core::str::from_utf8(&buf[..len]).map_err(|_| Error::CommandOverflow)?;
    let mut line = CommandLine::new();
    line.push_str(text.trim_end_matches(['\r', '\n']))
        .map_err(|_| Error::CommandOverflow)?;
    Ok(line)
}

/// The information text of a framed reply: the first line that is neither
/// a command echo nor a bare `OK`, with any `+X: `, `#X: ` or `%X: ` header
/// removed.
pub(crate) fn information_text(reply: &str) -> &str {
    let line = reply
        .split('\n')
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("AT") && *l != "OK")
        .unwrap_or_default();
    match line.as_bytes().first() {
        Some(b'+' | b'#' | b'%') => line
            .split_once(':')
            .map(|(_, value)| value.trim_start())
            .unwrap_or(line),
        _ => line,
    }
}

/// Copy a bare text response into a bounded string. Empty text is not a
/// response.
pub(crate) fn text_response<const N: usize>(
    resp: Result<&[u8], atat::InternalError>,
) -> Result<String<N>, atat::Error> {
    let bytes = resp.map_err(|_| atat::Error::Parse)?;
    let text = core::str::from_utf8(bytes)
        .map_err(|_| atat::Error::Parse)?
        .trim();
    if text.is_empty() {
        return Err(atat::Error::Parse);
    }
    let mut out = String::new();
    out.push_str(text).map_err(|_| atat::Error::Parse)?;
    Ok(out)
}
