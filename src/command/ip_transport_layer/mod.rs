//! IP transport layer commands
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;

use super::AtCmd;
use responses::{SocketDataLength, UnreadBytes};

/// Query unread bytes +QIRD with a zero length
///
/// `+QIRD: <total>,<read>,<unread>`
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+QIRD", UnreadBytes)]
pub struct GetSocketUnreadBytes {
    #[at_arg(position = 0)]
    pub socket: u8,
    #[at_arg(position = 1)]
    pub length: u16,
}

impl GetSocketUnreadBytes {
    pub fn new(socket: u8) -> Self {
        Self { socket, length: 0 }
    }
}

impl AtCmd for GetSocketUnreadBytes {
    const LINES: u8 = 3;
}

/// Receive from a plain TCP socket #XTCPRECV
///
/// Answered with a `+QIRD: <length>` header line, followed by exactly
/// `<length>` raw bytes.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("#XTCPRECV", SocketDataLength)]
pub struct ReadSocketData {
    #[at_arg(position = 0)]
    pub socket: u8,
    #[at_arg(position = 1)]
    pub length: u16,
    #[at_arg(position = 2)]
    pub timeout_s: u8,
}

impl AtCmd for ReadSocketData {}

/// Receive from a secure socket +QSSLRECV
///
/// `+QSSLRECV: <length>` followed by the payload on the next line. The
/// payload need not be text, so the reply is located with
/// [`responses::parse_secure_recv_header`] rather than parsed.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+QSSLRECV", SocketDataLength)]
pub struct ReadSecureSocketData {
    #[at_arg(position = 0)]
    pub socket: u8,
    #[at_arg(position = 1)]
    pub length: u16,
}

impl AtCmd for ReadSecureSocketData {
    const LINES: u8 = 3;
}
