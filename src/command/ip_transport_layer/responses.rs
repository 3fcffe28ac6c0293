//! Responses for IP transport layer commands
use atat::atat_derive::AtatResp;

use crate::error::Error;
use crate::framer::find;

const QSSLRECV_MARKER: &[u8] = b"+QSSLRECV: ";

/// Byte counters of a socket, +QIRD
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct UnreadBytes {
    #[at_arg(position = 0)]
    pub total: u32,
    #[at_arg(position = 1)]
    pub read: u32,
    #[at_arg(position = 2)]
    pub unread: u32,
}

/// Payload length announced by a receive header.
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct SocketDataLength {
    #[at_arg(position = 0)]
    pub length: u16,
}

/// Header of a secure receive reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecureRecvHeader {
    /// Payload length announced by the module.
    pub length: usize,
    /// Offset of the first payload byte in the framed reply.
    pub payload_offset: usize,
}

/// Locate `+QSSLRECV: <length>` in a framed reply. Works on raw bytes, as
/// the payload that follows the header need not be text.
pub fn parse_secure_recv_header(raw: &[u8]) -> Result<SecureRecvHeader, Error> {
    let start = find(raw, QSSLRECV_MARKER).ok_or(Error::UnrecognizedReply)? + QSSLRECV_MARKER.len();
    let rest = &raw[start..];
    let lf = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(Error::UnrecognizedReply)?;
    let digits = rest[..lf].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Err(Error::UnrecognizedReply);
    }
    let length = rest[..digits]
        .iter()
        .try_fold(0usize, |acc, &b| {
            acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
        })
        .ok_or(Error::UnrecognizedReply)?;
    Ok(SecureRecvHeader {
        length,
        payload_offset: start + lf + 1,
    })
}
