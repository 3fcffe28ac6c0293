//! Reading from sockets opened on the module.
//!
//! Plain sockets are read straight off the serial link after a `+QIRD`
//! header. Secure sockets deliver their payload inside a framed reply, so
//! received bytes are staged and handed out from there.

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use heapless::Deque;

use crate::client::Device;
use crate::command::ip_transport_layer::responses::parse_secure_recv_header;
use crate::command::ip_transport_layer::types::{SocketHandle, TlsEncryption};
use crate::command::ip_transport_layer::{
    GetSocketUnreadBytes, ReadSecureSocketData, ReadSocketData,
};
use crate::config::CellularConfig;
use crate::error::Error;
use crate::framer::{find, Reply, REPLY_CAPACITY};
use crate::logger::Logger;
use crate::module_timing::{command_time, ticks};
use crate::watchdog::Watchdog;

/// Payload requested per secure receive, leaving room for the header and
/// the trailing result code in one reply.
const SECURE_RECV_LENGTH: u16 = REPLY_CAPACITY as u16 - 36;

/// A notification that slipped in ahead of `+QSSLRECV` leaves this
/// signature near the start of the reply.
const URC_SIGNATURE: &[u8] = b"\n\n+QSSLRE";
const URC_WINDOW: usize = 30;

/// Lines of the follow-up read that recovers a payload displaced by a
/// notification.
const RECOVERY_LINES: u8 = 2;

#[derive(Debug, Default)]
pub(crate) struct SocketState {
    handle: Option<SocketHandle>,
    encryption: TlsEncryption,
    /// Received secure payload not yet handed out. Its length is the
    /// pending count reported by `available`.
    staged: Deque<u8, REPLY_CAPACITY>,
}

impl SocketState {
    pub(crate) const fn new() -> Self {
        Self {
            handle: None,
            encryption: TlsEncryption::None,
            staged: Deque::new(),
        }
    }
}

/// Whether a notification preceded the `+QSSLRECV` header in `raw`.
fn urc_interleaved(raw: &[u8]) -> bool {
    find(&raw[..raw.len().min(URC_WINDOW)], URC_SIGNATURE).is_some()
}

impl<T, D, C, L, W> Device<T, D, C, L, W> {
    /// Select the socket subsequent reads refer to. Staged bytes of the
    /// previous socket are discarded.
    pub fn attach_socket(&mut self, handle: SocketHandle) {
        self.socket.handle = Some(handle);
        self.socket.staged.clear();
    }

    pub fn detach_socket(&mut self) -> Option<SocketHandle> {
        self.socket.staged.clear();
        self.socket.handle.take()
    }

    pub fn socket(&self) -> Option<SocketHandle> {
        self.socket.handle
    }

    /// Select plain or secure reads. Switching discards staged bytes.
    pub fn set_encryption(&mut self, encryption: TlsEncryption) {
        if self.socket.encryption != encryption {
            self.socket.staged.clear();
        }
        self.socket.encryption = encryption;
    }

    pub fn encryption(&self) -> TlsEncryption {
        self.socket.encryption
    }

    /// The next staged byte of a secure socket, without consuming it.
    pub fn peek(&self) -> Option<u8> {
        if self.socket.encryption.is_encrypted() {
            self.socket.staged.front().copied()
        } else {
            None
        }
    }
}

impl<T, D, C, L, W> Device<T, D, C, L, W>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
    L: Logger,
    W: Watchdog,
{
    /// Number of bytes ready to be read from the attached socket, 0 when
    /// none are or the query failed.
    pub fn available(&mut self) -> usize {
        match self.try_available() {
            Ok(n) => n,
            Err(e) => {
                self.ch
                    .logger()
                    .debug(format_args!("Failed to read response: {:?}", e));
                0
            }
        }
    }

    pub fn try_available(&mut self) -> Result<usize, Error> {
        let handle = self.socket.handle.ok_or(Error::NoSocket)?;
        if self.socket.encryption.is_encrypted() {
            self.stage_secure(handle)
        } else {
            let qird = self.ch.query(&GetSocketUnreadBytes::new(handle.0))?;
            usize::try_from(qird.unread).map_err(|_| Error::UnrecognizedReply)
        }
    }

    /// Read into `buf` from the attached socket. Returns the number of
    /// bytes delivered, 0 on any failure.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        match self.try_read(buf) {
            Ok(n) => n,
            Err(e) => {
                self.ch
                    .logger()
                    .debug(format_args!("Socket read failed: {:?}", e));
                0
            }
        }
    }

    pub fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let handle = self.socket.handle.ok_or(Error::NoSocket)?;
        if buf.is_empty() {
            return Ok(0);
        }
        if self.socket.encryption.is_encrypted() {
            if self.socket.staged.is_empty() {
                self.stage_secure(handle)?;
            }
            let mut n = 0;
            while n < buf.len() {
                match self.socket.staged.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        } else {
            self.read_plain(handle, buf)
        }
    }

    pub fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte) {
            1 => Some(byte[0]),
            _ => None,
        }
    }

    /// Discard everything waiting on the serial link.
    pub fn flush(&mut self) {
        self.ch.flush_input();
    }

    fn read_plain(&mut self, handle: SocketHandle, buf: &mut [u8]) -> Result<usize, Error> {
        let requested = u16::try_from(buf.len()).unwrap_or(u16::MAX);
        let cmd = ReadSocketData {
            socket: handle.0,
            length: requested,
            timeout_s: C::SOCKET_TIMEOUT_S,
        };
        let header = self.ch.query(&cmd)?;
        let length = usize::from(header.length.min(requested));

        let timeout = ticks(command_time()).saturating_mul(u32::from(C::SOCKET_TIMEOUT_S));
        let n = self.ch.read_raw(&mut buf[..length], timeout)?;
        self.ch.logger().trace_start(format_args!("recv {}: ", n));
        self.ch.logger().trace_part_hex_dump(&buf[..n]);
        self.ch.logger().trace_end(format_args!(""));
        Ok(n)
    }

    /// Fill the staging buffer from one secure receive, unless it still
    /// holds bytes. Returns the staged length.
    fn stage_secure(&mut self, handle: SocketHandle) -> Result<usize, Error> {
        if !self.socket.staged.is_empty() {
            return Ok(self.socket.staged.len());
        }

        let reply = self.ch.send(&ReadSecureSocketData {
            socket: handle.0,
            length: SECURE_RECV_LENGTH,
        })?;
        let raw = reply.as_bytes();
        let header = parse_secure_recv_header(raw)?;
        if header.length == 0 {
            return Ok(0);
        }

        let recovered: Reply;
        let payload = if urc_interleaved(raw) {
            self.ch
                .logger()
                .debug(format_args!("Notification ahead of secure payload"));
            match self.ch.read_reply(ticks(command_time()), RECOVERY_LINES) {
                Ok(reply) => {
                    recovered = reply;
                    recovered.as_bytes()
                }
                Err(_) => {
                    self.ch
                        .logger()
                        .error(format_args!("Could not get data after notification"));
                    return Ok(0);
                }
            }
        } else {
            &raw[header.payload_offset..]
        };

        let captured = header.length.min(payload.len());
        for &b in &payload[..captured] {
            if self.socket.staged.push_back(b).is_err() {
                break;
            }
        }
        self.ch.logger().trace(format_args!(
            "Secure payload: {} of {} bytes",
            self.socket.staged.len(),
            header.length
        ));
        Ok(self.socket.staged.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::fixture;

    const SECURE_CMD: &str = "AT+QSSLRECV=1,219";

    #[test]
    fn interleave_signature_is_only_searched_near_start() {
        assert!(urc_interleaved(b"+QSSLURC: \"recv\",1\n\n+QSSLRECV: 5\n"));
        assert!(!urc_interleaved(b"+QSSLRECV: 5\nhello\n\n"));
        let mut late = [b'x'; 40];
        late[30..39].copy_from_slice(URC_SIGNATURE);
        assert!(!urc_interleaved(&late));
    }

    #[test]
    fn operations_without_socket_return_nothing() {
        let (mut f, _) = fixture(true, |_| Some("\r\nOK\r\n".into()));
        let mut buf = [0u8; 4];

        assert_eq!(f.device.available(), 0);
        assert_eq!(f.device.read(&mut buf), 0);
        assert_eq!(f.device.try_read(&mut buf), Err(Error::NoSocket));
        assert!(f.serial.sent().is_empty());
    }

    #[test]
    fn plain_available_reports_unread_bytes() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT+QIRD=1,0" => Some("\r\n+QIRD: 10,5,5\r\n\r\nOK\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));

        assert_eq!(f.device.available(), 5);
    }

    #[test]
    fn plain_read_takes_raw_bytes_after_header() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT#XTCPRECV=1,16,1" => Some("\r\n+QIRD: 5\r\nhel\r\n\r\nOK\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        let mut buf = [0u8; 16];

        assert_eq!(f.device.read(&mut buf), 5);
        assert_eq!(&buf[..5], b"hel\r\n");
        assert_eq!(f.serial.remaining(), b"\r\nOK\r\n");
    }

    #[test]
    fn plain_read_clamps_to_buffer() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT#XTCPRECV=1,3,1" => Some("\r\n+QIRD: 8\r\nabcdefgh".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        let mut buf = [0u8; 3];

        assert_eq!(f.device.read(&mut buf), 3);
        assert_eq!(&buf, b"abc");
    }

    #[test]
    fn plain_read_requires_header() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT#XTCPRECV=1,4,1" => Some("\r\nERROR\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        let mut buf = [0u8; 4];

        assert_eq!(f.device.try_read(&mut buf), Err(Error::UnrecognizedReply));
    }

    #[test]
    fn secure_payload_is_staged_and_drained() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            SECURE_CMD => Some("\r\n+QSSLRECV: 5\r\nhello\r\n\r\nOK\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        f.device.set_encryption(TlsEncryption::Tls12);

        assert_eq!(f.device.available(), 5);
        assert_eq!(f.device.peek(), Some(b'h'));
        // Staged bytes are served without another command
        assert_eq!(f.device.available(), 5);
        assert_eq!(f.serial.sent().len(), 1);

        let mut buf = [0u8; 3];
        assert_eq!(f.device.read(&mut buf), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(f.device.read_byte(), Some(b'l'));
        assert_eq!(f.device.read_byte(), Some(b'o'));
        assert_eq!(f.device.peek(), None);
        assert_eq!(f.serial.remaining(), b"OK\r\n");
    }

    #[test]
    fn secure_read_stages_when_empty() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            SECURE_CMD => Some("\r\n+QSSLRECV: 2\r\nhi\r\n\r\nOK\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        f.device.set_encryption(TlsEncryption::All);
        let mut buf = [0u8; 8];

        assert_eq!(f.device.read(&mut buf), 2);
        assert_eq!(&buf[..2], b"hi");
    }

    #[test]
    fn interleaved_notification_triggers_one_recovery_read() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            SECURE_CMD => Some(
                "+QSSLURC: \"recv\",1\r\n\r\n+QSSLRECV: 5\r\nhello\r\n\r\nOK\r\n".into(),
            ),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        f.device.set_encryption(TlsEncryption::Tls12);

        assert_eq!(f.device.available(), 5);
        assert_eq!(f.serial.remaining(), b"OK\r\n");
        assert_eq!(f.serial.sent().len(), 1);

        let mut buf = [0u8; 8];
        assert_eq!(f.device.read(&mut buf), 5);
        assert_eq!(&buf[..5], b"hello");
    }

    #[test]
    fn failed_recovery_leaves_nothing_pending() {
        let (mut f, logger) = fixture(true, |cmd| match cmd {
            SECURE_CMD => Some("+QSSLURC: \"recv\",1\r\n\r\n+QSSLRECV: 5\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        f.device.set_encryption(TlsEncryption::Tls12);

        assert_eq!(f.device.available(), 0);
        assert_eq!(f.device.peek(), None);
        assert!(logger.contains("Could not get data after notification"));
    }

    #[test]
    fn staged_length_is_bounded_by_captured_bytes() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            SECURE_CMD => Some("\r\n+QSSLRECV: 200\r\nshort\r\n\r\nOK\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        f.device.set_encryption(TlsEncryption::Tls12);

        // The payload region holds the data line and the blank line after it
        assert_eq!(f.device.available(), "short\n\n".len());
    }

    #[test]
    fn switching_encryption_discards_staged_bytes() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            SECURE_CMD => Some("\r\n+QSSLRECV: 5\r\nhello\r\n\r\nOK\r\n".into()),
            _ => None,
        });
        f.device.attach_socket(SocketHandle(1));
        f.device.set_encryption(TlsEncryption::Tls12);
        assert_eq!(f.device.available(), 5);

        f.device.set_encryption(TlsEncryption::None);
        assert_eq!(f.device.peek(), None);
        f.device.set_encryption(TlsEncryption::Tls12);
        assert_eq!(f.device.peek(), None);
        assert_eq!(f.device.detach_socket(), Some(SocketHandle(1)));
    }
}
