//! Argument and parameter types used by IP transport layer commands

/// Identifier of a socket opened on the module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SocketHandle(pub u8);

/// Transport security negotiated on a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TlsEncryption {
    #[default]
    None = 0,
    Ssl30,
    Tls10,
    Tls11,
    Tls12,
    All,
}

impl TlsEncryption {
    pub fn is_encrypted(&self) -> bool {
        !matches!(self, Self::None)
    }
}
