//! Argument and parameter types used by Packet switched network commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdpType {
    Ip,
    Ipv6,
    #[default]
    Ipv4v6,
}

impl PdpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "IP",
            Self::Ipv6 => "IPV6",
            Self::Ipv4v6 => "IPV4V6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AuthenticationType {
    None = 0,
    #[default]
    Pap = 1,
    Chap = 2,
}

/// PDP context identifier. Context 0 is the default bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId(pub u8);
