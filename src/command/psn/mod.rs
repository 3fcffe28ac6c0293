//! Packet switched network commands
pub mod types;

use atat::atat_derive::AtatCmd;

use super::{AtCmd, NoResponse};
use types::AuthenticationType;

/// Define PDP context +CGDCONT
///
/// `pdp_type` is one of the [`types::PdpType`] strings.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGDCONT", NoResponse)]
pub struct SetPDPContextDefinition<'a> {
    #[at_arg(position = 0)]
    pub cid: u8,
    #[at_arg(position = 1, len = 6)]
    pub pdp_type: &'a str,
    #[at_arg(position = 2, len = 100)]
    pub apn: &'a str,
}

impl AtCmd for SetPDPContextDefinition<'_> {}

/// PDP context authentication parameters +CGAUTH
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CGAUTH", NoResponse)]
pub struct SetPDPContextAuthentication<'a> {
    #[at_arg(position = 0)]
    pub cid: u8,
    #[at_arg(position = 1)]
    pub auth_type: AuthenticationType,
    #[at_arg(position = 2, len = 64)]
    pub username: &'a str,
    #[at_arg(position = 3, len = 64)]
    pub password: &'a str,
}

impl AtCmd for SetPDPContextAuthentication<'_> {}
