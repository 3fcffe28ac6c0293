//! Responses for Network service commands
use atat::atat_derive::AtatResp;
use heapless::String;

use super::types::{NetworkRegistrationState, OperatorId};
use crate::error::Error;

/// Operator selection +COPS
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct OperatorSelection {
    #[at_arg(position = 0)]
    pub mode: u8,
    #[at_arg(position = 1)]
    pub format: Option<u8>,
    #[at_arg(position = 2)]
    pub oper: Option<OperatorId>,
    #[at_arg(position = 3)]
    pub act: Option<u8>,
}

/// Extended signal quality +CESQ
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct ExtendedSignalQuality {
    #[at_arg(position = 0)]
    pub rxlev: u8,
    #[at_arg(position = 1)]
    pub ber: u8,
    #[at_arg(position = 2)]
    pub rscp: u8,
    #[at_arg(position = 3)]
    pub ecn0: u8,
    #[at_arg(position = 4)]
    pub rsrq: u8,
    /// RSRP index, the signal strength figure on LTE-M and NB-IoT.
    #[at_arg(position = 5)]
    pub rsrp: u8,
}

/// EPS network registration status +CEREG
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct EPSNetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: u8,
    #[at_arg(position = 1)]
    pub stat: u8,
    #[at_arg(position = 2)]
    pub tac: Option<String<4>>,
    #[at_arg(position = 3)]
    pub ci: Option<String<8>>,
    #[at_arg(position = 4)]
    pub act: Option<u8>,
    #[at_arg(position = 5)]
    pub cause_type: Option<u8>,
    #[at_arg(position = 6)]
    pub reject_cause: Option<u8>,
    #[at_arg(position = 7)]
    pub active_time: Option<String<8>>,
    #[at_arg(position = 8)]
    pub periodic_tau: Option<String<8>>,
}

impl EPSNetworkRegistrationStatus {
    pub fn state(&self) -> Result<NetworkRegistrationState, Error> {
        NetworkRegistrationState::try_from(self.stat)
    }
}
