//! Network service commands
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;

use super::AtCmd;
use responses::{EPSNetworkRegistrationStatus, ExtendedSignalQuality, OperatorSelection};

/// Operator selection +COPS, read form
///
/// `+COPS: <mode>,<format>,"<oper>",<AcT>`
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+COPS?", OperatorSelection)]
pub struct GetOperatorSelection;

impl AtCmd for GetOperatorSelection {
    const LINES: u8 = 3;
}

/// Extended signal quality +CESQ
///
/// `+CESQ: <rxlev>,<ber>,<rscp>,<ecno>,<rsrq>,<rsrp>`
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CESQ", ExtendedSignalQuality)]
pub struct GetExtendedSignalQuality;

impl AtCmd for GetExtendedSignalQuality {
    const LINES: u8 = 3;
}

/// EPS network registration status +CEREG, read form
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CEREG?", EPSNetworkRegistrationStatus)]
pub struct GetEPSNetworkRegistrationStatus;

impl AtCmd for GetEPSNetworkRegistrationStatus {
    const LINES: u8 = 3;
}
