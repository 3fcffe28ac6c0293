//! Responses for General commands
use atat::atat_derive::AtatResp;

use super::types::{FirmwareVersion, Iccid, Imei, Imsi};

/// IMEI identification +CGSN
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct IMEI {
    #[at_arg(position = 0)]
    pub imei: Imei,
}

/// Firmware version identification +CGMR
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct Revision {
    #[at_arg(position = 0)]
    pub version: FirmwareVersion,
}

/// Card identification #ICCID
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct CCID {
    #[at_arg(position = 0)]
    pub ccid: Iccid,
}

/// International mobile subscriber identification +CIMI
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct CIMI {
    #[at_arg(position = 0)]
    pub imsi: Imsi,
}
