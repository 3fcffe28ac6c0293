//! Responses for Mobile equipment control commands
use atat::atat_derive::AtatResp;

/// Battery voltage %XVBAT
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct BatteryVoltage {
    #[at_arg(position = 0)]
    pub millivolts: u32,
}

impl BatteryVoltage {
    pub fn volts(&self) -> f64 {
        f64::from(self.millivolts) / 1000.0
    }
}

/// SIM card state %XSIM
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct SimState {
    #[at_arg(position = 0)]
    pub state: u8,
}

impl SimState {
    pub fn is_present(&self) -> bool {
        self.state == 1
    }
}
