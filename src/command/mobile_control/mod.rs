//! Mobile equipment control and status commands
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;

use super::{AtCmd, NoResponse};
use responses::{BatteryVoltage, SimState};
use types::Functionality;

/// Set module functionality +CFUN
///
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CFUN", NoResponse, timeout_ms = 30000)]
pub struct SetModuleFunctionality {
    #[at_arg(position = 0)]
    pub fun: Functionality,
}

impl AtCmd for SetModuleFunctionality {}

/// Battery voltage %XVBAT, reported in millivolts
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("%XVBAT", BatteryVoltage)]
pub struct GetBatteryVoltage;

impl AtCmd for GetBatteryVoltage {
    const LINES: u8 = 3;
}

/// SIM card presence %XSIM
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("%XSIM?", SimState)]
pub struct GetSimState;

impl AtCmd for GetSimState {}

/// Orderly shutdown #SHUTDOWN
///
/// Answered with `OK` right away, `+SHUTDOWN` follows once the module is
/// ready to have its power removed.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("#SHUTDOWN", NoResponse, timeout_ms = 10000)]
pub struct ModuleShutdown;

impl AtCmd for ModuleShutdown {}
