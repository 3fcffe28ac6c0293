//! Control commands
pub mod types;

use atat::atat_derive::AtatCmd;

use super::{AtCmd, NoResponse};
use types::{Echo, TerminationErrorMode, UrcCategory, UrcReporting};

/// Command echo E
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("E", NoResponse, value_sep = false)]
pub struct SetEcho {
    #[at_arg(position = 0)]
    pub enabled: Echo,
}

impl AtCmd for SetEcho {}

/// Report mobile termination error +CMEE
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("+CMEE", NoResponse)]
pub struct SetReportMobileTerminationError {
    #[at_arg(position = 0)]
    pub n: TerminationErrorMode,
}

impl AtCmd for SetReportMobileTerminationError {}

/// Unsolicited result code configuration #URC
///
/// Before shutdown the module has to be allowed to report the state of its
/// LwM2M client and open sockets, otherwise `#SHUTDOWN` is refused.
#[derive(Debug, Clone, AtatCmd)]
#[at_cmd("#URC", NoResponse)]
pub struct SetUnsolicitedReporting<'a> {
    #[at_arg(position = 0, len = 8)]
    pub category: &'a str,
    #[at_arg(position = 1)]
    pub reporting: UrcReporting,
}

impl SetUnsolicitedReporting<'static> {
    pub fn enable(category: UrcCategory) -> Self {
        Self {
            category: category.as_str(),
            reporting: UrcReporting::Enabled,
        }
    }
}

impl AtCmd for SetUnsolicitedReporting<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::render;

    #[test]
    fn renders() {
        assert_eq!(
            render(&SetEcho {
                enabled: Echo::Off
            })
            .unwrap()
            .as_str(),
            "ATE0"
        );
        assert_eq!(
            render(&SetReportMobileTerminationError {
                n: TerminationErrorMode::Verbose
            })
            .unwrap()
            .as_str(),
            "AT+CMEE=2"
        );
        assert_eq!(
            render(&SetUnsolicitedReporting::enable(UrcCategory::Lwm2m))
                .unwrap()
                .as_str(),
            "AT#URC=\"LWM2M\",1"
        );
        assert_eq!(
            render(&SetUnsolicitedReporting {
                category: UrcCategory::Sock.as_str(),
                reporting: UrcReporting::Disabled
            })
            .unwrap()
            .as_str(),
            "AT#URC=\"SOCK\",0"
        );
    }
}
