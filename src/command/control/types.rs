//! Argument and parameter types used by Control commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Echo {
    Off = 0,
    On = 1,
}

/// Formatting of the `+CME ERROR: <err>` result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerminationErrorMode {
    /// Plain `ERROR` result code
    Disabled = 0,
    /// `+CME ERROR: <err>` with numeric codes
    Enabled = 1,
    /// Verbose reporting. The nRF91 modem firmware keeps numeric codes.
    Verbose = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrcReporting {
    Disabled = 0,
    Enabled = 1,
}

/// Unsolicited result code families that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrcCategory {
    Lwm2m,
    Sock,
}

impl UrcCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lwm2m => "LWM2M",
            Self::Sock => "SOCK",
        }
    }
}
