//! Argument and parameter types used by Mobile equipment control commands
use atat::atat_derive::AtatEnum;

/// Level of functionality selected with +CFUN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Functionality {
    /// Disables both transmit and receive RF circuits
    Minimum = 0,
    /// Full functionality, radio on
    Full = 1,
    /// Radio off, SIM still accessible
    AirplaneMode = 4,
}
