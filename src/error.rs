use crate::framer::FrameError;

/// Hardware that was required during bring-up but could not be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hardware {
    /// The module never answered the attention command.
    Module,
    /// No SIM card was reported by the module.
    Sim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No satisfying reply within the transaction budget.
    Timeout,
    /// A reply was received but matched none of the expected patterns.
    UnrecognizedReply,
    /// The module answered with `+CME ERROR: <code>`.
    Device(i16),
    /// Required hardware not detected during bring-up.
    HardwareAbsent(Hardware),
    /// A lifecycle stage ran out of its time budget.
    StateTimeout,
    /// The registration status digit is outside the 3GPP `0..=5` range.
    InvalidRegistrationState(u8),
    /// Socket operation without an attached socket.
    NoSocket,
    /// The serial transport reported an error.
    Transport,
    IoPin,
    /// The command, or one of its string arguments, exceeds what the
    /// command line buffer or the module accepts.
    CommandOverflow,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::UnrecognizedReply => defmt::write!(f, "UnrecognizedReply"),
            Self::Device(code) => defmt::write!(f, "Device({})", code),
            Self::HardwareAbsent(hw) => defmt::write!(f, "HardwareAbsent({:?})", hw),
            Self::StateTimeout => defmt::write!(f, "StateTimeout"),
            Self::InvalidRegistrationState(v) => {
                defmt::write!(f, "InvalidRegistrationState({})", v)
            }
            Self::NoSocket => defmt::write!(f, "NoSocket"),
            Self::Transport => defmt::write!(f, "Transport"),
            Self::IoPin => defmt::write!(f, "IoPin"),
            Self::CommandOverflow => defmt::write!(f, "CommandOverflow"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Timeout(_) => Self::Timeout,
            FrameError::Transport => Self::Transport,
        }
    }
}
