//! Argument and parameter types used by Network service commands
use heapless::String;

use crate::error::Error;

/// Operator as reported by +COPS, numeric (MCC and MNC) or alphanumeric
/// depending on the selected format.
pub type OperatorId = String<16>;

/// EPS network registration status, as reported by +CEREG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NetworkRegistrationState {
    /// 0: not registered, not searching
    NotRegistered = 0,
    /// 1: registered, home network
    Registered = 1,
    /// 2: not registered, searching for an operator
    Searching = 2,
    /// 3: registration denied
    Denied = 3,
    /// 4: unknown, e.g. out of coverage
    Unknown = 4,
    /// 5: registered, roaming
    Roaming = 5,
}

impl NetworkRegistrationState {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered | Self::Roaming)
    }
}

impl TryFrom<u8> for NetworkRegistrationState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::NotRegistered,
            1 => Self::Registered,
            2 => Self::Searching,
            3 => Self::Denied,
            4 => Self::Unknown,
            5 => Self::Roaming,
            n => return Err(Error::InvalidRegistrationState(n)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes() {
        assert_eq!(
            NetworkRegistrationState::try_from(0),
            Ok(NetworkRegistrationState::NotRegistered)
        );
        assert_eq!(
            NetworkRegistrationState::try_from(5),
            Ok(NetworkRegistrationState::Roaming)
        );
        assert_eq!(
            NetworkRegistrationState::try_from(6),
            Err(Error::InvalidRegistrationState(6))
        );
    }

    #[test]
    fn registered_states() {
        assert!(NetworkRegistrationState::Registered.is_registered());
        assert!(NetworkRegistrationState::Roaming.is_registered());
        assert!(!NetworkRegistrationState::Searching.is_registered());
        assert!(!NetworkRegistrationState::Denied.is_registered());
    }
}
