use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::command::psn::types::{ContextId, PdpType};

/// Stand-in for a control line that is not wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Board specific configuration of the module.
///
/// Both control lines are optional. Without a status line the module is
/// assumed to be powered, without a power line power-on pulses are skipped.
pub trait CellularConfig {
    /// Power-on line. A low pulse switches the module on.
    type PowerPin: OutputPin;
    /// Module status line, high while the module is powered.
    type StatusPin: InputPin;

    /// Receive timeout in seconds passed along with plain socket reads.
    const SOCKET_TIMEOUT_S: u8 = 1;

    const CONTEXT_ID: ContextId = ContextId(0);
    const PDP_TYPE: PdpType = PdpType::Ipv4v6;

    /// Access point used by [`Device::connect_network`].
    ///
    /// [`Device::connect_network`]: crate::Device::connect_network
    const APN: Apn<'static> = Apn::None;

    fn power_pin(&mut self) -> Option<&mut Self::PowerPin>;
    fn status_pin(&mut self) -> Option<&mut Self::StatusPin>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Apn<'a> {
    /// Keep the access point provisioned on the module.
    #[default]
    None,
    Given {
        name: &'a str,
        username: Option<&'a str>,
        password: Option<&'a str>,
    },
}

/// [`CellularConfig`] built from optional pins at runtime.
///
/// ```ignore
/// let config = PinConfig::new()
///     .with_power_pin(power)
///     .with_status_pin(status);
/// ```
#[derive(Debug, Default)]
pub struct PinConfig<PWR = NoPin, STAT = NoPin> {
    power: Option<PWR>,
    status: Option<STAT>,
}

impl PinConfig {
    pub fn new() -> Self {
        Self {
            power: None,
            status: None,
        }
    }
}

impl<PWR, STAT> PinConfig<PWR, STAT> {
    pub fn with_power_pin<P: OutputPin>(self, pin: P) -> PinConfig<P, STAT> {
        PinConfig {
            power: Some(pin),
            status: self.status,
        }
    }

    pub fn with_status_pin<S: InputPin>(self, pin: S) -> PinConfig<PWR, S> {
        PinConfig {
            power: self.power,
            status: Some(pin),
        }
    }
}

impl<PWR: OutputPin, STAT: InputPin> CellularConfig for PinConfig<PWR, STAT> {
    type PowerPin = PWR;
    type StatusPin = STAT;

    fn power_pin(&mut self) -> Option<&mut Self::PowerPin> {
        self.power.as_mut()
    }

    fn status_pin(&mut self) -> Option<&mut Self::StatusPin> {
        self.status.as_mut()
    }
}
