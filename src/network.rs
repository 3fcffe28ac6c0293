use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::mobile_control::types::Functionality;
use crate::command::mobile_control::SetModuleFunctionality;
use crate::command::psn::types::AuthenticationType;
use crate::command::psn::{SetPDPContextAuthentication, SetPDPContextDefinition};
use crate::config::{Apn, CellularConfig};
use crate::error::Error;
use crate::logger::Logger;
use crate::watchdog::Watchdog;

/// Longest access point name the module accepts.
const APN_MAX_LEN: usize = 100;
/// Longest PDP context username or password.
const CREDENTIAL_MAX_LEN: usize = 64;

impl<T, D, C, L, W> Device<T, D, C, L, W>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
    L: Logger,
    W: Watchdog,
{
    /// Switch the radio on using the access point from the configuration.
    pub fn connect_network(&mut self) -> Result<(), Error> {
        self.connect_network_with(C::APN)
    }

    /// Define the default PDP context for `apn`, then switch the radio on.
    /// With [`Apn::None`] the context provisioned on the module is kept.
    pub fn connect_network_with(&mut self, apn: Apn<'_>) -> Result<(), Error> {
        if let Apn::Given {
            name,
            username,
            password,
        } = apn
        {
            let authenticate = username.is_some() || password.is_some();
            let username = username.unwrap_or_default();
            let password = password.unwrap_or_default();
            if name.len() > APN_MAX_LEN
                || username.len() > CREDENTIAL_MAX_LEN
                || password.len() > CREDENTIAL_MAX_LEN
            {
                self.ch
                    .logger()
                    .error(format_args!("APN settings exceed the module limits"));
                return Err(Error::CommandOverflow);
            }

            self.ch
                .logger()
                .debug(format_args!("Defining PDP context for APN {}", name));
            let definition = SetPDPContextDefinition {
                cid: C::CONTEXT_ID.0,
                pdp_type: C::PDP_TYPE.as_str(),
                apn: name,
            };
            if !self.ch.check(&definition, "OK") {
                return Err(self.ch.command_error());
            }

            if authenticate {
                let auth = SetPDPContextAuthentication {
                    cid: C::CONTEXT_ID.0,
                    auth_type: AuthenticationType::Pap,
                    username,
                    password,
                };
                if !self.ch.check(&auth, "OK") {
                    return Err(self.ch.command_error());
                }
            }
        }

        self.set_functionality(Functionality::Full)
    }

    /// Switch the radio off. The default context stays defined.
    pub fn disconnect_network(&mut self) -> Result<(), Error> {
        self.set_functionality(Functionality::AirplaneMode)
    }

    fn set_functionality(&mut self, fun: Functionality) -> Result<(), Error> {
        if self.ch.check(&SetModuleFunctionality { fun }, "OK") {
            Ok(())
        } else {
            self.ch
                .logger()
                .error(format_args!("Failed to set functionality {:?}", fun));
            Err(self.ch.command_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::fixture;

    #[test]
    fn connects_with_given_apn() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT+CGDCONT=0,\"IPV4V6\",\"iot.example\"" | "AT+CFUN=1" => {
                Some("\r\nOK\r\n".into())
            }
            "AT+CGAUTH=0,1,\"user\",\"\"" => Some("\r\nOK\r\n".into()),
            _ => None,
        });

        let apn = Apn::Given {
            name: "iot.example",
            username: Some("user"),
            password: None,
        };
        assert_eq!(f.device.connect_network_with(apn), Ok(()));
        assert_eq!(
            f.serial.sent(),
            vec![
                "AT+CGDCONT=0,\"IPV4V6\",\"iot.example\"",
                "AT+CGAUTH=0,1,\"user\",\"\"",
                "AT+CFUN=1"
            ]
        );
    }

    #[test]
    fn connects_with_provisioned_context() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT+CFUN=1" => Some("\r\nOK\r\n".into()),
            _ => None,
        });

        assert_eq!(f.device.connect_network(), Ok(()));
        assert_eq!(f.serial.sent(), vec!["AT+CFUN=1"]);
    }

    #[test]
    fn refused_context_stops_connect() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT+CGDCONT=0,\"IPV4V6\",\"bad\"" => Some("\r\n+CME ERROR: 4\r\n".into()),
            _ => None,
        });

        let apn = Apn::Given {
            name: "bad",
            username: None,
            password: None,
        };
        assert_eq!(f.device.connect_network_with(apn), Err(Error::Device(4)));
        assert_eq!(f.serial.sent().len(), 1);
    }

    #[test]
    fn overlong_apn_is_rejected_before_sending() {
        let (mut f, _) = fixture(true, |_| Some("\r\nOK\r\n".into()));
        let name = "a".repeat(APN_MAX_LEN + 1);

        let apn = Apn::Given {
            name: &name,
            username: None,
            password: None,
        };
        assert_eq!(f.device.connect_network_with(apn), Err(Error::CommandOverflow));
        assert!(f.serial.sent().is_empty());
    }

    #[test]
    fn disconnect_enters_airplane_mode() {
        let (mut f, _) = fixture(true, |cmd| match cmd {
            "AT+CFUN=4" => Some("\r\nERROR\r\n".into()),
            _ => None,
        });

        assert_eq!(f.device.disconnect_network(), Err(Error::UnrecognizedReply));
        assert_eq!(f.device.last_error(), -1);
    }
}
