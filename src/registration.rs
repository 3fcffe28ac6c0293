use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::network_service::types::NetworkRegistrationState;
use crate::command::network_service::GetEPSNetworkRegistrationStatus;
use crate::config::CellularConfig;
use crate::error::Error;
use crate::logger::Logger;
use crate::module_timing::{
    poll_interval, registration_time, ticks, transaction_time, Budget,
};
use crate::state::ModemLifecycleState;
use crate::watchdog::Watchdog;

impl<T, D, C, L, W> Device<T, D, C, L, W>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
    L: Logger,
    W: Watchdog,
{
    /// Query the EPS network registration status.
    pub fn network_registration(&mut self) -> Result<NetworkRegistrationState, Error> {
        self.ch.query(&GetEPSNetworkRegistrationStatus)?.state()
    }

    /// Poll the registration status for up to a minute.
    ///
    /// When called after [`Device::begin`] gave up waiting for registration,
    /// a successful registration finishes the bring-up and leaves the module
    /// operational.
    pub fn wait_for_registration(&mut self) -> Result<NetworkRegistrationState, Error> {
        let mut budget = Budget::new(registration_time());
        let stat = self.await_registration(&mut budget)?;
        if self.state() == ModemLifecycleState::AwaitingRegistration {
            self.configure_session();
        }
        Ok(stat)
    }

    pub(crate) fn await_registration(
        &mut self,
        budget: &mut Budget,
    ) -> Result<NetworkRegistrationState, Error> {
        while !budget.is_exhausted() {
            if let Some(stat) = self.poll_registration() {
                return Ok(stat);
            }
            budget.consume(transaction_time::<GetEPSNetworkRegistrationStatus>());
            self.pause(poll_interval());
            budget.consume(poll_interval());
        }
        Err(Error::StateTimeout)
    }

    /// Wait for registration during bring-up. Every round first listens
    /// for `+CONNECTED` for one poll interval, until it was seen, then
    /// queries the registration status. Both share `budget`.
    pub(crate) fn await_network(
        &mut self,
        budget: &mut Budget,
    ) -> Result<NetworkRegistrationState, Error> {
        let poll = poll_interval();
        let mut connected = false;
        while !budget.is_exhausted() {
            if !connected {
                connected = self.read_marker("CONNECTED", ticks(poll));
                budget.consume(poll);
                if connected {
                    self.ch.logger().debug(format_args!("Network connected"));
                }
            }
            if let Some(stat) = self.poll_registration() {
                return Ok(stat);
            }
            budget.consume(transaction_time::<GetEPSNetworkRegistrationStatus>());
            self.pause(poll);
            budget.consume(poll);
        }
        Err(Error::StateTimeout)
    }

    /// Query the registration status once, `Some` when registered.
    fn poll_registration(&mut self) -> Option<NetworkRegistrationState> {
        match self.network_registration() {
            Ok(stat) => {
                self.ch
                    .logger()
                    .debug(format_args!("Registration status: {:?}", stat));
                Some(stat).filter(NetworkRegistrationState::is_registered)
            }
            Err(e) => {
                self.ch
                    .logger()
                    .debug(format_args!("Registration query failed: {:?}", e));
                None
            }
        }
    }
}
