use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_io::{Read, ReadReady, Write};

use crate::client::Device;
use crate::command::control::types::{Echo, UrcCategory};
use crate::command::control::{SetEcho, SetUnsolicitedReporting};
use crate::command::mobile_control::ModuleShutdown;
use crate::command::AT;
use crate::config::CellularConfig;
use crate::error::{Error, Hardware};
use crate::logger::Logger;
use crate::module_timing::{
    boot_time, poll_interval, pwr_off_alive_time, pwr_on_time, shutdown_poll_time, shutdown_time,
    ticks, transaction_time, Budget,
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
    /// Whether the module is powered, as sensed on the status line. Without a
    /// status line the module is assumed to be on.
    pub fn status(&mut self) -> Result<bool, Error> {
        match self.config.status_pin() {
            Some(pin) => pin.is_high().map_err(|_| Error::IoPin),
            None => Ok(true),
        }
    }

    pub fn set_power(&mut self, on: bool) -> Result<(), Error> {
        if on {
            self.power_up()
        } else {
            self.power_down()
        }
    }

    /// Pulse the power line and wait until the module answers `AT`.
    ///
    /// The wait for the status line is only bounded by the watchdog.
    pub fn power_up(&mut self) -> Result<(), Error> {
        self.set_state(ModemLifecycleState::PoweringOn);
        if let Err(e) = self.pulse_power_line() {
            self.set_state(ModemLifecycleState::Off);
            return Err(e);
        }

        self.ch
            .logger()
            .trace_start(format_args!("Waiting for module"));
        loop {
            match self.status() {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => {
                    self.ch.logger().trace_end(format_args!(""));
                    self.set_state(ModemLifecycleState::Off);
                    return Err(e);
                }
            }
            self.ch.logger().trace_part(format_args!("."));
            self.pause(poll_interval());
        }
        self.ch.logger().trace_end(format_args!(" powered"));

        self.set_state(ModemLifecycleState::AwaitingReady);
        let mut budget = Budget::new(boot_time());
        while !budget.is_exhausted() {
            if self.is_alive() {
                self.ch.logger().debug(format_args!("Module is alive"));
                return Ok(());
            }
            self.pause(poll_interval());
            budget.consume(transaction_time::<AT>() + poll_interval());
        }

        self.ch
            .logger()
            .error(format_args!("Module did not answer AT"));
        self.set_state(ModemLifecycleState::Off);
        Err(Error::HardwareAbsent(Hardware::Module))
    }

    /// Orderly shutdown: allow the module to report its sessions, request
    /// `#SHUTDOWN`, wait for `+SHUTDOWN` and release the power line.
    ///
    /// On failure the previous lifecycle state is restored, as the module is
    /// still powered.
    pub fn power_down(&mut self) -> Result<(), Error> {
        if !self.status()? {
            self.ch.logger().debug(format_args!("Module already off"));
            self.set_state(ModemLifecycleState::Off);
            return Ok(());
        }

        let prev = self.set_state(ModemLifecycleState::PoweringDown);
        match self.shutdown() {
            Ok(()) => {
                self.ch.logger().debug(format_args!("Powered down"));
                self.set_state(ModemLifecycleState::Off);
                Ok(())
            }
            Err(e) => {
                self.ch
                    .logger()
                    .error(format_args!("Power down failed: {:?}", e));
                self.set_state(prev);
                Err(e)
            }
        }
    }

    fn shutdown(&mut self) -> Result<(), Error> {
        let mut budget = Budget::new(pwr_off_alive_time());
        while !budget.is_exhausted() {
            if self.ch.check(&AT, "OK") {
                break;
            }
            self.pause(poll_interval());
            budget.consume(transaction_time::<AT>() + poll_interval());
        }

        self.ch.check(&SetEcho { enabled: Echo::Off }, "OK");

        for category in [UrcCategory::Lwm2m, UrcCategory::Sock] {
            if !self
                .ch
                .check(&SetUnsolicitedReporting::enable(category), "OK")
            {
                self.ch.logger().error(format_args!(
                    "Failed to enable {} notifications",
                    category.as_str()
                ));
                return Err(self.ch.command_error());
            }
        }

        if !self.ch.check(&ModuleShutdown, "OK") {
            return Err(self.ch.command_error());
        }

        let polls = shutdown_time().as_millis() / shutdown_poll_time().as_millis().max(1);
        for _ in 0..polls {
            if let Ok(reply) = self.ch.read_reply(ticks(shutdown_poll_time()), 1) {
                if reply.contains("+SHUTDOWN") {
                    if let Some(pin) = self.config.power_pin() {
                        pin.set_low().map_err(|_| Error::IoPin)?;
                    }
                    return Ok(());
                }
            }
            self.ch.feed_watchdog();
        }

        Err(Error::StateTimeout)
    }

    /// Send `AT`; an echo of the command counts as an answer too.
    pub(crate) fn is_alive(&mut self) -> bool {
        match self.ch.send(&AT) {
            Ok(reply) => reply.contains("OK") || reply.contains("AT"),
            Err(_) => false,
        }
    }

    fn pulse_power_line(&mut self) -> Result<(), Error> {
        let Some(pin) = self.config.power_pin() else {
            self.ch
                .logger()
                .debug(format_args!("No power pin configured"));
            return Ok(());
        };
        pin.set_low().map_err(|_| Error::IoPin)?;
        self.ch.delay_ms(ticks(pwr_on_time()));
        pin.set_high().map_err(|_| Error::IoPin)?;
        Ok(())
    }
}
