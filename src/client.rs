use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_io::{Read, ReadReady, Write};

use crate::channel::AtChannel;
use crate::command::control::types::{Echo, TerminationErrorMode};
use crate::command::control::{SetEcho, SetReportMobileTerminationError};
use crate::config::CellularConfig;
use crate::error::{Error, Hardware};
use crate::logger::{Logger, NoopLogger};
use crate::module_timing::{poll_interval, ready_time, registration_time, ticks, Budget};
use crate::socket::SocketState;
use crate::state::{ModemLifecycleState, StateMachine};
use crate::watchdog::{NoWatchdog, Watchdog};

/// Driver for a Skywire Nano module on a serial link.
///
/// `T` is the serial transport, `D` the delay source every wait is timed
/// with, and `C` the board configuration. Logging and watchdog servicing are
/// opt-in through [`Device::with_logger`] and [`Device::with_watchdog`].
pub struct Device<T, D, C, L = NoopLogger, W = NoWatchdog> {
    pub(crate) ch: AtChannel<T, D, L, W>,
    pub(crate) config: C,
    pub(crate) state: StateMachine,
    pub(crate) socket: SocketState,
}

impl<T, D, C> Device<T, D, C>
where
    C: CellularConfig,
{
    /// Create the driver. Drives the power line high, which is its idle
    /// level.
    pub fn new(transport: T, delay: D, mut config: C) -> Self {
        if let Some(pin) = config.power_pin() {
            pin.set_high().ok();
        }
        Self {
            ch: AtChannel::new(transport, delay, NoopLogger, NoWatchdog),
            config,
            state: StateMachine::new(),
            socket: SocketState::new(),
        }
    }
}

impl<T, D, C, L, W> Device<T, D, C, L, W> {
    pub fn with_logger<L2: Logger>(self, logger: L2) -> Device<T, D, C, L2, W> {
        Device {
            ch: self.ch.with_logger(logger),
            config: self.config,
            state: self.state,
            socket: self.socket,
        }
    }

    pub fn with_watchdog<W2: Watchdog>(self, watchdog: W2) -> Device<T, D, C, L, W2> {
        Device {
            ch: self.ch.with_watchdog(watchdog),
            config: self.config,
            state: self.state,
            socket: self.socket,
        }
    }

    pub fn state(&self) -> ModemLifecycleState {
        self.state.get()
    }

    /// Code of the last failed command. See [`AtChannel::last_error`].
    pub fn last_error(&self) -> i16 {
        self.ch.last_error()
    }

    /// The underlying command channel, for commands the driver does not wrap.
    pub fn channel(&mut self) -> &mut AtChannel<T, D, L, W> {
        &mut self.ch
    }

    /// Give back the transport, the delay source and the configuration.
    pub fn release(self) -> (T, D, C) {
        let (transport, delay) = self.ch.release();
        (transport, delay, self.config)
    }
}

impl<T, D, C, L, W> Device<T, D, C, L, W>
where
    T: Read + Write + ReadReady,
    D: DelayNs,
    C: CellularConfig,
    L: Logger,
    W: Watchdog,
{
    /// Bring the module from an unknown state to operational.
    ///
    /// Power-cycles the module, checks for a SIM card, waits for `READY`,
    /// then waits up to a minute for network registration before turning
    /// command echo off and enabling `+CME ERROR` reporting.
    ///
    /// If registration does not happen in time, [`Error::StateTimeout`] is
    /// returned and the module stays initialized in
    /// [`ModemLifecycleState::AwaitingRegistration`]. Every other failure
    /// leaves it [`ModemLifecycleState::Off`].
    pub fn begin(&mut self) -> Result<(), Error> {
        self.ch.logger().debug(format_args!("Powering off module"));
        if let Err(e) = self.power_down() {
            self.ch
                .logger()
                .debug(format_args!("Power down before start-up failed: {:?}", e));
        }

        self.ch.logger().debug(format_args!("Powering on module"));
        self.power_up()?;

        self.ch.logger().debug(format_args!("Checking SIM card"));
        self.set_state(ModemLifecycleState::CheckingSim);
        if !self.sim_present() {
            self.ch.logger().error(format_args!("No SIM card detected"));
            self.set_state(ModemLifecycleState::Off);
            return Err(Error::HardwareAbsent(Hardware::Sim));
        }

        self.ch
            .logger()
            .debug(format_args!("Waiting for module initialization"));
        let mut budget = Budget::new(ready_time());
        if !self.await_marker("READY", &mut budget) {
            self.ch
                .logger()
                .error(format_args!("Module did not report READY"));
            self.set_state(ModemLifecycleState::Off);
            return Err(Error::StateTimeout);
        }
        self.set_state(ModemLifecycleState::AwaitingRegistration);

        self.ch
            .logger()
            .debug(format_args!("Waiting for network registration"));
        let mut budget = Budget::new(registration_time());
        if let Err(e) = self.await_network(&mut budget) {
            self.ch
                .logger()
                .error(format_args!("Network registration failed: {:?}", e));
            return Err(e);
        }

        self.configure_session();
        Ok(())
    }

    /// Registered: turn echo off, select verbose error reporting and report
    /// the module as operational.
    pub(crate) fn configure_session(&mut self) {
        self.set_state(ModemLifecycleState::Registered);
        if !self.ch.check(&SetEcho { enabled: Echo::Off }, "OK") {
            self.ch.logger().debug(format_args!("Failed to disable echo"));
        }
        if !self.ch.check(
            &SetReportMobileTerminationError {
                n: TerminationErrorMode::Verbose,
            },
            "OK",
        ) {
            self.ch
                .logger()
                .debug(format_args!("Failed to enable error reporting"));
        }
        self.set_state(ModemLifecycleState::OperationalIdle);
        self.ch.feed_watchdog();
    }

    /// Read lines until one contains `marker`, pacing attempts by the poll
    /// interval until `budget` is used up.
    pub(crate) fn await_marker(&mut self, marker: &str, budget: &mut Budget) -> bool {
        let poll = poll_interval();
        while !budget.is_exhausted() {
            if self.read_marker(marker, ticks(poll)) {
                return true;
            }
            budget.consume(poll);
            self.pause(poll);
            budget.consume(poll);
        }
        false
    }

    /// Read one line within `window_ticks` and check it for `marker`.
    pub(crate) fn read_marker(&mut self, marker: &str, window_ticks: u32) -> bool {
        matches!(self.ch.read_reply(window_ticks, 1), Ok(reply) if reply.contains(marker))
    }

    pub(crate) fn set_state(&mut self, next: ModemLifecycleState) -> ModemLifecycleState {
        self.state.set(next, self.ch.logger())
    }

    /// Sleep for `duration` while feeding the watchdog.
    pub(crate) fn pause(&mut self, duration: Duration) {
        self.ch.pause(ticks(duration));
    }
}
