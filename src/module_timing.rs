use atat::AtatCmd;
use embassy_time::Duration;

/// Low time of the power line to switch the module on
pub fn pwr_on_time() -> Duration {
    Duration::from_millis(300)
}

/// Pacing of every lifecycle polling loop
pub fn poll_interval() -> Duration {
    Duration::from_millis(500)
}

/// Time for the module to start answering `AT` after power-on
pub fn boot_time() -> Duration {
    Duration::from_secs(7)
}

/// Time for the module to report `READY` after the SIM check
pub fn ready_time() -> Duration {
    Duration::from_secs(5)
}

/// Shared budget for `+CONNECTED` and network registration
pub fn registration_time() -> Duration {
    Duration::from_secs(60)
}

/// Time for the module to answer `AT` before shutdown
pub fn pwr_off_alive_time() -> Duration {
    Duration::from_secs(5)
}

/// Time for `+SHUTDOWN` to arrive after `#SHUTDOWN` was accepted
pub fn shutdown_time() -> Duration {
    Duration::from_secs(60)
}

/// Read window of a single `+SHUTDOWN` poll
pub fn shutdown_poll_time() -> Duration {
    Duration::from_secs(1)
}

/// Default budget of a command transaction
pub fn command_time() -> Duration {
    Duration::from_secs(1)
}

/// Worst case duration of one `Cmd` transaction.
pub(crate) fn transaction_time<Cmd: AtatCmd>() -> Duration {
    Duration::from_millis(u64::from(Cmd::MAX_TIMEOUT_MS))
}

/// Framer ticks in `duration`, saturating.
pub(crate) fn ticks(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Countdown of the time left to a lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Budget {
    remaining: Duration,
}

impl Budget {
    pub(crate) fn new(total: Duration) -> Self {
        Self { remaining: total }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.remaining == Duration::MIN
    }

    pub(crate) fn consume(&mut self, spent: Duration) {
        self.remaining = self.remaining.checked_sub(spent).unwrap_or(Duration::MIN);
    }
}
