use crate::logger::Logger;

/// Where the module is in its power and bring-up lifecycle.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemLifecycleState {
    #[default]
    Off,
    PoweringOn,
    /// Powered, waiting for the module to answer `AT`.
    AwaitingReady,
    CheckingSim,
    /// Initialized, but not yet registered on a network. Registration can be
    /// resumed with [`Device::wait_for_registration`].
    ///
    /// [`Device::wait_for_registration`]: crate::Device::wait_for_registration
    AwaitingRegistration,
    Registered,
    /// Registered and configured for commands.
    OperationalIdle,
    PoweringDown,
}

impl ModemLifecycleState {
    pub fn is_operational(&self) -> bool {
        matches!(self, Self::OperationalIdle)
    }
}

#[derive(Debug, Default)]
pub(crate) struct StateMachine {
    state: ModemLifecycleState,
}

impl StateMachine {
    pub(crate) const fn new() -> Self {
        Self {
            state: ModemLifecycleState::Off,
        }
    }

    pub(crate) fn get(&self) -> ModemLifecycleState {
        self.state
    }

    /// Move to `next`, returning the state that was left.
    pub(crate) fn set<L: Logger>(
        &mut self,
        next: ModemLifecycleState,
        logger: &mut L,
    ) -> ModemLifecycleState {
        if self.state != next {
            logger.debug(format_args!("State transition: {:?} -> {:?}", self.state, next));
        }
        core::mem::replace(&mut self.state, next)
    }
}
