/// Hook serviced once per iteration of every blocking wait in the driver,
/// so that an external supervisory timer does not expire during long
/// operations such as network registration.
///
/// Implemented for any `FnMut()` closure.
pub trait Watchdog {
    fn feed(&mut self);
}

/// No external watchdog to service.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWatchdog;

impl Watchdog for NoWatchdog {
    fn feed(&mut self) {}
}

impl<F: FnMut()> Watchdog for F {
    fn feed(&mut self) {
        self()
    }
}
