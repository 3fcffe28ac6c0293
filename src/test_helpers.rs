//! Hand-written mocks for the serial link, the delay source, the module's
//! control lines and the watchdog hook.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Once;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::logger::Logger;

static INIT: Once = Once::new();

pub fn init_logging() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
            .is_test(true)
            .init();
    });
}

type Responder = Box<dyn FnMut(&str) -> Option<String>>;

#[derive(Default)]
struct SerialState {
    rx: VecDeque<u8>,
    delayed: Option<(usize, Vec<u8>)>,
    line: Vec<u8>,
    sent: Vec<String>,
}

/// Serial link double. Every command line written to it is recorded and,
/// when a responder is installed, answered by queueing the responder's
/// output for reading.
pub struct MockSerial {
    state: Rc<RefCell<SerialState>>,
    responder: Option<Responder>,
}

/// Shared view on a [`MockSerial`] after it was moved into the driver.
#[derive(Clone)]
pub struct SerialHandle(Rc<RefCell<SerialState>>);

impl MockSerial {
    pub fn new() -> (Self, SerialHandle) {
        let state = Rc::new(RefCell::new(SerialState::default()));
        (
            Self {
                state: state.clone(),
                responder: None,
            },
            SerialHandle(state),
        )
    }

    pub fn with_responder(
        responder: impl FnMut(&str) -> Option<String> + 'static,
    ) -> (Self, SerialHandle) {
        let (mut serial, handle) = Self::new();
        serial.responder = Some(Box::new(responder));
        (serial, handle)
    }
}

impl SerialHandle {
    pub fn push(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Make `bytes` readable only after `polls` readiness checks found the
    /// receive queue empty.
    pub fn push_after(&self, polls: usize, bytes: &[u8]) {
        self.0.borrow_mut().delayed = Some((polls, bytes.to_vec()));
    }

    /// Command lines written so far, without terminators.
    pub fn sent(&self) -> Vec<String> {
        self.0.borrow().sent.clone()
    }

    /// Bytes queued for reading that the driver has not consumed.
    pub fn remaining(&self) -> Vec<u8> {
        self.0.borrow().rx.iter().copied().collect()
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.rx.is_empty() {
            if let Some((polls, bytes)) = state.delayed.take() {
                if polls == 0 {
                    state.rx.extend(bytes);
                } else {
                    state.delayed = Some((polls - 1, bytes));
                }
            }
        }
        Ok(!state.rx.is_empty())
    }
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut state = self.state.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            match state.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &b in buf {
            if b != b'\n' {
                self.state.borrow_mut().line.push(b);
                continue;
            }
            let line = {
                let mut state = self.state.borrow_mut();
                let raw = core::mem::take(&mut state.line);
                let line = String::from_utf8_lossy(&raw)
                    .trim_end_matches('\r')
                    .to_string();
                state.sent.push(line.clone());
                line
            };
            if let Some(reply) = self.responder.as_mut().and_then(|r| r(&line)) {
                self.state.borrow_mut().rx.extend(reply.bytes());
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Delay source that only accumulates the requested time.
#[derive(Clone, Default)]
pub struct MockDelay {
    elapsed_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }
}

/// Module status and power lines. A low-then-high pulse on the power line
/// switches the module on.
#[derive(Clone)]
pub struct Board {
    status: Rc<Cell<bool>>,
    power_level: Rc<Cell<bool>>,
    boot_polls: Rc<Cell<u32>>,
    booting: Rc<Cell<Option<u32>>>,
}

impl Board {
    pub fn new(powered: bool) -> Self {
        Self {
            status: Rc::new(Cell::new(powered)),
            power_level: Rc::new(Cell::new(false)),
            boot_polls: Rc::new(Cell::new(0)),
            booting: Rc::new(Cell::new(None)),
        }
    }

    /// After a power pulse the status line reads low `polls` times before
    /// it goes high.
    pub fn with_boot_polls(self, polls: u32) -> Self {
        self.boot_polls.set(polls);
        self
    }

    pub fn power_pin(&self) -> MockPowerPin {
        MockPowerPin {
            board: self.clone(),
            pulsed_low: false,
        }
    }

    pub fn status_pin(&self) -> MockStatusPin {
        MockStatusPin(self.clone())
    }

    pub fn is_powered(&self) -> bool {
        self.status.get()
    }

    pub fn power_level(&self) -> bool {
        self.power_level.get()
    }
}

pub struct MockPowerPin {
    board: Board,
    pulsed_low: bool,
}

impl ErrorType for MockPowerPin {
    type Error = Infallible;
}

impl OutputPin for MockPowerPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.board.power_level.set(false);
        self.pulsed_low = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.board.power_level.set(true);
        if core::mem::take(&mut self.pulsed_low) {
            match self.board.boot_polls.get() {
                0 => self.board.status.set(true),
                polls => self.board.booting.set(Some(polls)),
            }
        }
        Ok(())
    }
}

pub struct MockStatusPin(Board);

impl ErrorType for MockStatusPin {
    type Error = Infallible;
}

impl InputPin for MockStatusPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        match self.0.booting.get() {
            Some(0) => {
                self.0.booting.set(None);
                self.0.status.set(true);
            }
            Some(polls) => self.0.booting.set(Some(polls - 1)),
            None => {}
        }
        Ok(self.0.status.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub fn counting_watchdog() -> (impl FnMut(), Rc<Cell<u32>>) {
    let fed = Rc::new(Cell::new(0));
    let counter = fed.clone();
    (move || counter.set(counter.get() + 1), fed)
}

/// Logger that keeps every emitted record, prefixed with its level.
#[derive(Clone, Default)]
pub struct RecordingLogger {
    records: Rc<RefCell<Vec<String>>>,
    line: String,
}

impl RecordingLogger {
    pub fn records(&self) -> Vec<String> {
        self.records.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.records.borrow().iter().any(|r| r.contains(needle))
    }

    fn record(&self, level: &str, args: core::fmt::Arguments<'_>) {
        self.records.borrow_mut().push(format!("{level}: {args}"));
    }
}

impl Logger for RecordingLogger {
    fn error(&mut self, args: core::fmt::Arguments<'_>) {
        self.record("ERROR", args);
    }

    fn info(&mut self, args: core::fmt::Arguments<'_>) {
        self.record("INFO", args);
    }

    fn debug(&mut self, args: core::fmt::Arguments<'_>) {
        self.record("DEBUG", args);
    }

    fn trace(&mut self, args: core::fmt::Arguments<'_>) {
        self.record("TRACE", args);
    }

    fn trace_start(&mut self, args: core::fmt::Arguments<'_>) {
        self.line = args.to_string();
    }

    fn trace_part(&mut self, args: core::fmt::Arguments<'_>) {
        self.line.push_str(&args.to_string());
    }

    fn trace_end(&mut self, args: core::fmt::Arguments<'_>) {
        self.line.push_str(&args.to_string());
        let line = core::mem::take(&mut self.line);
        self.record("TRACE", format_args!("{line}"));
    }

    fn trace_part_ascii_dump(&mut self, bytes: &[u8]) {
        self.line
            .push_str(&crate::fmt::Bytes(bytes).to_string());
    }
}
