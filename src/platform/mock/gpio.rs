//! Mock digital pins

extern crate alloc;

use alloc::rc::Rc;
use core::cell::Cell;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::platform::error::GpioError;

/// Mock input pin
///
/// The level is driven by the test through any clone of the handle.
#[derive(Debug, Clone, Default)]
pub struct MockInput {
    level: Rc<Cell<bool>>,
    fail: Rc<Cell<bool>>,
}

impl MockInput {
    /// Input reading low
    pub fn new() -> Self {
        Self::default()
    }

    /// Input reading `high`
    pub fn with_level(high: bool) -> Self {
        let pin = Self::default();
        pin.set_level(high);
        pin
    }

    /// Set the sampled level (for simulating external signals)
    pub fn set_level(&self, high: bool) {
        self.level.set(high);
    }

    /// Make reads fail
    pub fn fail(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl ErrorType for MockInput {
    type Error = GpioError;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        if self.fail.get() {
            return Err(GpioError::ReadFailed);
        }
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|high| !high)
    }
}

/// Mock output pin
#[derive(Debug, Clone, Default)]
pub struct MockOutput {
    state: Rc<Cell<bool>>,
}

impl MockOutput {
    /// Output driven low
    pub fn new() -> Self {
        Self::default()
    }

    /// Last driven level
    pub fn is_set_high(&self) -> bool {
        self.state.get()
    }
}

impl ErrorType for MockOutput {
    type Error = GpioError;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), GpioError> {
        self.state.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), GpioError> {
        self.state.set(true);
        Ok(())
    }
}
