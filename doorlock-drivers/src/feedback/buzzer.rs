//! Piezo buzzer on a GPIO pin
//!
//! An active buzzer sounds while its pin is high. Pin errors are ignored:
//! feedback is advisory and a stuck buzzer must not stall the HMI.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use doorlock_core::traits::Feedback;

/// Length of the key click (ms)
pub const CLICK_MS: u32 = 30;

/// Buzzer driven directly from an output pin
pub struct PinBuzzer<P, D> {
    pin: P,
    delay: D,
    click_ms: u32,
}

impl<P: OutputPin, D: DelayNs> PinBuzzer<P, D> {
    /// Create a silent buzzer
    pub fn new(pin: P, delay: D) -> Self {
        let mut buzzer = Self {
            pin,
            delay,
            click_ms: CLICK_MS,
        };
        buzzer.off();
        buzzer
    }

    /// Change the key click length
    pub fn with_click_ms(mut self, click_ms: u32) -> Self {
        self.click_ms = click_ms;
        self
    }

    /// Give back the pin and delay
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin, D: DelayNs> Feedback for PinBuzzer<P, D> {
    fn beep_short(&mut self) {
        self.on();
        self.delay.delay_ms(self.click_ms);
        self.off();
    }

    fn on(&mut self) {
        let _ = self.pin.set_high();
    }

    fn off(&mut self) {
        let _ = self.pin.set_low();
    }
}
