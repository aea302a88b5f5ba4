//! Status LED on a GPIO pin
//!
//! The LED is lit while its pin is high. As with the buzzer, pin errors are
//! dropped: the LED only reports activity.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use doorlock_core::traits::Indicator;

/// Time the LED spends in each half of a blink (ms)
pub const BLINK_PHASE_MS: u32 = 150;

/// LED driven directly from an output pin
pub struct PinLed<P, D> {
    pin: P,
    delay: D,
    phase_ms: u32,
}

impl<P: OutputPin, D: DelayNs> PinLed<P, D> {
    /// Create a dark LED
    pub fn new(pin: P, delay: D) -> Self {
        let mut led = Self {
            pin,
            delay,
            phase_ms: BLINK_PHASE_MS,
        };
        led.off();
        led
    }

    /// Change the on and off time of a blink
    pub fn with_phase_ms(mut self, phase_ms: u32) -> Self {
        self.phase_ms = phase_ms;
        self
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin, D: DelayNs> Indicator for PinLed<P, D> {
    fn on(&mut self) {
        let _ = self.pin.set_high();
    }

    fn off(&mut self) {
        let _ = self.pin.set_low();
    }

    fn blink(&mut self, count: u8) {
        for _ in 0..count {
            self.on();
            self.delay.delay_ms(self.phase_ms);
            self.off();
            self.delay.delay_ms(self.phase_ms);
        }
    }
}
