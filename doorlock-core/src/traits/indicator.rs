//! Status indicator trait

/// Status LED on the Control node
///
/// Lit while the latch motor runs, flashed at start-up and when an
/// unrecognized command byte arrives.
pub trait Indicator {
    /// Light the indicator
    fn on(&mut self);

    /// Turn the indicator off
    fn off(&mut self);

    /// Flash `count` times, ending dark
    fn blink(&mut self, count: u8);
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    fn on(&mut self) {
        T::on(self)
    }

    fn off(&mut self) {
        T::off(self)
    }

    fn blink(&mut self, count: u8) {
        T::blink(self, count)
    }
}

/// Board without a status LED
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn on(&mut self) {}

    fn off(&mut self) {}

    fn blink(&mut self, _count: u8) {}
}
