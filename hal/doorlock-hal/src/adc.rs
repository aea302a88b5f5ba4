//! Analog input abstraction

/// Full-scale reading of a 12-bit converter
pub const ADC_MAX: u16 = 4095;

/// Single analog channel
pub trait AnalogInput {
    /// Sample the channel, waiting at most `timeout_ms` for the conversion
    ///
    /// Returns a value in `0..=ADC_MAX`, or `None` if the conversion did not
    /// complete in time.
    fn read_timeout(&mut self, timeout_ms: u32) -> Option<u16>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read_timeout(&mut self, timeout_ms: u32) -> Option<u16> {
        T::read_timeout(self, timeout_ms)
    }
}
