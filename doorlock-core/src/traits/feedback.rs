//! Audible feedback trait

/// Buzzer on the HMI node
pub trait Feedback {
    /// Short click, played on every key press
    fn beep_short(&mut self);

    /// Start a continuous tone
    fn on(&mut self);

    /// Stop the tone
    fn off(&mut self);
}

impl<T: Feedback + ?Sized> Feedback for &mut T {
    fn beep_short(&mut self) {
        T::beep_short(self)
    }

    fn on(&mut self) {
        T::on(self)
    }

    fn off(&mut self) {
        T::off(self)
    }
}
