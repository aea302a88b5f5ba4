//! Latch actuator trait

/// Errors that can occur when driving the latch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Drive outputs could not be set
    Drive,
    /// Latch did not reach its end position
    Stalled,
}

/// Motorized door latch
///
/// `open` and `close` block for the whole run of the motor and leave it
/// braked afterwards. The Control node does not service the link while
/// they run.
pub trait Actuator {
    /// Drive the latch to the open position
    fn open(&mut self) -> Result<(), ActuatorError>;

    /// Drive the latch to the locked position
    fn close(&mut self) -> Result<(), ActuatorError>;

    /// De-energize the motor immediately
    fn stop(&mut self);
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn open(&mut self) -> Result<(), ActuatorError> {
        T::open(self)
    }

    fn close(&mut self) -> Result<(), ActuatorError> {
        T::close(self)
    }

    fn stop(&mut self) {
        T::stop(self)
    }
}
