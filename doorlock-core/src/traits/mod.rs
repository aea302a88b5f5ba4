//! Hardware abstraction traits
//!
//! These traits define the interface between the node logic and the
//! board-specific drivers: the latch actuator and status LED on the Control
//! node, and the keypad, character display, buzzer and potentiometer on the
//! HMI node.
//! The potentiometer uses [`doorlock_hal::AnalogInput`] directly.

pub mod actuator;
pub mod display;
pub mod feedback;
pub mod indicator;
pub mod keypad;

pub use actuator::{Actuator, ActuatorError};
pub use display::{TextDisplay, TextDisplayExt, DISPLAY_COLUMNS, DISPLAY_ROWS};
pub use feedback::Feedback;
pub use indicator::{Indicator, NoIndicator};
pub use keypad::{Key, Keypad};
