//! Host simulator for the door-lock system
//!
//! Runs the Control node engine and the HMI session in one process, each on
//! its own thread, joined by an in-memory serial link. Peripherals are
//! replaced by terminal and channel backed stand-ins:
//!
//! | Node    | Peripheral    | Stand-in                             |
//! |---------|---------------|--------------------------------------|
//! | both    | UART          | [`link::ChannelIo`] in a `SerialPort`|
//! | Control | EEPROM        | `RamEeprom`                          |
//! | Control | latch motor   | [`peripherals::SimLatch`]            |
//! | Control | status LED    | [`peripherals::TerminalLed`]         |
//! | HMI     | keypad        | [`keypad::ChannelKeypad`]            |
//! | HMI     | LCD           | [`display::TerminalDisplay`]         |
//! | HMI     | buzzer        | [`peripherals::TerminalBuzzer`]      |
//! | HMI     | potentiometer | [`peripherals::SimPot`]              |

pub mod display;
pub mod keypad;
pub mod link;
pub mod logger;
pub mod peripherals;

use doorlock_core::engine::Engine;
use doorlock_core::traits::{Actuator, Indicator};
use doorlock_hal::{SerialError, WordStorage};

use link::SimLink;

/// Words of simulated EEPROM
pub const EEPROM_WORDS: usize = 16;

/// Serve requests until the HMI end of the link goes away
///
/// Unlike [`Engine::run`], this returns, so the engine can be inspected
/// afterwards.
pub fn serve_until_closed<S, A, I>(engine: &mut Engine<S, A, I>, link: &mut SimLink)
where
    S: WordStorage,
    A: Actuator,
    I: Indicator,
{
    engine.announce();
    loop {
        match engine.poll(link) {
            Ok(_) => {}
            Err(SerialError::Closed) => {
                log::info!("link closed, control node stopping");
                return;
            }
            Err(e) => {
                log::warn!("link error: {:?}", e);
                engine.resync();
            }
        }
    }
}
