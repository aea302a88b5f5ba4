//! Door-lock simulator
//!
//! Type key legends (`0`-`9`, `A`-`D`, `*`, `#`) followed by Enter to press
//! keys on the HMI keypad. `A` submits, `B` clears or cancels, `C` and `D`
//! move through the menu. The potentiometer sweeps its range every ten
//! seconds. Set `DOORLOCK_LOG` to `debug` or `trace` for more detail.

use std::thread;
use std::time::Duration;

use log::LevelFilter;

use doorlock_core::config::ConfigStore;
use doorlock_core::engine::{Engine, EngineConfig};
use doorlock_core::session::{Console, ControlClient, Session};
use doorlock_hal::{RamEeprom, UartConfig};
use doorlock_sim::display::TerminalDisplay;
use doorlock_sim::keypad::ChannelKeypad;
use doorlock_sim::link::link_pair_with;
use doorlock_sim::logger;
use doorlock_sim::peripherals::{SimDelay, SimLatch, SimPot, TerminalBuzzer, TerminalLed};
use doorlock_sim::EEPROM_WORDS;

const LATCH_RUN: Duration = Duration::from_millis(2000);
const POT_SWEEP: Duration = Duration::from_secs(10);

fn main() -> std::io::Result<()> {
    let level = std::env::var("DOORLOCK_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LevelFilter::Info);
    if let Err(e) = logger::init(level) {
        eprintln!("logger unavailable: {}", e);
    }

    let link_config = UartConfig::default();
    log::info!("link: {} baud, {} bits per byte", link_config.baudrate, link_config.frame_bits());
    let (hmi_link, mut control_link) = link_pair_with(&link_config);
    let (latch, _monitor) = SimLatch::new(LATCH_RUN);

    thread::Builder::new()
        .name("control".into())
        .spawn(move || {
            let store = ConfigStore::new(RamEeprom::<EEPROM_WORDS>::new());
            let mut engine = Engine::new(store, latch, EngineConfig::default())
                .with_indicator(TerminalLed::default());
            engine.run(&mut control_link)
        })?;

    let console = Console::new(
        ChannelKeypad::stdin()?,
        TerminalDisplay::stdout(),
        TerminalBuzzer::default(),
        SimDelay::realtime(),
    );
    let mut session = Session::new(ControlClient::new(hmi_link), console, SimPot::sweep(POT_SWEEP));
    session.run()
}
