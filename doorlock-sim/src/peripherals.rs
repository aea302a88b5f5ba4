//! Stand-ins for the latch motor, status LED, buzzer, potentiometer and delays

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

use doorlock_core::traits::{Actuator, ActuatorError, Feedback, Indicator};
use doorlock_hal::{AnalogInput, ADC_MAX};

/// Where the simulated latch is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchPosition {
    Unknown,
    Open,
    Locked,
}

/// Observable latch state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatchState {
    pub position: LatchPosition,
    pub opens: u32,
    pub closes: u32,
    pub stops: u32,
}

/// Latch motor that takes `run` to travel and logs every move
pub struct SimLatch {
    run: Duration,
    state: Arc<Mutex<LatchState>>,
}

/// Read-only view of a [`SimLatch`] from another thread
#[derive(Clone)]
pub struct LatchMonitor {
    state: Arc<Mutex<LatchState>>,
}

impl LatchMonitor {
    pub fn state(&self) -> LatchState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SimLatch {
    pub fn new(run: Duration) -> (Self, LatchMonitor) {
        let state = Arc::new(Mutex::new(LatchState {
            position: LatchPosition::Unknown,
            opens: 0,
            closes: 0,
            stops: 0,
        }));
        let monitor = LatchMonitor {
            state: Arc::clone(&state),
        };
        (Self { run, state }, monitor)
    }

    fn travel(&mut self, to: LatchPosition) {
        log::info!("latch moving to {:?}", to);
        thread::sleep(self.run);

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.position = to;
        match to {
            LatchPosition::Open => state.opens += 1,
            LatchPosition::Locked => state.closes += 1,
            LatchPosition::Unknown => {}
        }
    }
}

impl Actuator for SimLatch {
    fn open(&mut self) -> Result<(), ActuatorError> {
        self.travel(LatchPosition::Open);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ActuatorError> {
        self.travel(LatchPosition::Locked);
        Ok(())
    }

    fn stop(&mut self) {
        log::debug!("latch motor stopped");
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .stops += 1;
    }
}

/// Buzzer reported through the log
#[derive(Debug, Default)]
pub struct TerminalBuzzer {
    sounding: bool,
    clicks: u32,
}

impl TerminalBuzzer {
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}

impl Feedback for TerminalBuzzer {
    fn beep_short(&mut self) {
        self.clicks += 1;
        log::trace!("click");
    }

    fn on(&mut self) {
        self.sounding = true;
        log::trace!("tone on");
    }

    fn off(&mut self) {
        self.sounding = false;
        log::trace!("tone off");
    }
}

/// Control node status LED reported through the log
#[derive(Debug, Default)]
pub struct TerminalLed {
    lit: bool,
    blinks: u32,
}

impl TerminalLed {
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Total flashes so far
    pub fn blinks(&self) -> u32 {
        self.blinks
    }
}

impl Indicator for TerminalLed {
    fn on(&mut self) {
        self.lit = true;
        log::debug!("status LED on");
    }

    fn off(&mut self) {
        self.lit = false;
        log::debug!("status LED off");
    }

    fn blink(&mut self, count: u8) {
        self.lit = false;
        self.blinks += u32::from(count);
        log::debug!("status LED blinks {}x", count);
    }
}

/// Potentiometer stand-in
#[derive(Debug, Clone, Copy)]
pub enum SimPot {
    /// Fixed reading
    Fixed(u16),
    /// Triangle sweep across the full range, once per `period`
    Sweep { start: Instant, period: Duration },
}

impl SimPot {
    pub fn sweep(period: Duration) -> Self {
        SimPot::Sweep {
            start: Instant::now(),
            period,
        }
    }
}

impl AnalogInput for SimPot {
    fn read_timeout(&mut self, _timeout_ms: u32) -> Option<u16> {
        match *self {
            SimPot::Fixed(raw) => Some(raw.min(ADC_MAX)),
            SimPot::Sweep { start, period } => {
                let period_ms = period.as_millis().max(2);
                let phase = start.elapsed().as_millis() % period_ms;
                let half = period_ms / 2;
                let rising = if phase < half { phase } else { period_ms - phase };
                let raw = rising * u128::from(ADC_MAX) / half;
                Some(raw.min(u128::from(ADC_MAX)) as u16)
            }
        }
    }
}

/// Blocking delay on the host
///
/// A compressed delay returns immediately so scripted runs finish quickly.
#[derive(Debug, Clone, Copy)]
pub struct SimDelay {
    realtime: bool,
}

impl SimDelay {
    pub fn realtime() -> Self {
        Self { realtime: true }
    }

    pub fn compressed() -> Self {
        Self { realtime: false }
    }
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        if self.realtime {
            thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        if self.realtime {
            thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}
