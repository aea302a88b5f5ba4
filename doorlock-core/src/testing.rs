//! Fakes shared by the unit tests

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use doorlock_hal::{AnalogInput, EepromError, ErrorType, RamEeprom, Uart, UartRx, UartTx, WordStorage};

use crate::config::ConfigStore;
use crate::engine::{Engine, EngineConfig};
use crate::session::{Console, ControlClient, Session};
use crate::traits::{
    Actuator, ActuatorError, Feedback, Indicator, Key, Keypad, TextDisplay, DISPLAY_COLUMNS,
};

/// Word storage that can be told to fail, and logs every committed write
pub struct FlakyEeprom<const N: usize> {
    inner: RamEeprom<N>,
    writes_left: Option<usize>,
    fail_reads: bool,
    log: Vec<(u32, u32)>,
}

impl<const N: usize> FlakyEeprom<N> {
    pub fn new() -> Self {
        Self {
            inner: RamEeprom::new(),
            writes_left: None,
            fail_reads: false,
            log: Vec::new(),
        }
    }

    /// Allow `count` more writes, then fail every write
    pub fn fail_after(&mut self, count: usize) {
        self.writes_left = Some(count);
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn write_log(&self) -> &[(u32, u32)] {
        &self.log
    }

    pub fn words(&self) -> &[u32; N] {
        self.inner.words()
    }
}

impl<const N: usize> WordStorage for FlakyEeprom<N> {
    type Error = EepromError;

    fn read_word(&mut self, offset: u32) -> Result<u32, Self::Error> {
        if self.fail_reads {
            return Err(EepromError::Busy);
        }
        self.inner.read_word(offset)
    }

    fn write_word(&mut self, offset: u32, value: u32) -> Result<(), Self::Error> {
        match self.writes_left {
            Some(0) => return Err(EepromError::WriteFailed),
            Some(ref mut left) => *left -= 1,
            None => {}
        }
        self.inner.write_word(offset, value)?;
        self.log.push((offset, value));
        Ok(())
    }

    fn capacity_words(&self) -> u32 {
        self.inner.capacity_words()
    }
}

/// Actuator that counts runs
#[derive(Debug, Default)]
pub struct RecordingActuator {
    pub opens: u32,
    pub closes: u32,
    pub stops: u32,
    /// Report a drive fault on every run
    pub fail: bool,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Actuator for RecordingActuator {
    fn open(&mut self) -> Result<(), ActuatorError> {
        self.opens += 1;
        if self.fail {
            Err(ActuatorError::Drive)
        } else {
            Ok(())
        }
    }

    fn close(&mut self) -> Result<(), ActuatorError> {
        self.closes += 1;
        if self.fail {
            Err(ActuatorError::Drive)
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

/// Status LED that remembers what it was asked to show
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    pub lit: bool,
    pub lit_count: u32,
    pub blinks: Vec<u8>,
}

impl Indicator for RecordingIndicator {
    fn on(&mut self) {
        self.lit = true;
        self.lit_count += 1;
    }

    fn off(&mut self) {
        self.lit = false;
    }

    fn blink(&mut self, count: u8) {
        self.blinks.push(count);
        self.lit = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestLinkError {
    /// A blocking read found nothing to return
    Empty,
}

pub type LoopbackEngine = Engine<RamEeprom<8>, RecordingActuator>;

/// Link whose far end is a real engine, answering synchronously
pub struct LoopbackLink {
    engine: LoopbackEngine,
    pending: VecDeque<u8>,
}

impl LoopbackLink {
    pub fn fresh() -> Self {
        let engine = Engine::new(
            ConfigStore::new(RamEeprom::new()),
            RecordingActuator::new(),
            EngineConfig::default(),
        );
        Self {
            engine,
            pending: VecDeque::new(),
        }
    }

    pub fn provisioned(credential: &[u8; 5]) -> Self {
        let mut link = Self::fresh();
        for &byte in b"N".iter().chain(credential.iter()) {
            link.engine.feed(byte);
        }
        assert!(link.engine.configuration().initialized);
        link
    }

    pub fn engine(&self) -> &LoopbackEngine {
        &self.engine
    }
}

impl ErrorType for LoopbackLink {
    type Error = TestLinkError;
}

impl UartTx for LoopbackLink {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        for &byte in data {
            if let Some(reply) = self.engine.feed(byte) {
                self.pending.push_back(reply.to_byte());
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl UartRx for LoopbackLink {
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        drain_into(&mut self.pending, buf)
    }

    fn read_byte_timeout(&mut self, _timeout_ms: u32) -> Result<Option<u8>, Self::Error> {
        Ok(self.pending.pop_front())
    }
}

/// Link with nobody on the other end
#[derive(Debug, Default)]
pub struct SilentLink {
    sent: Vec<u8>,
}

impl ErrorType for SilentLink {
    type Error = TestLinkError;
}

impl UartTx for SilentLink {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.sent.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl UartRx for SilentLink {
    fn read_blocking(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Err(TestLinkError::Empty)
    }

    fn read_byte_timeout(&mut self, _timeout_ms: u32) -> Result<Option<u8>, Self::Error> {
        Ok(None)
    }
}

/// Link answering each write with the next scripted reply
///
/// `None` in the script means the write goes unanswered.
#[derive(Debug, Default)]
pub struct ScriptedLink {
    replies: VecDeque<Option<u8>>,
    pending: VecDeque<u8>,
    sent: Vec<u8>,
}

impl ScriptedLink {
    pub fn new(replies: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Queue bytes as if they arrived unsolicited
    pub fn inject(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }

    pub fn sent(&self) -> &[u8] {
        &self.sent
    }
}

impl ErrorType for ScriptedLink {
    type Error = TestLinkError;
}

impl UartTx for ScriptedLink {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.sent.extend_from_slice(data);
        if let Some(Some(reply)) = self.replies.pop_front() {
            self.pending.push_back(reply);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl UartRx for ScriptedLink {
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        drain_into(&mut self.pending, buf)
    }

    fn read_byte_timeout(&mut self, _timeout_ms: u32) -> Result<Option<u8>, Self::Error> {
        Ok(self.pending.pop_front())
    }
}

fn drain_into(pending: &mut VecDeque<u8>, buf: &mut [u8]) -> Result<usize, TestLinkError> {
    if pending.is_empty() {
        return Err(TestLinkError::Empty);
    }
    let mut count = 0;
    for slot in buf.iter_mut() {
        match pending.pop_front() {
            Some(byte) => {
                *slot = byte;
                count += 1;
            }
            None => break,
        }
    }
    Ok(count)
}

/// Keypad replaying a script
///
/// Script characters are key legends; `.` is a poll that sees no key and
/// spaces are ignored. Running past the end of the script panics.
#[derive(Debug)]
pub struct ScriptedKeypad {
    keys: VecDeque<Option<Key>>,
}

impl ScriptedKeypad {
    pub fn typing(script: &str) -> Self {
        let keys = script
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => None,
                c => Some(Key::from_char(c).expect("unknown key legend in script")),
            })
            .collect();
        Self { keys }
    }
}

impl Keypad for ScriptedKeypad {
    fn read_key(&mut self) -> Key {
        loop {
            match self.keys.pop_front() {
                Some(Some(key)) => return key,
                Some(None) => continue,
                None => panic!("keypad script exhausted"),
            }
        }
    }

    fn read_key_timeout(&mut self, _timeout_ms: u32) -> Option<Key> {
        self.keys.pop_front().expect("keypad script exhausted")
    }
}

/// Display keeping a screen image and every text written
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    rows: [String; 2],
    cursor: (u8, u8),
    transcript: String,
}

impl RecordingDisplay {
    pub fn transcript(&self) -> String {
        self.transcript.clone()
    }

    pub fn row(&self, row: usize) -> &str {
        &self.rows[row]
    }
}

impl TextDisplay for RecordingDisplay {
    fn clear(&mut self) {
        self.rows = Default::default();
        self.cursor = (0, 0);
        self.transcript.push('\n');
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        self.cursor = (row.min(1), col.min(DISPLAY_COLUMNS));
    }

    fn write(&mut self, text: &str) {
        self.transcript.push_str(text);

        let (row, col) = self.cursor;
        let line = &mut self.rows[row as usize];
        let mut chars: Vec<char> = line.chars().collect();
        chars.resize(DISPLAY_COLUMNS as usize, ' ');
        let mut col = col as usize;
        for c in text.chars() {
            if col >= chars.len() {
                break;
            }
            chars[col] = c;
            col += 1;
        }
        *line = chars.into_iter().collect::<String>().trim_end().into();
        self.cursor.1 = col as u8;
    }
}

/// Buzzer counting clicks and tones
#[derive(Debug, Default)]
pub struct CountingBuzzer {
    pub clicks: u32,
    pub tones: u32,
    pub sounding: bool,
}

impl Feedback for CountingBuzzer {
    fn beep_short(&mut self) {
        self.clicks += 1;
    }

    fn on(&mut self) {
        self.tones += 1;
        self.sounding = true;
    }

    fn off(&mut self) {
        self.sounding = false;
    }
}

/// Delay that only accumulates the requested time
#[derive(Debug, Default)]
pub struct FakeDelay {
    elapsed_ns: u64,
}

impl FakeDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ns += u64::from(ms) * 1_000_000;
    }
}

/// Potentiometer stuck at one reading
#[derive(Debug, Clone, Copy)]
pub struct FixedPot(Option<u16>);

impl FixedPot {
    pub fn at(raw: u16) -> Self {
        Self(Some(raw))
    }

    /// Every read times out
    pub fn failed() -> Self {
        Self(None)
    }
}

impl AnalogInput for FixedPot {
    fn read_timeout(&mut self, _timeout_ms: u32) -> Option<u16> {
        self.0
    }
}

pub type TestSession<L> =
    Session<L, ScriptedKeypad, RecordingDisplay, CountingBuzzer, FixedPot, FakeDelay>;

pub fn test_session<L: Uart>(link: L, keys: &str, pot: FixedPot) -> TestSession<L> {
    let console = Console::new(
        ScriptedKeypad::typing(keys),
        RecordingDisplay::default(),
        CountingBuzzer::default(),
        FakeDelay::default(),
    );
    Session::new(ControlClient::new(link), console, pot)
}
