//! In-memory serial link
//!
//! A pair of channel endpoints exposed through `embedded-io`, wrapped in the
//! HAL's [`SerialPort`] so both nodes see exactly what a UART would give
//! them. Dropping one end closes the other. Writes can be paced to the
//! byte time of a [`UartConfig`].

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use doorlock_hal::{Clock, SerialPort, UartConfig};

/// Link endpoint as seen by a node
pub type SimLink = SerialPort<ChannelIo, StdClock>;

/// Create two connected endpoints that transfer instantly
pub fn link_pair() -> (SimLink, SimLink) {
    paced_pair(Duration::ZERO)
}

/// Create two connected endpoints paced like a real UART with `config`
pub fn link_pair_with(config: &UartConfig) -> (SimLink, SimLink) {
    paced_pair(Duration::from_micros(u64::from(config.byte_time_us())))
}

fn paced_pair(byte_time: Duration) -> (SimLink, SimLink) {
    let (a_tx, b_rx) = mpsc::channel();
    let (b_tx, a_rx) = mpsc::channel();
    (
        SerialPort::new(ChannelIo::new(a_tx, a_rx, byte_time), StdClock::new()),
        SerialPort::new(ChannelIo::new(b_tx, b_rx, byte_time), StdClock::new()),
    )
}

/// Errors from a channel endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The far end is gone
    Disconnected,
}

impl embedded_io::Error for ChannelError {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

/// One end of the byte pipe
pub struct ChannelIo {
    tx: Sender<u8>,
    rx: Receiver<u8>,
    peeked: Option<u8>,
    closed: bool,
    byte_time: Duration,
}

impl ChannelIo {
    fn new(tx: Sender<u8>, rx: Receiver<u8>, byte_time: Duration) -> Self {
        Self {
            tx,
            rx,
            peeked: None,
            closed: false,
            byte_time,
        }
    }
}

impl embedded_io::ErrorType for ChannelIo {
    type Error = ChannelError;
}

impl embedded_io::Read for ChannelIo {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        let first = match self.peeked.take() {
            Some(byte) => byte,
            None => match self.rx.recv() {
                Ok(byte) => byte,
                // End of stream
                Err(_) => return Ok(0),
            },
        };
        buf[0] = first;

        let mut filled = 1;
        while filled < buf.len() {
            match self.rx.try_recv() {
                Ok(byte) => {
                    buf[filled] = byte;
                    filled += 1;
                }
                Err(_) => break,
            }
        }
        Ok(filled)
    }
}

impl embedded_io::ReadReady for ChannelIo {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        if self.peeked.is_some() || self.closed {
            return Ok(true);
        }
        match self.rx.try_recv() {
            Ok(byte) => {
                self.peeked = Some(byte);
                Ok(true)
            }
            Err(TryRecvError::Empty) => Ok(false),
            // Let the next read report end of stream
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                Ok(true)
            }
        }
    }
}

impl embedded_io::Write for ChannelIo {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            if !self.byte_time.is_zero() {
                thread::sleep(self.byte_time);
            }
            self.tx.send(byte).map_err(|_| ChannelError::Disconnected)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Wall clock for receive deadlines
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
