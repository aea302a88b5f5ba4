//! UART serial communication abstractions
//!
//! The link between the two nodes is a plain byte pipe: no framing, no
//! checksums. Both ends must agree on exact byte counts, so the receive side
//! offers a timeout-bounded read that reports "nothing arrived" as a value
//! rather than blocking forever.

use embedded_io::{Read, ReadReady, Write};

use crate::clock::{Clock, Deadline};

/// Error type shared by the transmit and receive halves of a link
pub trait ErrorType {
    /// Error type for link operations
    type Error: core::fmt::Debug;
}

impl<T: ErrorType + ?Sized> ErrorType for &mut T {
    type Error = T::Error;
}

/// UART transmitter
pub trait UartTx: ErrorType {
    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write a single byte to the UART
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write_blocking(&[byte])
    }
}

/// UART receiver
pub trait UartRx: ErrorType {
    /// Read data from the UART
    ///
    /// Blocks until the buffer is filled or an error occurs.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Wait at most `timeout_ms` for a single byte
    ///
    /// Returns `Ok(None)` when the bound elapsed without a byte arriving.
    /// A timeout of zero only checks for an already received byte.
    fn read_byte_timeout(&mut self, timeout_ms: u32) -> Result<Option<u8>, Self::Error>;

    /// Read a single byte from the UART
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_blocking(&mut buf)?;
        Ok(buf[0])
    }

    /// Drop every byte that has already been received but not yet read
    fn discard_pending(&mut self) -> Result<usize, Self::Error> {
        let mut dropped = 0;
        while self.read_byte_timeout(0)?.is_some() {
            dropped += 1;
        }
        Ok(dropped)
    }
}

impl<T: UartTx + ?Sized> UartTx for &mut T {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write_blocking(self, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}

impl<T: UartRx + ?Sized> UartRx for &mut T {
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_blocking(self, buf)
    }

    fn read_byte_timeout(&mut self, timeout_ms: u32) -> Result<Option<u8>, Self::Error> {
        T::read_byte_timeout(self, timeout_ms)
    }
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    /// 9600 baud, 8N1: the link settings both nodes ship with
    fn default() -> Self {
        Self {
            baudrate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// Bits on the wire per byte, start and stop bits included
    pub fn frame_bits(&self) -> u32 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
            DataBits::Nine => 9,
        };
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        1 + data + parity + stop
    }

    /// Time to send one byte, in microseconds
    pub fn byte_time_us(&self) -> u32 {
        if self.baudrate == 0 {
            return 0;
        }
        self.frame_bits() * 1_000_000 / self.baudrate
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// Errors from a [`SerialPort`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError<E> {
    /// Underlying peripheral error
    Io(E),
    /// The peripheral reported end of stream
    Closed,
}

/// Byte link over any blocking `embedded-io` peripheral
///
/// Timeout-bounded reads poll `read_ready()` against the supplied clock
/// instead of blocking inside `read()`.
pub struct SerialPort<T, C> {
    io: T,
    clock: C,
}

impl<T, C> SerialPort<T, C> {
    /// Wrap a peripheral and the clock used for receive deadlines
    pub fn new(io: T, clock: C) -> Self {
        Self { io, clock }
    }

    /// Release the wrapped peripheral and clock
    pub fn release(self) -> (T, C) {
        (self.io, self.clock)
    }
}

impl<T: embedded_io::ErrorType, C> ErrorType for SerialPort<T, C> {
    type Error = SerialError<T::Error>;
}

impl<T: Write, C> UartTx for SerialPort<T, C> {
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.io.write_all(data).map_err(SerialError::Io)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.io.flush().map_err(SerialError::Io)
    }
}

impl<T: Read + ReadReady, C: Clock> UartRx for SerialPort<T, C> {
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.io.read(&mut buf[filled..]).map_err(SerialError::Io)? {
                0 => return Err(SerialError::Closed),
                n => filled += n,
            }
        }
        Ok(filled)
    }

    fn read_byte_timeout(&mut self, timeout_ms: u32) -> Result<Option<u8>, Self::Error> {
        let deadline = Deadline::after(&self.clock, timeout_ms);
        loop {
            if self.io.read_ready().map_err(SerialError::Io)? {
                let mut buf = [0u8; 1];
                return match self.io.read(&mut buf).map_err(SerialError::Io)? {
                    0 => Err(SerialError::Closed),
                    _ => Ok(Some(buf[0])),
                };
            }
            if deadline.expired(&self.clock) {
                return Ok(None);
            }
            core::hint::spin_loop();
        }
    }
}
