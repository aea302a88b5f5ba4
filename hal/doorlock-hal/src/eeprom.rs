//! Word-addressed persistent storage
//!
//! The Control node keeps its configuration in a small EEPROM block
//! addressed in 32-bit words. Each access runs to completion before the
//! call returns; there is no batching or caching at this layer.

/// Value of a word that has never been written
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// Errors from word storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Offset lies outside the storage block
    OutOfRange,
    /// Controller did not finish the operation
    Busy,
    /// Write could not be committed
    WriteFailed,
}

/// Word-addressed non-volatile storage
pub trait WordStorage {
    /// Error type for storage operations
    type Error: core::fmt::Debug;

    /// Read the word at `offset`
    fn read_word(&mut self, offset: u32) -> Result<u32, Self::Error>;

    /// Write `value` to the word at `offset`
    ///
    /// Returns once the word is committed.
    fn write_word(&mut self, offset: u32, value: u32) -> Result<(), Self::Error>;

    /// Number of addressable words
    fn capacity_words(&self) -> u32;
}

impl<T: WordStorage + ?Sized> WordStorage for &mut T {
    type Error = T::Error;

    fn read_word(&mut self, offset: u32) -> Result<u32, Self::Error> {
        T::read_word(self, offset)
    }

    fn write_word(&mut self, offset: u32, value: u32) -> Result<(), Self::Error> {
        T::write_word(self, offset, value)
    }

    fn capacity_words(&self) -> u32 {
        T::capacity_words(self)
    }
}

/// RAM-backed storage block
///
/// Starts fully erased. Used by the host simulator and by tests.
#[derive(Debug, Clone)]
pub struct RamEeprom<const N: usize> {
    words: [u32; N],
}

impl<const N: usize> Default for RamEeprom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RamEeprom<N> {
    /// Create an erased block
    pub const fn new() -> Self {
        Self {
            words: [ERASED_WORD; N],
        }
    }

    /// Create a block with preset contents
    pub const fn from_words(words: [u32; N]) -> Self {
        Self { words }
    }

    /// Raw contents, for inspection
    pub fn words(&self) -> &[u32; N] {
        &self.words
    }
}

impl<const N: usize> WordStorage for RamEeprom<N> {
    type Error = EepromError;

    fn read_word(&mut self, offset: u32) -> Result<u32, Self::Error> {
        self.words
            .get(offset as usize)
            .copied()
            .ok_or(EepromError::OutOfRange)
    }

    fn write_word(&mut self, offset: u32, value: u32) -> Result<(), Self::Error> {
        let slot = self
            .words
            .get_mut(offset as usize)
            .ok_or(EepromError::OutOfRange)?;
        *slot = value;
        Ok(())
    }

    fn capacity_words(&self) -> u32 {
        N as u32
    }
}
