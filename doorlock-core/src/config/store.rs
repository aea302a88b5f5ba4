//! Configuration store
//!
//! Reads and writes the persisted record through a [`WordStorage`]. A save
//! first invalidates the tag, then writes the field words, then writes the
//! tag last. Power loss part-way through therefore leaves an invalid record
//! (read back as absent) and never a mix of old and new fields.

use doorlock_hal::WordStorage;

use super::record::{PersistedRecord, OFFSET_TAG, RECORD_INVALID, RECORD_MAGIC, RECORD_WORDS};
use super::Configuration;

/// Errors from configuration persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError<E> {
    /// Underlying storage failed
    Storage(E),
    /// Storage block too small for the record at the configured base
    OutOfSpace,
}

/// Configuration persistence over word storage
pub struct ConfigStore<S> {
    storage: S,
    base: u32,
}

impl<S: WordStorage> ConfigStore<S> {
    /// Store the record at the start of `storage`
    pub fn new(storage: S) -> Self {
        Self::with_base(storage, 0)
    }

    /// Store the record starting at word `base`
    pub fn with_base(storage: S, base: u32) -> Self {
        Self { storage, base }
    }

    /// Borrow the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutably borrow the underlying storage
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Give back the underlying storage
    pub fn release(self) -> S {
        self.storage
    }

    /// Read the persisted configuration
    ///
    /// `Ok(None)` means no valid record: erased, invalidated, torn by a
    /// power loss, or holding a non-digit credential.
    pub fn load(&mut self) -> Result<Option<Configuration>, StoreError<S::Error>> {
        self.check_capacity()?;

        let tag = self.read(OFFSET_TAG)?;
        if tag != RECORD_MAGIC {
            return Ok(None);
        }

        let mut record = PersistedRecord {
            words: [0; RECORD_WORDS],
        };
        record.words[OFFSET_TAG] = tag;
        for index in OFFSET_TAG + 1..RECORD_WORDS {
            record.words[index] = self.read(index)?;
        }

        let config = record.decode();
        if config.is_none() {
            warn!("stored record carries an invalid credential");
        }
        Ok(config)
    }

    /// Persist `config`
    ///
    /// Returns the configuration as written, with its timeout clamped.
    pub fn save(&mut self, config: &Configuration) -> Result<Configuration, StoreError<S::Error>> {
        self.check_capacity()?;

        let record = PersistedRecord::encode(config);
        self.write(OFFSET_TAG, RECORD_INVALID)?;
        for (index, word) in record.words.iter().enumerate().skip(OFFSET_TAG + 1) {
            self.write(index, *word)?;
        }
        self.write(OFFSET_TAG, RECORD_MAGIC)?;

        debug!("configuration saved");
        Ok(config.normalized())
    }

    /// Invalidate the stored record
    ///
    /// Only the tag is rewritten; the remaining words are left as they were.
    pub fn clear(&mut self) -> Result<(), StoreError<S::Error>> {
        self.check_capacity()?;
        self.write(OFFSET_TAG, RECORD_INVALID)?;
        debug!("configuration cleared");
        Ok(())
    }

    fn check_capacity(&self) -> Result<(), StoreError<S::Error>> {
        let end = self.base.checked_add(RECORD_WORDS as u32);
        match end {
            Some(end) if end <= self.storage.capacity_words() => Ok(()),
            _ => Err(StoreError::OutOfSpace),
        }
    }

    fn read(&mut self, index: usize) -> Result<u32, StoreError<S::Error>> {
        self.storage
            .read_word(self.base + index as u32)
            .map_err(StoreError::Storage)
    }

    fn write(&mut self, index: usize, value: u32) -> Result<(), StoreError<S::Error>> {
        self.storage
            .write_word(self.base + index as u32, value)
            .map_err(StoreError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::record::{OFFSET_CREDENTIAL_HIGH, OFFSET_TIMEOUT};
    use crate::testing::FlakyEeprom;
    use doorlock_hal::{EepromError, RamEeprom, ERASED_WORD};
    use doorlock_protocol::Credential;
    use proptest::prelude::*;

    fn provisioned(digits: [u8; 5], timeout: u8) -> Configuration {
        Configuration::default()
            .with_credential(Credential::new(digits).unwrap())
            .with_timeout(timeout)
    }

    #[test]
    fn test_erased_storage_has_no_record() {
        let mut store = ConfigStore::new(RamEeprom::<8>::new());
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn test_save_then_load() {
        let mut store = ConfigStore::new(RamEeprom::<8>::new());
        let config = provisioned(*b"31415", 25);
        assert_eq!(store.save(&config), Ok(config));
        assert_eq!(store.load(), Ok(Some(config)));
    }

    #[test]
    fn test_save_at_base_offset() {
        let mut store = ConfigStore::with_base(RamEeprom::<16>::new(), 10);
        let config = provisioned(*b"27182", 8);
        store.save(&config).unwrap();
        assert_eq!(store.storage().words()[10], RECORD_MAGIC);
        assert_eq!(store.storage().words()[0], ERASED_WORD);
        assert_eq!(store.load(), Ok(Some(config)));
    }

    #[test]
    fn test_record_must_fit() {
        let mut store = ConfigStore::with_base(RamEeprom::<8>::new(), 4);
        assert_eq!(store.load(), Err(StoreError::OutOfSpace));
        assert_eq!(
            store.save(&Configuration::default()),
            Err(StoreError::OutOfSpace)
        );
    }

    #[test]
    fn test_clear_only_touches_tag() {
        let mut store = ConfigStore::new(RamEeprom::<8>::new());
        store.save(&provisioned(*b"11111", 10)).unwrap();
        store.clear().unwrap();

        assert_eq!(store.load(), Ok(None));
        let words = store.storage().words();
        assert_eq!(words[OFFSET_TAG], RECORD_INVALID);
        assert_eq!(words[OFFSET_TIMEOUT], 10);
        assert_eq!(words[OFFSET_CREDENTIAL_HIGH], u32::from(b'1'));
    }

    #[test]
    fn test_save_writes_tag_last() {
        let mut store = ConfigStore::new(FlakyEeprom::<8>::new());
        store.save(&provisioned(*b"11111", 10)).unwrap();

        let log = store.storage().write_log();
        assert_eq!(log.first(), Some(&(0, RECORD_INVALID)));
        assert_eq!(log.last(), Some(&(0, RECORD_MAGIC)));
        assert_eq!(log.len(), RECORD_WORDS + 1);
    }

    #[test]
    fn test_torn_save_reads_as_absent() {
        let mut eeprom = FlakyEeprom::<8>::new();
        {
            let mut store = ConfigStore::new(&mut eeprom);
            store.save(&provisioned(*b"11111", 10)).unwrap();
        }

        // Power lost after the tag was invalidated and two fields written
        eeprom.fail_after(3);
        let mut store = ConfigStore::new(&mut eeprom);
        assert_eq!(
            store.save(&provisioned(*b"99999", 20)),
            Err(StoreError::Storage(EepromError::WriteFailed))
        );
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn test_failed_clear_keeps_record() {
        let mut eeprom = FlakyEeprom::<8>::new();
        let config = provisioned(*b"11111", 10);
        ConfigStore::new(&mut eeprom).save(&config).unwrap();

        eeprom.fail_after(0);
        let mut store = ConfigStore::new(&mut eeprom);
        assert!(store.clear().is_err());
        assert_eq!(store.load(), Ok(Some(config)));
    }

    proptest! {
        #[test]
        fn prop_saved_configuration_loads_back(
            digits in proptest::array::uniform5(b'0'..=b'9'),
            timeout in any::<u8>(),
            initialized in any::<bool>(),
        ) {
            let config = Configuration {
                credential: Credential::new(digits).unwrap(),
                timeout_seconds: timeout,
                initialized,
            };
            let mut store = ConfigStore::new(RamEeprom::<8>::new());
            store.save(&config).unwrap();

            let loaded = store.load().unwrap().unwrap();
            prop_assert_eq!(loaded, config.normalized());
            prop_assert!((5..=30).contains(&loaded.timeout_seconds));
        }

        #[test]
        fn prop_clear_leaves_no_record(
            prior in proptest::array::uniform8(any::<u32>()),
            saved in proptest::option::of((
                proptest::array::uniform5(b'0'..=b'9'),
                any::<u8>(),
            )),
            base in 0u32..=3,
        ) {
            let mut store = ConfigStore::with_base(RamEeprom::from_words(prior), base);
            if let Some((digits, timeout)) = saved {
                store.save(&provisioned(digits, timeout)).unwrap();
            }
            store.clear().unwrap();

            prop_assert_eq!(store.load(), Ok(None));
            let words = store.storage().words();
            prop_assert_eq!(words[base as usize + OFFSET_TAG], RECORD_INVALID);
            for (offset, word) in words.iter().enumerate() {
                let inside = (base as usize..base as usize + RECORD_WORDS).contains(&offset);
                if !inside {
                    prop_assert_eq!(*word, prior[offset]);
                }
            }
        }
    }
}
