//! Persistent configuration store
//!
//! Encodes the registry into the record format of
//! [`webconf_core::parameters::record`] and keeps it in a fixed region of an
//! [`EepromInterface`].

use super::options::StoreOptions;
use crate::platform::{EepromInterface, PlatformError};
use crate::{log_debug, log_info, log_warn};
use webconf_core::parameters::record::{self, LENGTH_PREFIX_SIZE, MIN_BODY_SIZE};
use webconf_core::parameters::{ParameterRegistry, StorageError};

/// Largest record region supported (size of the encode/decode scratch buffer)
pub const MAX_RECORD_SIZE: usize = 4096;

/// Chunk size used when zero-filling the region
const ERASE_CHUNK: usize = 64;

/// Store statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Successful saves
    pub saves: u32,
    /// Successful loads
    pub loads: u32,
    /// Successful erases
    pub erases: u32,
    /// Failed operations of any kind
    pub failures: u32,
    /// Size of the last record written or read (length prefix included)
    pub last_record_len: usize,
}

/// Outcome of a successful load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Stored values applied to the registry
    pub applied: usize,
    /// Stored values ignored (unknown key or no longer valid)
    pub skipped: usize,
    /// Registered parameters whose value did not come from the record
    pub missing: usize,
}

impl LoadReport {
    /// Every registered parameter now matches the stored record
    pub fn is_complete(&self) -> bool {
        self.missing == 0
    }
}

/// Configuration record in a region of an EEPROM
pub struct PersistentStore<E: EepromInterface> {
    eeprom: E,
    offset: usize,
    capacity: usize,
    stats: StorageStats,
}

impl<E: EepromInterface> PersistentStore<E> {
    /// Create a store over `eeprom`.
    ///
    /// The region is clamped to the medium and to [`MAX_RECORD_SIZE`].
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the remaining region cannot hold an empty record.
    pub fn new(eeprom: E, options: StoreOptions) -> Result<Self, PlatformError> {
        let available = eeprom.capacity().saturating_sub(options.offset);
        let capacity = options.capacity.min(available).min(MAX_RECORD_SIZE);
        if capacity < LENGTH_PREFIX_SIZE + MIN_BODY_SIZE {
            return Err(PlatformError::InvalidConfig);
        }

        Ok(Self {
            eeprom,
            offset: options.offset,
            capacity,
            stats: StorageStats::default(),
        })
    }

    /// Write the whole registry and commit.
    ///
    /// Returns the record size. The registry's dirty flag is left to the caller.
    pub fn save<const N: usize>(
        &mut self,
        registry: &ParameterRegistry<N>,
    ) -> Result<usize, StorageError> {
        let result = self.write_record(registry);
        match result {
            Ok(len) => {
                self.stats.saves += 1;
                self.stats.last_record_len = len;
                log_debug!("Configuration saved ({} bytes)", len);
            }
            Err(e) => {
                self.stats.failures += 1;
                log_warn!("Configuration save failed: {}", e);
            }
        }
        result
    }

    fn write_record<const N: usize>(
        &mut self,
        registry: &ParameterRegistry<N>,
    ) -> Result<usize, StorageError> {
        let mut scratch = [0u8; MAX_RECORD_SIZE];
        let len = record::encode(registry, &mut scratch[..self.capacity])?;
        self.eeprom.write(self.offset, &scratch[..len])?;
        self.eeprom.commit()?;
        Ok(len)
    }

    /// Restore stored values into `registry`.
    ///
    /// The registry is untouched unless the whole record is valid. Unknown
    /// keys are ignored and parameters missing from the record keep their
    /// current value.
    pub fn load<const N: usize>(
        &mut self,
        registry: &mut ParameterRegistry<N>,
    ) -> Result<LoadReport, StorageError> {
        let result = self.read_record(registry);
        match result {
            Ok(report) => {
                self.stats.loads += 1;
                log_info!(
                    "Configuration loaded ({} applied, {} skipped)",
                    report.applied,
                    report.skipped
                );
            }
            Err(e) => {
                self.stats.failures += 1;
                log_warn!("Configuration load failed: {}", e);
            }
        }
        result
    }

    fn read_record<const N: usize>(
        &mut self,
        registry: &mut ParameterRegistry<N>,
    ) -> Result<LoadReport, StorageError> {
        let mut scratch = [0u8; MAX_RECORD_SIZE];
        let image = &mut scratch[..self.capacity];
        self.eeprom.read(self.offset, image)?;

        let view = record::decode(image)?;
        let mut report = LoadReport::default();
        for (key, value) in view.entries() {
            if registry.apply_persisted(key, value) {
                report.applied += 1;
            } else {
                log_debug!("Ignoring stored value for {}", key);
                report.skipped += 1;
            }
        }
        report.missing = registry
            .iter()
            .filter(|param| {
                !view
                    .entries()
                    .any(|(key, value)| key == param.key() && value == param.value())
            })
            .count();

        self.stats.last_record_len =
            LENGTH_PREFIX_SIZE + u16::from_le_bytes([image[0], image[1]]) as usize;
        Ok(report)
    }

    /// Zero-fill the whole region and commit
    pub fn erase(&mut self) -> Result<(), StorageError> {
        let result = self.zero_fill();
        match result {
            Ok(()) => {
                self.stats.erases += 1;
                log_info!("Configuration storage erased");
            }
            Err(e) => {
                self.stats.failures += 1;
                log_warn!("Configuration erase failed: {}", e);
            }
        }
        result
    }

    fn zero_fill(&mut self) -> Result<(), StorageError> {
        let zeros = [0u8; ERASE_CHUNK];
        let mut pos = 0;
        while pos < self.capacity {
            let len = ERASE_CHUNK.min(self.capacity - pos);
            self.eeprom.write(self.offset + pos, &zeros[..len])?;
            pos += len;
        }
        self.eeprom.commit()?;
        Ok(())
    }

    /// Size of the record region
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn stats(&self) -> StorageStats {
        self.stats
    }

    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    pub fn into_inner(self) -> E {
        self.eeprom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{EepromFaults, MockEeprom};
    use webconf_core::parameters::ParameterDescriptor;

    fn registry() -> ParameterRegistry<8> {
        let mut reg = ParameterRegistry::new();
        reg.register(ParameterDescriptor::text("device_name", "Device Name", "ESP32-Device"))
            .unwrap();
        reg.register(ParameterDescriptor::integer("brightness", "Brightness", 50, 0, 100, 1))
            .unwrap();
        reg.register(ParameterDescriptor::boolean("enabled", "Enabled", true))
            .unwrap();
        reg
    }

    fn store(capacity: usize) -> PersistentStore<MockEeprom> {
        PersistentStore::new(
            MockEeprom::new(4096),
            StoreOptions {
                offset: 0,
                capacity,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_clamps_capacity() {
        let store = PersistentStore::new(
            MockEeprom::new(512),
            StoreOptions {
                offset: 256,
                capacity: 4096,
            },
        )
        .unwrap();
        assert_eq!(store.capacity(), 256);

        let result = PersistentStore::new(
            MockEeprom::new(16),
            StoreOptions {
                offset: 8,
                capacity: 4096,
            },
        );
        assert!(matches!(result, Err(PlatformError::InvalidConfig)));
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = store(512);
        let mut reg = registry();
        reg.validate_and_set("device_name", "kitchen").unwrap();
        reg.validate_and_set("brightness", "75").unwrap();
        reg.validate_and_set("enabled", "false").unwrap();
        store.save(&reg).unwrap();
        assert_eq!(store.eeprom().commit_count(), 1);

        let mut fresh = registry();
        let report = store.load(&mut fresh).unwrap();

        assert_eq!(report, LoadReport { applied: 3, skipped: 0, missing: 0 });
        assert_eq!(fresh.get("device_name"), Some("kitchen"));
        assert_eq!(fresh.get("brightness"), Some("75"));
        assert_eq!(fresh.as_bool("enabled"), Some(false));
        assert!(!fresh.is_dirty());
        assert_eq!(store.stats().saves, 1);
        assert_eq!(store.stats().loads, 1);
    }

    #[test]
    fn test_load_ignores_unknown_and_keeps_missing() {
        let mut store = store(512);
        let mut wide: ParameterRegistry<8> = ParameterRegistry::new();
        wide.register(ParameterDescriptor::text("legacy", "Legacy", "x"))
            .unwrap();
        wide.register(ParameterDescriptor::integer("brightness", "B", 20, 0, 100, 1))
            .unwrap();
        store.save(&wide).unwrap();

        let mut reg = registry();
        let report = store.load(&mut reg).unwrap();

        assert_eq!(report, LoadReport { applied: 1, skipped: 1, missing: 2 });
        assert_eq!(reg.get("brightness"), Some("20"));
        assert_eq!(reg.get("device_name"), Some("ESP32-Device"));
    }

    #[test]
    fn test_load_skips_values_outside_current_constraints() {
        let mut store = store(512);
        let mut old: ParameterRegistry<8> = ParameterRegistry::new();
        old.register(ParameterDescriptor::integer("brightness", "B", 200, 0, 255, 1))
            .unwrap();
        store.save(&old).unwrap();

        let mut reg = registry();
        let report = store.load(&mut reg).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(reg.get("brightness"), Some("50"));
    }

    #[test]
    fn test_payload_too_large() {
        let mut store = store(24);
        let reg = registry();
        assert_eq!(store.save(&reg), Err(StorageError::PayloadTooLarge));
        assert_eq!(store.eeprom().commit_count(), 0);
        assert_eq!(store.stats().failures, 1);
    }

    #[test]
    fn test_commit_failure_is_reported() {
        let mut store = store(512);
        store.eeprom_mut().inject_faults(EepromFaults::COMMIT);
        assert_eq!(store.save(&registry()), Err(StorageError::CommitError));
    }

    #[test]
    fn test_read_failure_is_reported() {
        let mut store = store(512);
        store.save(&registry()).unwrap();
        store.eeprom_mut().inject_faults(EepromFaults::READ);

        let mut reg = registry();
        assert_eq!(store.load(&mut reg), Err(StorageError::ReadError));
    }

    #[test]
    fn test_blank_medium_has_no_record() {
        let mut store = store(512);
        let mut reg = registry();
        assert_eq!(store.load(&mut reg), Err(StorageError::NoValidRecord));
        assert_eq!(reg.get("brightness"), Some("50"));
    }

    #[test]
    fn test_corruption_leaves_registry_untouched() {
        let mut store = store(512);
        let mut saved = registry();
        saved.validate_and_set("brightness", "80").unwrap();
        store.save(&saved).unwrap();

        // Corrupt a byte inside the first key
        store.eeprom_mut().inject_corruption(20, 1);

        let mut reg = registry();
        assert_eq!(store.load(&mut reg), Err(StorageError::DecodeError));
        assert_eq!(reg.get("brightness"), Some("50"));
    }

    #[test]
    fn test_bad_magic_and_version() {
        let mut store = store(512);
        store.save(&registry()).unwrap();

        store.eeprom_mut().poke(2, b"XXXX");
        let mut reg = registry();
        assert_eq!(store.load(&mut reg), Err(StorageError::NoValidRecord));

        store.save(&registry()).unwrap();
        store.eeprom_mut().poke(6, &[9]);
        assert_eq!(store.load(&mut reg), Err(StorageError::NoValidRecord));
    }

    #[test]
    fn test_erase_zero_fills_region() {
        let mut store = store(200);
        store.save(&registry()).unwrap();

        store.erase().unwrap();

        assert!(store.eeprom().committed()[..200].iter().all(|&b| b == 0));
        assert_eq!(store.eeprom().committed()[200], 0xFF);
        let mut reg = registry();
        assert_eq!(store.load(&mut reg), Err(StorageError::NoValidRecord));
        assert_eq!(store.stats().erases, 1);
    }

    #[test]
    fn test_offset_region() {
        let mut store = PersistentStore::new(
            MockEeprom::new(1024),
            StoreOptions {
                offset: 512,
                capacity: 256,
            },
        )
        .unwrap();
        store.save(&registry()).unwrap();
        assert_eq!(&store.eeprom().committed()[514..518], b"WCFG");
        assert_eq!(store.eeprom().committed()[0], 0xFF);
    }
}
