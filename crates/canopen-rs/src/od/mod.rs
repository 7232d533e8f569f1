// crates/canopen-rs/src/od/mod.rs

mod commands;
pub mod constants;
mod entry;
mod pdo_validator;
mod predefined;
mod storage;
pub mod utils;
mod value;

pub use entry::{AccessType, ExternalValue, ObjectEntry, PdoHook, PdoMapping, Storage};
pub use storage::ObjectDictionaryStorage;
pub use value::{DataType, ObjectValue};

use crate::OdError;
use crate::pdo::{CobId, PdoConfig, PdoRole};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use constants::{IDX_RESTORE_PARAM_REC, IDX_STORE_PARAM_REC, SUBIDX_PDO_COMM_COB_ID_U32};
use core::fmt;
use core::ops::RangeInclusive;
use log::{debug, trace, warn};

/// The main Object Dictionary structure.
///
/// Entries are addressed by `(index, sub_index)`. The set of entries is
/// fixed once the owning node is created; afterwards only their values change,
/// and only through [`ObjectDictionary::write`] (validated) or
/// [`ObjectDictionary::write_internal`] (trusted, local).
pub struct ObjectDictionary<'a> {
    entries: BTreeMap<(u16, u8), ObjectEntry>,
    pdos: BTreeMap<(PdoRole, u16), PdoConfig>,
    storage: Option<&'a mut dyn ObjectDictionaryStorage>,
}

impl<'a> fmt::Debug for ObjectDictionary<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDictionary")
            .field("entries", &self.entries)
            .field("pdos", &self.pdos)
            .field(
                "storage",
                &if self.storage.is_some() {
                    "Some(<Storage Backend>)"
                } else {
                    "None"
                },
            )
            .finish()
    }
}

impl<'a> ObjectDictionary<'a> {
    /// Creates a new, empty OD.
    /// Call `init()` after populating with application and device defaults
    /// to load persistent parameters and finish setup.
    pub fn new(storage: Option<&'a mut dyn ObjectDictionaryStorage>) -> Self {
        Self {
            entries: BTreeMap::new(),
            pdos: BTreeMap::new(),
            storage,
        }
    }

    /// Initialises the Object Dictionary.
    /// This method must be called after the application has inserted all its
    /// default and device-specific objects. It performs the following actions:
    /// 1. Populates the store/restore command objects if they are missing.
    /// 2. Checks if a "Restore Defaults" command was flagged in storage.
    /// 3. If so, clears storage and keeps the firmware defaults.
    /// 4. If not, loads all stored parameters from the backend.
    pub fn init(&mut self) -> Result<(), OdError> {
        let mut restore_defaults = false;
        if let Some(s) = &mut self.storage {
            if s.restore_defaults_requested() {
                restore_defaults = true;
                s.clear_restore_defaults_flag()?;
                s.clear()?;
            }
        }

        predefined::populate_protocol_objects(self);

        if !restore_defaults {
            self.load()?;
        }
        Ok(())
    }

    /// Loads values from the persistent storage backend and overwrites any
    /// matching existing entries. Stored COB-IDs must still carry valid flag
    /// bits; the other PDO rules depend on write order and are not re-run.
    fn load(&mut self) -> Result<(), OdError> {
        if let Some(s) = &mut self.storage {
            let stored_params = s.load()?;
            for ((index, sub_index), value) in stored_params {
                // Objects that exist in storage but not in the current firmware are skipped.
                let result = pdo_validator::validate_stored_value(self, index, sub_index, value)
                    .and_then(|()| self.write_internal(index, sub_index, value));
                if let Err(e) = result {
                    debug!(
                        "Skipping stored parameter {:#06X}/{:#04X}: {}",
                        index, sub_index, e
                    );
                }
            }
        }
        Ok(())
    }

    /// Validates that the OD contains all mandatory objects required for a node to function.
    pub fn validate_mandatory_objects(&self) -> Result<(), OdError> {
        predefined::validate_mandatory_objects(self)
    }

    /// Inserts a new entry. Each `(index, sub_index)` pair may only be inserted once.
    pub fn insert(&mut self, index: u16, sub_index: u8, entry: ObjectEntry) -> Result<(), OdError> {
        if self.entries.contains_key(&(index, sub_index)) {
            warn!(
                "Duplicate object {:#06X}/{:#04X} ({})",
                index, sub_index, entry.name
            );
            return Err(OdError::DuplicateObject);
        }
        self.entries.insert((index, sub_index), entry);
        Ok(())
    }

    /// Registers the static configuration of a PDO channel.
    pub fn register_pdo(&mut self, config: PdoConfig) -> Result<(), OdError> {
        config.validate()?;
        let key = (config.role, config.number);
        if self.pdos.contains_key(&key) {
            return Err(OdError::InvalidPdoConfig);
        }
        self.pdos.insert(key, config);
        Ok(())
    }

    pub fn pdo_config(&self, role: PdoRole, number: u16) -> Option<&PdoConfig> {
        self.pdos.get(&(role, number))
    }

    pub fn pdo_configs(&self) -> impl Iterator<Item = &PdoConfig> {
        self.pdos.values()
    }

    /// Current COB-ID register of a registered PDO, read without access checks.
    pub fn pdo_cob_id(&self, config: &PdoConfig) -> Result<CobId, OdError> {
        self.entries
            .get(&(config.comm_index(), SUBIDX_PDO_COMM_COB_ID_U32))
            .map(|entry| CobId(entry.value().to_raw()))
            .ok_or(OdError::MissingComObject)
    }

    pub fn entry(&self, index: u16, sub_index: u8) -> Option<&ObjectEntry> {
        self.entries.get(&(index, sub_index))
    }

    pub fn contains(&self, index: u16, sub_index: u8) -> bool {
        self.entries.contains_key(&(index, sub_index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a value, checking that the entry exists and is readable.
    pub fn read(&self, index: u16, sub_index: u8) -> Result<ObjectValue, OdError> {
        let entry = self
            .entries
            .get(&(index, sub_index))
            .ok_or(OdError::NoObject)?;
        if !entry.access.is_readable() {
            return Err(OdError::Access);
        }
        Ok(entry.value())
    }

    // --- Start of Type-Safe Accessors ---
    pub fn read_u8(&self, index: u16, sub_index: u8) -> Result<u8, OdError> {
        match self.read(index, sub_index)? {
            ObjectValue::Unsigned8(val) => Ok(val),
            _ => Err(OdError::TypeMismatch),
        }
    }

    pub fn read_u16(&self, index: u16, sub_index: u8) -> Result<u16, OdError> {
        match self.read(index, sub_index)? {
            ObjectValue::Unsigned16(val) => Ok(val),
            _ => Err(OdError::TypeMismatch),
        }
    }

    pub fn read_u32(&self, index: u16, sub_index: u8) -> Result<u32, OdError> {
        match self.read(index, sub_index)? {
            ObjectValue::Unsigned32(val) => Ok(val),
            _ => Err(OdError::TypeMismatch),
        }
    }

    pub fn write_u8(&mut self, index: u16, sub_index: u8, value: u8) -> Result<(), OdError> {
        self.write(index, sub_index, ObjectValue::Unsigned8(value))
    }

    pub fn write_u16(&mut self, index: u16, sub_index: u8, value: u16) -> Result<(), OdError> {
        self.write(index, sub_index, ObjectValue::Unsigned16(value))
    }

    pub fn write_u32(&mut self, index: u16, sub_index: u8, value: u32) -> Result<(), OdError> {
        self.write(index, sub_index, ObjectValue::Unsigned32(value))
    }
    // --- End of Type-Safe Accessors ---

    /// Reads a value as little-endian bytes, as returned in an SDO upload.
    pub fn read_bytes(&self, index: u16, sub_index: u8) -> Result<Vec<u8>, OdError> {
        self.read(index, sub_index).map(|value| value.serialize())
    }

    /// Writes little-endian bytes received in an SDO download.
    pub fn write_bytes(&mut self, index: u16, sub_index: u8, data: &[u8]) -> Result<(), OdError> {
        let entry = self
            .entries
            .get(&(index, sub_index))
            .ok_or(OdError::NoObject)?;
        if !entry.access.is_writable() {
            return Err(OdError::Access);
        }
        let value = ObjectValue::deserialize(data, entry.data_type)?;
        self.write(index, sub_index, value)
    }

    /// Public write function that respects access rights, dispatches PDO
    /// parameter writes to their validators and handles the store/restore
    /// command objects.
    ///
    /// Nothing is committed unless every check passes.
    pub fn write(&mut self, index: u16, sub_index: u8, value: ObjectValue) -> Result<(), OdError> {
        let entry = self
            .entries
            .get(&(index, sub_index))
            .ok_or(OdError::NoObject)?;
        if !entry.access.is_writable() {
            return Err(OdError::Access);
        }
        if value.data_type() != entry.data_type {
            return Err(OdError::TypeMismatch);
        }
        let hook = entry.storage.hook();

        // Special case for Store Parameters command (1010h).
        if index == IDX_STORE_PARAM_REC && sub_index != 0 {
            return commands::store_parameters(self, sub_index, value.to_raw());
        }
        // Special case for Restore Default Parameters command (1011h).
        if index == IDX_RESTORE_PARAM_REC && sub_index != 0 {
            return commands::restore_defaults(self, sub_index, value.to_raw());
        }

        let committed = match hook {
            Some(hook) => {
                pdo_validator::validate_pdo_write(self, hook, index, sub_index, value)
                    .inspect_err(|e| {
                        warn!(
                            "Write to {:#06X}/{:#04X} rejected by {:?} rule: {}",
                            index, sub_index, hook, e
                        )
                    })?
            }
            None => value,
        };

        trace!(
            "Write {:#06X}/{:#04X} = {:?}",
            index, sub_index, committed
        );
        self.write_internal(index, sub_index, committed)
    }

    /// Internal write function that bypasses access rights and PDO validators.
    /// The value must still match the entry's data type.
    pub fn write_internal(
        &mut self,
        index: u16,
        sub_index: u8,
        value: ObjectValue,
    ) -> Result<(), OdError> {
        let entry = self
            .entries
            .get_mut(&(index, sub_index))
            .ok_or(OdError::NoObject)?;
        if value.data_type() != entry.data_type {
            return Err(OdError::TypeMismatch);
        }
        entry.set_value(value);
        Ok(())
    }

    /// Puts every entry in the given index range back to its default value.
    pub fn restore_defaults_in(&mut self, range: RangeInclusive<u16>) {
        for (_, entry) in self.entries.range_mut((*range.start(), 0)..=(*range.end(), u8::MAX)) {
            if let Some(default) = entry.default_value {
                entry.set_value(default);
            }
        }
    }
}
