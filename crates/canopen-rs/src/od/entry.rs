use super::value::{DataType, ObjectValue};
use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

/// Defines the access rights for an Object Dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    /// read only access
    ReadOnly,
    /// write only access
    WriteOnly,
    /// write only access, value shall be stored
    WriteOnlyStore,
    /// read and write access
    ReadWrite,
    /// read and write access, value shall be stored
    ReadWriteStore,
    /// read only access, value is constant
    Constant,
}

impl AccessType {
    pub fn is_readable(self) -> bool {
        !matches!(self, AccessType::WriteOnly | AccessType::WriteOnlyStore)
    }

    pub fn is_writable(self) -> bool {
        !matches!(self, AccessType::ReadOnly | AccessType::Constant)
    }

    /// True if the value takes part in "store parameters" (1010h).
    pub fn is_storable(self) -> bool {
        matches!(self, AccessType::ReadWriteStore | AccessType::WriteOnlyStore)
    }
}

/// Defines the PDO mapping options for an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdoMapping {
    #[default]
    No,
    Optional,
    Default,
}

/// The PDO parameter an entry validates on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdoHook {
    /// COB-ID register (communication parameter, sub-index 1).
    CobId,
    /// Transmission type (communication parameter, sub-index 2).
    TransmissionType,
    /// Inhibit time (communication parameter, sub-index 3).
    InhibitTime,
    /// Event timer (communication parameter, sub-index 5).
    EventTimer,
    /// Number of mapped objects (mapping parameter, sub-index 0).
    MapCount,
    /// A mapping entry (mapping parameter, sub-index 1..=8).
    MapEntry,
}

/// Handle to a value owned by the application.
///
/// The application keeps a clone and reads or updates the cell directly;
/// the dictionary accesses it through the same handle.
#[derive(Debug, Clone, Default)]
pub struct ExternalValue(Arc<AtomicU32>);

impl ExternalValue {
    pub fn new(raw: u32) -> Self {
        Self(Arc::new(AtomicU32::new(raw)))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, raw: u32) {
        self.0.store(raw, Ordering::Release)
    }
}

impl PartialEq for ExternalValue {
    /// Two handles are equal when they refer to the same cell.
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Where an entry keeps its value.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    /// The value is owned by the dictionary.
    Inline(ObjectValue),
    /// The value lives in an application-owned cell.
    External(ExternalValue),
    /// The value is owned by the dictionary, and every network write is
    /// validated by the given PDO rule before it is committed.
    Hooked { hook: PdoHook, value: ObjectValue },
}

impl Storage {
    pub fn hook(&self) -> Option<PdoHook> {
        match self {
            Storage::Hooked { hook, .. } => Some(*hook),
            _ => None,
        }
    }
}

/// A complete entry in the Object Dictionary, containing both the data and its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    /// A descriptive name for the object.
    pub name: &'static str,
    /// The declared data type. Reads and writes must match it.
    pub data_type: DataType,
    /// The access rights for this object.
    pub access: AccessType,
    /// The PDO mapping possibility for this object.
    pub pdo_mapping: PdoMapping,
    /// The backing storage of the value.
    pub storage: Storage,
    /// Value restored by an NMT reset. `None` leaves the value untouched.
    pub default_value: Option<ObjectValue>,
}

impl ObjectEntry {
    /// Creates a plain entry owning its value. The initial value doubles as
    /// the default restored on reset.
    pub fn variable(name: &'static str, access: AccessType, value: ObjectValue) -> Self {
        Self {
            name,
            data_type: value.data_type(),
            access,
            pdo_mapping: PdoMapping::No,
            storage: Storage::Inline(value),
            default_value: Some(value),
        }
    }

    /// Creates an entry backed by an application-owned cell.
    pub fn external(
        name: &'static str,
        data_type: DataType,
        access: AccessType,
        cell: ExternalValue,
    ) -> Self {
        Self {
            name,
            data_type,
            access,
            pdo_mapping: PdoMapping::No,
            storage: Storage::External(cell),
            default_value: None,
        }
    }

    /// Creates an entry whose writes are validated by a PDO rule.
    pub fn hooked(
        name: &'static str,
        access: AccessType,
        hook: PdoHook,
        value: ObjectValue,
    ) -> Self {
        Self {
            name,
            data_type: value.data_type(),
            access,
            pdo_mapping: PdoMapping::No,
            storage: Storage::Hooked { hook, value },
            default_value: Some(value),
        }
    }

    /// Marks the entry as mappable into PDOs.
    pub fn mappable(mut self) -> Self {
        self.pdo_mapping = PdoMapping::Optional;
        self
    }

    pub fn is_mappable(&self) -> bool {
        self.pdo_mapping != PdoMapping::No
    }

    /// Returns the current value regardless of access rights.
    pub fn value(&self) -> ObjectValue {
        match &self.storage {
            Storage::Inline(value) | Storage::Hooked { value, .. } => *value,
            Storage::External(cell) => ObjectValue::from_raw(self.data_type, cell.get()),
        }
    }

    /// Replaces the current value regardless of access rights or hooks.
    pub(super) fn set_value(&mut self, new_value: ObjectValue) {
        match &mut self.storage {
            Storage::Inline(value) | Storage::Hooked { value, .. } => *value = new_value,
            Storage::External(cell) => cell.set(new_value.to_raw()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_directions() {
        assert!(AccessType::ReadWrite.is_readable());
        assert!(AccessType::ReadWrite.is_writable());
        assert!(AccessType::Constant.is_readable());
        assert!(!AccessType::Constant.is_writable());
        assert!(!AccessType::WriteOnlyStore.is_readable());
        assert!(AccessType::WriteOnlyStore.is_storable());
        assert!(!AccessType::ReadWrite.is_storable());
    }

    #[test]
    fn test_external_value_is_shared_with_application() {
        let cell = ExternalValue::new(7);
        let mut entry = ObjectEntry::external(
            "AppVar",
            DataType::Unsigned16,
            AccessType::ReadWrite,
            cell.clone(),
        );
        assert_eq!(entry.value(), ObjectValue::Unsigned16(7));

        entry.set_value(ObjectValue::Unsigned16(0x1234));
        assert_eq!(cell.get(), 0x1234);

        cell.set(42);
        assert_eq!(entry.value(), ObjectValue::Unsigned16(42));
    }
}
