// crates/canopen-rs/src/od/storage.rs
use crate::OdError;
use crate::od::ObjectValue;
use alloc::collections::BTreeMap;

/// A trait for abstracting the non-volatile storage of OD parameters.
/// This abstraction backs the "Store Parameters" (1010h) and
/// "Restore Default Parameters" (1011h) objects, which must persist
/// across device reboots.
///
/// Backends must be `Send` so a node can be moved to the thread serving it.
pub trait ObjectDictionaryStorage: Send {
    /// Loads storable parameters from non-volatile memory.
    /// Returns a map of (Index, SubIndex) -> Value.
    fn load(&mut self) -> Result<BTreeMap<(u16, u8), ObjectValue>, OdError>;

    /// Saves the given storable parameters to non-volatile memory.
    fn save(&mut self, parameters: &BTreeMap<(u16, u8), ObjectValue>) -> Result<(), OdError>;

    /// Clears all stored parameters from non-volatile memory.
    fn clear(&mut self) -> Result<(), OdError>;

    /// Checks if a "Restore Defaults" operation is pending a reboot.
    fn restore_defaults_requested(&self) -> bool;

    /// Sets a persistent flag to restore defaults on the next boot.
    fn request_restore_defaults(&mut self) -> Result<(), OdError>;

    /// Clears the persistent "Restore Defaults" flag after the restore
    /// has been carried out.
    fn clear_restore_defaults_flag(&mut self) -> Result<(), OdError>;
}
