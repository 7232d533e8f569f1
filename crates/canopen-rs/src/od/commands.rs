// crates/canopen-rs/src/od/commands.rs
use super::ObjectDictionary;
use super::constants::{
    IDX_DEVICE_PROFILE_AREA_END, IDX_DEVICE_PROFILE_AREA_START, SIGNATURE_LOAD, SIGNATURE_SAVE,
    SUBIDX_PARAM_ALL, SUBIDX_PARAM_APPLICATION, SUBIDX_PARAM_COMMUNICATION,
};
use crate::OdError;
use alloc::collections::BTreeMap;
use log::{error, info, trace};

/// Collects all storable parameters of the selected group and tells the
/// storage backend to save them. `signature` must spell "save".
pub fn store_parameters(
    od: &mut ObjectDictionary,
    list_to_save: u8,
    signature: u32,
) -> Result<(), OdError> {
    if signature != SIGNATURE_SAVE {
        error!(
            "Store parameters rejected: signature {:#010X} is not \"save\"",
            signature
        );
        return Err(OdError::StorageError("Invalid signature for Store Parameters"));
    }
    if let Some(s) = &mut od.storage {
        trace!("Storing parameters for sub-index {}", list_to_save);
        let mut storable_params = BTreeMap::new();
        for (&(index, sub_index), entry) in &od.entries {
            // Determine if this object's group (Comm, App, etc.) should be saved based on list_to_save.
            let should_save = match list_to_save {
                SUBIDX_PARAM_ALL => true,
                SUBIDX_PARAM_COMMUNICATION => (0x1000..=0x1FFF).contains(&index),
                SUBIDX_PARAM_APPLICATION => (IDX_DEVICE_PROFILE_AREA_START
                    ..=IDX_DEVICE_PROFILE_AREA_END)
                    .contains(&index),
                _ => false,
            };
            if should_save && entry.access.is_storable() {
                storable_params.insert((index, sub_index), entry.value());
            }
        }
        if storable_params.is_empty() {
            trace!(
                "No storable parameters found for sub-index {}",
                list_to_save
            );
        } else {
            info!("Saving {} parameters.", storable_params.len());
        }
        s.save(&storable_params)
    } else {
        error!("Store parameters failed: No storage backend configured.");
        Err(OdError::StorageError("No storage backend configured"))
    }
}

/// Tells the storage backend to set a flag to restore defaults on the next
/// boot. `signature` must spell "load".
pub fn restore_defaults(
    od: &mut ObjectDictionary,
    list_to_restore: u8,
    signature: u32,
) -> Result<(), OdError> {
    if signature != SIGNATURE_LOAD {
        error!(
            "Restore defaults rejected: signature {:#010X} is not \"load\"",
            signature
        );
        return Err(OdError::StorageError(
            "Invalid signature for Restore Default Parameters",
        ));
    }
    if let Some(s) = &mut od.storage {
        info!(
            "Requesting restore defaults for sub-index {}",
            list_to_restore
        );
        s.request_restore_defaults()
    } else {
        error!("Restore defaults failed: No storage backend configured.");
        Err(OdError::StorageError("No storage backend configured"))
    }
}
