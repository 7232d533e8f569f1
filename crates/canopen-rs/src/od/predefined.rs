use super::ObjectDictionary;
use super::constants::{
    IDX_DEVICE_TYPE_U32, IDX_ERROR_REGISTER_U8, IDX_IDENTITY_OBJECT_REC, IDX_RESTORE_PARAM_REC,
    IDX_STORE_PARAM_REC, SUBIDX_IDENTITY_VENDOR_ID, SUBIDX_PARAM_ALL, SUBIDX_PARAM_APPLICATION,
    SUBIDX_PARAM_COMMUNICATION,
};
use super::entry::{AccessType, ObjectEntry};
use super::value::ObjectValue;
use crate::OdError;
use log::error;

/// Populates the OD with the objects that define protocol mechanisms
/// (store/restore commands), unless the application already provided them.
/// Device-specific identification objects are left to the user to insert.
pub(super) fn populate_protocol_objects(od: &mut ObjectDictionary) {
    const COMMAND_OBJECTS: [(u16, &str, &str); 2] = [
        (IDX_STORE_PARAM_REC, "StoreParam_NumberOfEntries", "StoreParam"),
        (IDX_RESTORE_PARAM_REC, "RestoreParam_NumberOfEntries", "RestoreDefParam"),
    ];
    for (index, count_name, name) in COMMAND_OBJECTS {
        if od.contains(index, 0) {
            continue;
        }
        od.entries.insert(
            (index, 0),
            ObjectEntry::variable(count_name, AccessType::Constant, ObjectValue::Unsigned8(3)),
        );
        for sub_index in [
            SUBIDX_PARAM_ALL,
            SUBIDX_PARAM_COMMUNICATION,
            SUBIDX_PARAM_APPLICATION,
        ] {
            // Reads 1: the device saves/restores on command.
            od.entries.insert(
                (index, sub_index),
                ObjectEntry::variable(name, AccessType::ReadWrite, ObjectValue::Unsigned32(1)),
            );
        }
    }
}

/// Validates that the OD contains all mandatory objects required for a node to function.
pub(super) fn validate_mandatory_objects(od: &ObjectDictionary) -> Result<(), OdError> {
    const MANDATORY_OBJECTS: &[(u16, u8)] = &[
        (IDX_DEVICE_TYPE_U32, 0),
        (IDX_ERROR_REGISTER_U8, 0),
        (IDX_IDENTITY_OBJECT_REC, SUBIDX_IDENTITY_VENDOR_ID),
    ];
    for &(index, sub_index) in MANDATORY_OBJECTS {
        if !od.contains(index, sub_index) {
            error!(
                "Mandatory object {:#06X}/{:#04X} is missing",
                index, sub_index
            );
            return Err(OdError::NoObject);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_objects_are_added_once() {
        let mut od = ObjectDictionary::new(None);
        populate_protocol_objects(&mut od);
        populate_protocol_objects(&mut od);
        assert_eq!(od.read_u8(IDX_STORE_PARAM_REC, 0), Ok(3));
        assert_eq!(od.read_u32(IDX_RESTORE_PARAM_REC, 3), Ok(1));
        assert_eq!(od.len(), 8);
    }

    #[test]
    fn test_missing_mandatory_object() {
        let mut od = ObjectDictionary::new(None);
        assert_eq!(validate_mandatory_objects(&od), Err(OdError::NoObject));
        crate::od::utils::insert_mandatory_objects(&mut od, 0x0000_0191, [1, 2, 3, 4]).unwrap();
        assert_eq!(validate_mandatory_objects(&od), Ok(()));
    }
}
