//! Utility functions for creating default Object Dictionaries.

use super::constants::{
    COB_ID_RPDO_BASES, COB_ID_TPDO_BASES, IDX_DEVICE_TYPE_U32, IDX_ERROR_REGISTER_U8,
    IDX_IDENTITY_OBJECT_REC, SUBIDX_IDENTITY_PRODUCT_CODE, SUBIDX_IDENTITY_REVISION,
    SUBIDX_IDENTITY_SERIAL, SUBIDX_IDENTITY_VENDOR_ID, SUBIDX_PDO_COMM_COB_ID_U32,
    SUBIDX_PDO_COMM_EVENT_TIMER_U16, SUBIDX_PDO_COMM_INHIBIT_TIME_U16,
    SUBIDX_PDO_COMM_TRANSMISSION_TYPE_U8, SUBIDX_PDO_MAPPING_COUNT_U8,
    SUBIDX_PDO_MAPPING_FIRST_ENTRY_U32,
};
use super::{AccessType, ObjectDictionary, ObjectEntry, ObjectValue, PdoHook};
use crate::OdError;
use crate::pdo::{CobId, PdoConfig, PdoRole, TransmissionType};
use crate::types::NodeId;

/// Device type used by [`new_default`]: CiA 401 generic I/O device.
pub const DEFAULT_DEVICE_TYPE: u32 = 0x000F_0191;

/// Inserts the objects every CANopen device must provide: device type (1000h),
/// error register (1001h) and the identity object (1018h) with vendor ID,
/// product code, revision number and serial number.
pub fn insert_mandatory_objects(
    od: &mut ObjectDictionary,
    device_type: u32,
    identity: [u32; 4],
) -> Result<(), OdError> {
    od.insert(
        IDX_DEVICE_TYPE_U32,
        0,
        ObjectEntry::variable(
            "DeviceType",
            AccessType::Constant,
            ObjectValue::Unsigned32(device_type),
        ),
    )?;
    // Written internally by the application; may be mapped into a TPDO.
    od.insert(
        IDX_ERROR_REGISTER_U8,
        0,
        ObjectEntry::variable("ErrorRegister", AccessType::ReadOnly, ObjectValue::Unsigned8(0))
            .mappable(),
    )?;
    od.insert(
        IDX_IDENTITY_OBJECT_REC,
        0,
        ObjectEntry::variable(
            "Identity_NumberOfEntries",
            AccessType::Constant,
            ObjectValue::Unsigned8(identity.len() as u8),
        ),
    )?;
    const IDENTITY_SUBS: [(u8, &str); 4] = [
        (SUBIDX_IDENTITY_VENDOR_ID, "Identity_VendorId"),
        (SUBIDX_IDENTITY_PRODUCT_CODE, "Identity_ProductCode"),
        (SUBIDX_IDENTITY_REVISION, "Identity_RevisionNo"),
        (SUBIDX_IDENTITY_SERIAL, "Identity_SerialNo"),
    ];
    for ((sub_index, name), value) in IDENTITY_SUBS.into_iter().zip(identity) {
        od.insert(
            IDX_IDENTITY_OBJECT_REC,
            sub_index,
            ObjectEntry::variable(name, AccessType::ReadOnly, ObjectValue::Unsigned32(value)),
        )?;
    }
    Ok(())
}

/// The COB-ID a PDO carries out of the box.
///
/// PDOs 1-4 of each direction use the predefined connection set and start
/// valid; all others start invalid and must be configured before use.
pub fn default_cob_id(role: PdoRole, number: u16, node_id: NodeId) -> CobId {
    let bases = match role {
        PdoRole::Receive => COB_ID_RPDO_BASES,
        PdoRole::Transmit => COB_ID_TPDO_BASES,
    };
    match bases.get(number as usize) {
        Some(base) => CobId::new(base + node_id.0 as u16, true),
        None => CobId(CobId::INVALID | CobId::NO_RTR),
    }
}

/// Inserts the communication and mapping parameter objects of one PDO.
///
/// Every sub-object is hooked to its PDO rule, so later writes through
/// [`ObjectDictionary::write`] are validated. The mapping starts empty.
/// The PDO itself still has to be registered with
/// [`ObjectDictionary::register_pdo`] before the rules can resolve it.
pub fn insert_pdo_objects(
    od: &mut ObjectDictionary,
    config: &PdoConfig,
    cob_id: CobId,
    transmission_type: TransmissionType,
) -> Result<(), OdError> {
    config.validate()?;
    let comm = config.comm_index();
    let mapping = config.mapping_index();

    od.insert(
        comm,
        0,
        ObjectEntry::variable(
            "PdoComm_NumberOfEntries",
            AccessType::Constant,
            ObjectValue::Unsigned8(SUBIDX_PDO_COMM_EVENT_TIMER_U16),
        ),
    )?;
    od.insert(
        comm,
        SUBIDX_PDO_COMM_COB_ID_U32,
        ObjectEntry::hooked(
            "PdoComm_CobId",
            AccessType::ReadWrite,
            PdoHook::CobId,
            ObjectValue::Unsigned32(cob_id.raw()),
        ),
    )?;
    od.insert(
        comm,
        SUBIDX_PDO_COMM_TRANSMISSION_TYPE_U8,
        ObjectEntry::hooked(
            "PdoComm_TransmissionType",
            AccessType::ReadWrite,
            PdoHook::TransmissionType,
            ObjectValue::Unsigned8(transmission_type.into()),
        ),
    )?;
    od.insert(
        comm,
        SUBIDX_PDO_COMM_INHIBIT_TIME_U16,
        ObjectEntry::hooked(
            "PdoComm_InhibitTime",
            AccessType::ReadWrite,
            PdoHook::InhibitTime,
            ObjectValue::Unsigned16(0),
        ),
    )?;
    od.insert(
        comm,
        SUBIDX_PDO_COMM_EVENT_TIMER_U16,
        ObjectEntry::hooked(
            "PdoComm_EventTimer",
            AccessType::ReadWrite,
            PdoHook::EventTimer,
            ObjectValue::Unsigned16(0),
        ),
    )?;

    od.insert(
        mapping,
        SUBIDX_PDO_MAPPING_COUNT_U8,
        ObjectEntry::hooked(
            "PdoMapping_NumberOfEntries",
            AccessType::ReadWrite,
            PdoHook::MapCount,
            ObjectValue::Unsigned8(0),
        ),
    )?;
    for sub_index in SUBIDX_PDO_MAPPING_FIRST_ENTRY_U32..=config.max_mapping_entries {
        od.insert(
            mapping,
            sub_index,
            ObjectEntry::hooked(
                "PdoMapping_Entry",
                AccessType::ReadWrite,
                PdoHook::MapEntry,
                ObjectValue::Unsigned32(0),
            ),
        )?;
    }
    Ok(())
}

/// Creates an Object Dictionary with the mandatory objects and the
/// parameter objects of the given PDOs, using their default COB-IDs and
/// event-driven transmission.
///
/// The PDOs are not registered; that happens when the dictionary is handed
/// to [`crate::Node::new`] together with the same configuration.
pub fn new_default(
    node_id: NodeId,
    pdos: &[PdoConfig],
) -> Result<ObjectDictionary<'static>, OdError> {
    let mut od = ObjectDictionary::new(None);
    insert_mandatory_objects(&mut od, DEFAULT_DEVICE_TYPE, [0, 0, 0, 0])?;
    for config in pdos {
        insert_pdo_objects(
            &mut od,
            config,
            default_cob_id(config.role, config.number, node_id),
            TransmissionType::EventProfile,
        )?;
    }
    Ok(od)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cob_ids() {
        let node_id = NodeId(0x10);
        assert_eq!(
            default_cob_id(PdoRole::Transmit, 0, node_id).raw(),
            0x4000_0190
        );
        assert_eq!(
            default_cob_id(PdoRole::Receive, 3, node_id).raw(),
            0x4000_0510
        );
        assert!(!default_cob_id(PdoRole::Receive, 4, node_id).is_active());
    }

    #[test]
    fn test_new_default_layout() {
        let pdos = [
            PdoConfig::new(PdoRole::Receive, 0, 8),
            PdoConfig::new(PdoRole::Transmit, 1, 2),
        ];
        let od = new_default(NodeId(1), &pdos).unwrap();

        assert!(od.validate_mandatory_objects().is_ok());
        assert_eq!(od.read_u32(0x1400, 1), Ok(0x4000_0201));
        assert_eq!(od.read_u8(0x1400, 2), Ok(255));
        assert_eq!(od.read_u32(0x1801, 1), Ok(0x4000_0281));
        assert_eq!(od.read_u8(0x1A01, 0), Ok(0));
        assert!(od.contains(0x1A01, 2));
        assert!(!od.contains(0x1A01, 3));
        assert_eq!(
            od.entry(0x1600, 8).and_then(|e| e.storage.hook()),
            Some(PdoHook::MapEntry)
        );
    }

    #[test]
    fn test_identity_object_layout() {
        let mut od = ObjectDictionary::new(None);
        insert_mandatory_objects(&mut od, DEFAULT_DEVICE_TYPE, [0x11, 0x22, 0x33, 0x44]).unwrap();
        assert_eq!(od.read_u8(IDX_IDENTITY_OBJECT_REC, 0), Ok(4));
        assert_eq!(od.read_u32(IDX_IDENTITY_OBJECT_REC, SUBIDX_IDENTITY_VENDOR_ID), Ok(0x11));
        assert_eq!(od.read_u32(IDX_IDENTITY_OBJECT_REC, SUBIDX_IDENTITY_SERIAL), Ok(0x44));
        assert_eq!(
            od.write_u32(IDX_IDENTITY_OBJECT_REC, SUBIDX_IDENTITY_REVISION, 0),
            Err(OdError::Access)
        );
    }

    #[test]
    fn test_pdo_objects_cannot_be_inserted_twice() {
        let mut od = ObjectDictionary::new(None);
        let config = PdoConfig::new(PdoRole::Receive, 0, 1);
        let cob_id = default_cob_id(PdoRole::Receive, 0, NodeId(1));
        insert_pdo_objects(&mut od, &config, cob_id, TransmissionType::EventProfile).unwrap();
        assert_eq!(
            insert_pdo_objects(&mut od, &config, cob_id, TransmissionType::EventProfile),
            Err(OdError::DuplicateObject)
        );
    }
}
