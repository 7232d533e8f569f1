// crates/canopen-rs/src/od/pdo_validator.rs
use super::{ObjectDictionary, ObjectValue, PdoHook};
use super::constants::{
    SUBIDX_PDO_COMM_COB_ID_U32, SUBIDX_PDO_COMM_EVENT_TIMER_U16,
    SUBIDX_PDO_COMM_INHIBIT_TIME_U16, SUBIDX_PDO_COMM_TRANSMISSION_TYPE_U8,
    SUBIDX_PDO_MAPPING_COUNT_U8, SUBIDX_PDO_MAPPING_FIRST_ENTRY_U32,
};
use crate::OdError;
use crate::pdo::{
    CobId, PdoConfig, PdoMappingEntry, PdoParamBlock, PdoRole, decode_pdo_index,
    validate_cob_id, validate_comm_param,
};
use crate::types::C_PDO_MAX_PAYLOAD_BITS;
use log::{error, trace, warn};

/// Runs the PDO rule attached to an entry against a value about to be written.
/// Returns the value to commit.
pub(super) fn validate_pdo_write(
    od: &ObjectDictionary,
    hook: PdoHook,
    index: u16,
    sub_index: u8,
    value: ObjectValue,
) -> Result<ObjectValue, OdError> {
    match hook {
        PdoHook::CobId => validate_cob_id_write(od, index, sub_index, value)?,
        PdoHook::TransmissionType | PdoHook::InhibitTime | PdoHook::EventTimer => {
            validate_comm_write(od, hook, index, sub_index, value)?
        }
        PdoHook::MapCount => validate_mapping_count(od, index, sub_index, value.to_raw())?,
        PdoHook::MapEntry => validate_mapping_entry(od, index, sub_index, value.to_raw())?,
    }
    Ok(value)
}

/// Checks a value restored from storage against the rules that hold for every
/// committed register, whatever it contained before.
pub(super) fn validate_stored_value(
    od: &ObjectDictionary,
    index: u16,
    sub_index: u8,
    value: ObjectValue,
) -> Result<(), OdError> {
    let hook = od.entry(index, sub_index).and_then(|entry| entry.storage.hook());
    match (hook, decode_pdo_index(index)) {
        (Some(PdoHook::CobId), Some((role, PdoParamBlock::Communication, _))) => {
            validate_cob_id(CobId(CobId::INVALID), CobId(value.to_raw()), role).map(|_| ())
        }
        _ => Ok(()),
    }
}

/// Resolves the PDO a communication parameter index belongs to.
fn comm_pdo<'a>(od: &'a ObjectDictionary<'_>, index: u16) -> Option<&'a PdoConfig> {
    match decode_pdo_index(index)? {
        (role, PdoParamBlock::Communication, number) => od.pdo_config(role, number),
        _ => None,
    }
}

/// Resolves the PDO a mapping parameter index belongs to.
fn mapping_pdo<'a>(od: &'a ObjectDictionary<'_>, index: u16) -> Option<&'a PdoConfig> {
    match decode_pdo_index(index)? {
        (role, PdoParamBlock::Mapping, number) => od.pdo_config(role, number),
        _ => None,
    }
}

fn validate_cob_id_write(
    od: &ObjectDictionary,
    index: u16,
    sub_index: u8,
    value: ObjectValue,
) -> Result<(), OdError> {
    let Some(config) = comm_pdo(od, index).filter(|_| sub_index == SUBIDX_PDO_COMM_COB_ID_U32)
    else {
        error!(
            "COB-ID rule attached to {:#06X}/{:#04X}, which is not a PDO COB-ID",
            index, sub_index
        );
        return Err(OdError::MissingComObject);
    };
    let current = od.pdo_cob_id(config)?;
    validate_cob_id(current, CobId(value.to_raw()), config.role).map(|_| ())
}

fn validate_comm_write(
    od: &ObjectDictionary,
    hook: PdoHook,
    index: u16,
    sub_index: u8,
    value: ObjectValue,
) -> Result<(), OdError> {
    let expected_sub_index = match hook {
        PdoHook::TransmissionType => SUBIDX_PDO_COMM_TRANSMISSION_TYPE_U8,
        PdoHook::InhibitTime => SUBIDX_PDO_COMM_INHIBIT_TIME_U16,
        _ => SUBIDX_PDO_COMM_EVENT_TIMER_U16,
    };
    let in_comm_area = matches!(
        decode_pdo_index(index),
        Some((_, PdoParamBlock::Communication, _))
    );
    if !in_comm_area || sub_index != expected_sub_index {
        error!(
            "{:?} rule attached to {:#06X}/{:#04X}, expected sub-index {}",
            hook, index, sub_index, expected_sub_index
        );
        return Err(OdError::ParaIdx);
    }
    // The slot is right, but no PDO has been set up behind it.
    let config = comm_pdo(od, index).ok_or(OdError::Access)?;
    let cob_id = od.pdo_cob_id(config).map_err(|_| OdError::Access)?;
    validate_comm_param(hook, config.role, cob_id, value.to_raw())
}

/// Mapping parameters may only change while the PDO is invalid.
fn check_mapping_unlocked(od: &ObjectDictionary, config: &PdoConfig) -> Result<(), OdError> {
    let cob_id = od.pdo_cob_id(config)?;
    if cob_id.is_active() {
        warn!(
            "Mapping of {:?} PDO {} is locked: COB-ID {:#010X} is valid",
            config.role,
            config.number + 1,
            cob_id.raw()
        );
        return Err(OdError::Access);
    }
    Ok(())
}

/// Checks that the object referenced by a mapping entry can be carried by a
/// PDO of the given direction.
fn check_mapping_target(
    od: &ObjectDictionary,
    role: PdoRole,
    mapping: &PdoMappingEntry,
) -> Result<(), OdError> {
    let Some(target) = od.entry(mapping.index, mapping.sub_index) else {
        warn!(
            "Mapped object {:#06X}/{:#04X} does not exist",
            mapping.index, mapping.sub_index
        );
        return Err(OdError::MapType);
    };
    if !target.is_mappable() {
        warn!(
            "Object {:#06X}/{:#04X} ({}) is not PDO mappable",
            mapping.index, mapping.sub_index, target.name
        );
        return Err(OdError::MapType);
    }
    let direction_ok = match role {
        // Received data is written into the object.
        PdoRole::Receive => target.access.is_writable(),
        // Transmitted data is read from the object.
        PdoRole::Transmit => target.access.is_readable(),
    };
    if !direction_ok {
        warn!(
            "Object {:#06X}/{:#04X} ({}) with access {:?} cannot be mapped into a {:?} PDO",
            mapping.index, mapping.sub_index, target.name, target.access, role
        );
        return Err(OdError::MapType);
    }
    Ok(())
}

/// Validates a new number of mapped objects before it is written to
/// sub-index 0 of a mapping parameter.
///
/// Zero disables the mapping and is always accepted while the PDO is invalid.
/// Otherwise the first `count` entries must exist, reference mappable objects,
/// and together fit into one CAN frame.
pub fn validate_mapping_count(
    od: &ObjectDictionary,
    index: u16,
    sub_index: u8,
    count: u32,
) -> Result<(), OdError> {
    let Some(config) = mapping_pdo(od, index).filter(|_| sub_index == SUBIDX_PDO_MAPPING_COUNT_U8)
    else {
        error!(
            "Mapping count rule attached to {:#06X}/{:#04X}, which is not a PDO mapping count",
            index, sub_index
        );
        return Err(OdError::MissingMapObject);
    };
    check_mapping_unlocked(od, config)?;

    if count == 0 {
        trace!(
            "PDO mapping {:#06X} deactivated (0 entries). Validation skipped.",
            index
        );
        return Ok(());
    }
    if count > config.max_mapping_entries as u32 {
        warn!(
            "PDO mapping {:#06X}: {} entries requested, only {} available",
            index, count, config.max_mapping_entries
        );
        return Err(OdError::MapLen);
    }

    let mut total_bits: u32 = 0;
    for sub in SUBIDX_PDO_MAPPING_FIRST_ENTRY_U32..=count as u8 {
        let Some(entry) = od.entry(index, sub) else {
            error!(
                "PDO mapping validation error for {:#06X}: Trying to enable {} entries, but entry {} is missing.",
                index, count, sub
            );
            return Err(OdError::MissingMapObject);
        };
        let mapping = PdoMappingEntry::from_u32(entry.value().to_raw());
        check_mapping_target(od, config.role, &mapping)?;
        total_bits += mapping.length_bits as u32;
    }

    if total_bits > C_PDO_MAX_PAYLOAD_BITS {
        warn!(
            "PDO mapping validation failed for index {:#06X}. Required size: {} bits, limit: {} bits.",
            index, total_bits, C_PDO_MAX_PAYLOAD_BITS
        );
        return Err(OdError::MapLen);
    }
    trace!(
        "PDO mapping validation successful for index {:#06X}. Required: {} bits",
        index, total_bits
    );
    Ok(())
}

/// Validates a mapping entry before it is written to sub-index 1..=N of a
/// mapping parameter.
///
/// Entries that are currently enabled by sub-index 0 cannot be replaced;
/// the count has to be set to 0 first.
pub fn validate_mapping_entry(
    od: &ObjectDictionary,
    index: u16,
    sub_index: u8,
    raw: u32,
) -> Result<(), OdError> {
    let Some(config) = mapping_pdo(od, index)
        .filter(|config| {
            (SUBIDX_PDO_MAPPING_FIRST_ENTRY_U32..=config.max_mapping_entries).contains(&sub_index)
        })
    else {
        error!(
            "Mapping entry rule attached to {:#06X}/{:#04X}, which is not a PDO mapping entry",
            index, sub_index
        );
        return Err(OdError::MissingMapObject);
    };
    check_mapping_unlocked(od, config)?;

    let count = od
        .entry(index, SUBIDX_PDO_MAPPING_COUNT_U8)
        .map_or(0, |entry| entry.value().to_raw());
    if sub_index as u32 <= count {
        warn!(
            "Mapping entry {:#06X}/{} is in use ({} entries enabled), set the count to 0 first",
            index, sub_index, count
        );
        return Err(OdError::Access);
    }

    let mapping = PdoMappingEntry::from_u32(raw);
    check_mapping_target(od, config.role, &mapping)?;
    trace!(
        "Mapping entry {:#06X}/{} -> {:#06X}/{:#04X} ({} bits) accepted",
        index, sub_index, mapping.index, mapping.sub_index, mapping.length_bits
    );
    Ok(())
}
