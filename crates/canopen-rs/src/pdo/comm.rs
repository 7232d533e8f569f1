// crates/canopen-rs/src/pdo/comm.rs
use super::{CobId, PdoRole};
use crate::od::PdoHook;
use crate::OdError;
use log::{trace, warn};

/// Decoded PDO transmission type (CiA 301, Table 72).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransmissionType {
    /// 0: synchronous, sent after a SYNC when the data changed.
    SynchronousAcyclic,
    /// 1..=240: synchronous, sent every n-th SYNC.
    SynchronousCyclic(u8),
    /// 241..=251
    Reserved(u8),
    /// 252: synchronous, sent on RTR only.
    SynchronousRtr,
    /// 253: event-driven, sent on RTR only.
    EventRtr,
    /// 254: event-driven, manufacturer-specific.
    EventManufacturer,
    /// 255: event-driven, device/application profile specific.
    EventProfile,
}

impl From<u8> for TransmissionType {
    fn from(value: u8) -> Self {
        match value {
            0 => TransmissionType::SynchronousAcyclic,
            1..=240 => TransmissionType::SynchronousCyclic(value),
            241..=251 => TransmissionType::Reserved(value),
            252 => TransmissionType::SynchronousRtr,
            253 => TransmissionType::EventRtr,
            254 => TransmissionType::EventManufacturer,
            255 => TransmissionType::EventProfile,
        }
    }
}

impl From<TransmissionType> for u8 {
    fn from(value: TransmissionType) -> Self {
        match value {
            TransmissionType::SynchronousAcyclic => 0,
            TransmissionType::SynchronousCyclic(n) | TransmissionType::Reserved(n) => n,
            TransmissionType::SynchronousRtr => 252,
            TransmissionType::EventRtr => 253,
            TransmissionType::EventManufacturer => 254,
            TransmissionType::EventProfile => 255,
        }
    }
}

impl TransmissionType {
    /// Reserved types and the RTR-triggered ones can never be configured.
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            TransmissionType::Reserved(_)
                | TransmissionType::SynchronousRtr
                | TransmissionType::EventRtr
        )
    }
}

/// Guards writes to the transmission type, inhibit time and event timer of a
/// PDO whose COB-ID register currently holds `cob_id`.
pub fn validate_comm_param(
    hook: PdoHook,
    role: PdoRole,
    cob_id: CobId,
    raw: u32,
) -> Result<(), OdError> {
    match hook {
        PdoHook::TransmissionType => {
            if cob_id.is_active() {
                warn!(
                    "Transmission type rejected: PDO with COB-ID {:#010X} is active",
                    cob_id.raw()
                );
                return Err(OdError::Range);
            }
            let transmission_type = TransmissionType::from(raw as u8);
            if !transmission_type.is_supported() {
                warn!("Transmission type {:?} is not supported", transmission_type);
                return Err(OdError::Range);
            }
            trace!("Transmission type {:?} accepted", transmission_type);
            Ok(())
        }
        PdoHook::InhibitTime | PdoHook::EventTimer => {
            if role == PdoRole::Transmit && cob_id.is_active() {
                warn!(
                    "{:?} rejected: TPDO with COB-ID {:#010X} is active",
                    hook,
                    cob_id.raw()
                );
                return Err(OdError::Range);
            }
            Ok(())
        }
        // Not a communication parameter hook.
        _ => Err(OdError::ParaIdx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVE: CobId = CobId(0x4000_0180);
    const INACTIVE: CobId = CobId(0xC000_0180);

    #[test]
    fn test_transmission_type_follows_activation() {
        assert_eq!(
            validate_comm_param(PdoHook::TransmissionType, PdoRole::Receive, ACTIVE, 0),
            Err(OdError::Range)
        );
        assert_eq!(
            validate_comm_param(PdoHook::TransmissionType, PdoRole::Receive, INACTIVE, 0),
            Ok(())
        );
        assert_eq!(
            validate_comm_param(PdoHook::TransmissionType, PdoRole::Transmit, INACTIVE, 255),
            Ok(())
        );
    }

    #[test]
    fn test_unsupported_transmission_types() {
        for value in [241, 251, 252, 253] {
            assert_eq!(
                validate_comm_param(PdoHook::TransmissionType, PdoRole::Transmit, INACTIVE, value),
                Err(OdError::Range),
                "type {value} should be rejected"
            );
        }
        assert_eq!(TransmissionType::from(17), TransmissionType::SynchronousCyclic(17));
    }

    #[test]
    fn test_timers_locked_only_on_active_tpdo() {
        assert_eq!(
            validate_comm_param(PdoHook::InhibitTime, PdoRole::Transmit, ACTIVE, 10),
            Err(OdError::Range)
        );
        assert_eq!(
            validate_comm_param(PdoHook::EventTimer, PdoRole::Transmit, INACTIVE, 100),
            Ok(())
        );
        assert_eq!(
            validate_comm_param(PdoHook::EventTimer, PdoRole::Receive, ACTIVE, 100),
            Ok(())
        );
    }
}
