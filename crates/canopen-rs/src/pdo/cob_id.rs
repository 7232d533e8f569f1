// crates/canopen-rs/src/pdo/cob_id.rs
use super::PdoRole;
use crate::OdError;
use log::{trace, warn};

/// The 32-bit COB-ID register of a PDO (CiA 301, Table 71).
///
/// | bit  | meaning                                     |
/// |------|---------------------------------------------|
/// | 31   | 1 = PDO does not exist / is not valid       |
/// | 30   | 1 = no RTR allowed on this PDO              |
/// | 29   | 1 = 29-bit identifier (never accepted here) |
/// | 28-0 | identifier and reserved bits                |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CobId(pub u32);

impl CobId {
    pub const INVALID: u32 = 1 << 31;
    pub const NO_RTR: u32 = 1 << 30;
    pub const EXTENDED: u32 = 1 << 29;
    pub const BASE_ID_MASK: u32 = 0x7FF;

    /// Builds an active COB-ID for an 11-bit identifier.
    pub fn new(can_id: u16, rtr_suppressed: bool) -> Self {
        let mut raw = can_id as u32 & Self::BASE_ID_MASK;
        if rtr_suppressed {
            raw |= Self::NO_RTR;
        }
        Self(raw)
    }

    pub fn is_active(self) -> bool {
        self.0 & Self::INVALID == 0
    }

    pub fn has_extended_flag(self) -> bool {
        self.0 & Self::EXTENDED != 0
    }

    pub fn rtr_suppressed(self) -> bool {
        self.0 & Self::NO_RTR != 0
    }

    /// The 11-bit CAN identifier carried by the register.
    pub fn can_id(self) -> u16 {
        (self.0 & Self::BASE_ID_MASK) as u16
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    /// Same register with the valid bit cleared or set.
    pub fn with_active(self, active: bool) -> Self {
        if active {
            Self(self.0 & !Self::INVALID)
        } else {
            Self(self.0 | Self::INVALID)
        }
    }
}

impl From<u32> for CobId {
    fn from(raw: u32) -> Self {
        CobId(raw)
    }
}

impl From<CobId> for u32 {
    fn from(cob_id: CobId) -> Self {
        cob_id.0
    }
}

/// Decides whether `proposed` may replace the committed register `current`.
///
/// Returns the value to commit. Extended identifiers are never accepted and
/// transmit PDOs must always suppress RTR. The identifier of an active PDO
/// cannot change: it has to be invalidated first, after which any identifier
/// may be written and the PDO reactivated.
pub fn validate_cob_id(current: CobId, proposed: CobId, role: PdoRole) -> Result<CobId, OdError> {
    if proposed.has_extended_flag() {
        warn!(
            "COB-ID {:#010X} rejected: 29-bit identifiers are not supported",
            proposed.raw()
        );
        return Err(OdError::Range);
    }
    if role == PdoRole::Transmit && !proposed.rtr_suppressed() {
        warn!(
            "COB-ID {:#010X} rejected: transmit PDOs must not allow RTR",
            proposed.raw()
        );
        return Err(OdError::Range);
    }
    if current.is_active() && proposed.is_active() {
        warn!(
            "COB-ID {:#010X} rejected: PDO is active with {:#010X}, invalidate it first",
            proposed.raw(),
            current.raw()
        );
        return Err(OdError::Range);
    }

    trace!(
        "COB-ID {:#010X} -> {:#010X} accepted ({:?})",
        current.raw(),
        proposed.raw(),
        role
    );
    Ok(proposed)
}
