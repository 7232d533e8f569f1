// crates/canopen-rs/src/pdo/config.rs
use crate::od::constants::{
    IDX_RPDO_COMM_PARAM_REC_START, IDX_RPDO_MAPPING_PARAM_REC_START,
    IDX_TPDO_COMM_PARAM_REC_START, IDX_TPDO_MAPPING_PARAM_REC_START, PDO_CHANNEL_COUNT,
};
use crate::types::C_PDO_MAX_MAPPING_ENTRIES;
use crate::OdError;

/// Direction of a PDO as seen from the local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PdoRole {
    /// Receive PDO: the node consumes the payload.
    Receive,
    /// Transmit PDO: the node produces the payload.
    Transmit,
}

impl PdoRole {
    /// First communication parameter index of this role (1400h / 1800h).
    pub const fn comm_base(self) -> u16 {
        match self {
            PdoRole::Receive => IDX_RPDO_COMM_PARAM_REC_START,
            PdoRole::Transmit => IDX_TPDO_COMM_PARAM_REC_START,
        }
    }

    /// First mapping parameter index of this role (1600h / 1A00h).
    pub const fn mapping_base(self) -> u16 {
        match self {
            PdoRole::Receive => IDX_RPDO_MAPPING_PARAM_REC_START,
            PdoRole::Transmit => IDX_TPDO_MAPPING_PARAM_REC_START,
        }
    }
}

/// Which parameter block of a PDO an index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdoParamBlock {
    Communication,
    Mapping,
}

/// Decodes an index into (role, block, PDO number) if it lies in one of the
/// four PDO parameter areas.
pub fn decode_pdo_index(index: u16) -> Option<(PdoRole, PdoParamBlock, u16)> {
    [
        (PdoRole::Receive, PdoParamBlock::Communication),
        (PdoRole::Receive, PdoParamBlock::Mapping),
        (PdoRole::Transmit, PdoParamBlock::Communication),
        (PdoRole::Transmit, PdoParamBlock::Mapping),
    ]
    .into_iter()
    .find_map(|(role, block)| {
        let base = match block {
            PdoParamBlock::Communication => role.comm_base(),
            PdoParamBlock::Mapping => role.mapping_base(),
        };
        let number = index.checked_sub(base)?;
        (number < PDO_CHANNEL_COUNT).then_some((role, block, number))
    })
}

/// Static configuration of one PDO channel, supplied when the node is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdoConfig {
    pub role: PdoRole,
    /// Zero-based PDO number (RPDO1 = 0).
    pub number: u16,
    /// Number of mapping entry sub-objects this PDO provides.
    pub max_mapping_entries: u8,
}

impl PdoConfig {
    pub fn new(role: PdoRole, number: u16, max_mapping_entries: u8) -> Self {
        Self {
            role,
            number,
            max_mapping_entries,
        }
    }

    pub fn validate(&self) -> Result<(), OdError> {
        if self.number >= PDO_CHANNEL_COUNT
            || self.max_mapping_entries == 0
            || self.max_mapping_entries > C_PDO_MAX_MAPPING_ENTRIES
        {
            return Err(OdError::InvalidPdoConfig);
        }
        Ok(())
    }

    pub fn comm_index(&self) -> u16 {
        self.role.comm_base() + self.number
    }

    pub fn mapping_index(&self) -> u16 {
        self.role.mapping_base() + self.number
    }
}
