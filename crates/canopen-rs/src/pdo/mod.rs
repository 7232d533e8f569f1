// crates/canopen-rs/src/pdo/mod.rs

pub mod cob_id;
pub mod comm;
pub mod config;
pub mod mapping;

pub use cob_id::{CobId, validate_cob_id};
pub use comm::{TransmissionType, validate_comm_param};
pub use config::{PdoConfig, PdoParamBlock, PdoRole, decode_pdo_index};
pub use mapping::PdoMappingEntry;
