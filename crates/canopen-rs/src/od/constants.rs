// crates/canopen-rs/src/od/constants.rs
//! Central repository for standard Object Dictionary indices and sub-indices.
//!
//! This module provides `pub const` definitions for well-known object
//! indices from the CANopen communication profile (CiA 301),
//! using a consistent `IDX_` and `SUBIDX_` naming convention.

// --- 0x1000 - 0x1FFF: Communication Profile Area ---

// 0x10xx: General Communication
pub const IDX_DEVICE_TYPE_U32: u16 = 0x1000;
pub const IDX_ERROR_REGISTER_U8: u16 = 0x1001;
pub const IDX_STORE_PARAM_REC: u16 = 0x1010;
pub const IDX_RESTORE_PARAM_REC: u16 = 0x1011;
pub const SUBIDX_PARAM_ALL: u8 = 1;
pub const SUBIDX_PARAM_COMMUNICATION: u8 = 2;
pub const SUBIDX_PARAM_APPLICATION: u8 = 3;
pub const IDX_IDENTITY_OBJECT_REC: u16 = 0x1018;
pub const SUBIDX_IDENTITY_VENDOR_ID: u8 = 1;
pub const SUBIDX_IDENTITY_PRODUCT_CODE: u8 = 2;
pub const SUBIDX_IDENTITY_REVISION: u8 = 3;
pub const SUBIDX_IDENTITY_SERIAL: u8 = 4;

/// "save" as a little-endian UNSIGNED32 (written to 1010h).
pub const SIGNATURE_SAVE: u32 = 0x6576_6173;
/// "load" as a little-endian UNSIGNED32 (written to 1011h).
pub const SIGNATURE_LOAD: u32 = 0x6461_6F6C;

// 0x14xx - 0x15xx: RPDO Communication Parameters
pub const IDX_RPDO_COMM_PARAM_REC_START: u16 = 0x1400;

// 0x16xx - 0x17xx: RPDO Mapping Parameters
pub const IDX_RPDO_MAPPING_PARAM_REC_START: u16 = 0x1600;

// 0x18xx - 0x19xx: TPDO Communication Parameters
pub const IDX_TPDO_COMM_PARAM_REC_START: u16 = 0x1800;

// 0x1Axx - 0x1Bxx: TPDO Mapping Parameters
pub const IDX_TPDO_MAPPING_PARAM_REC_START: u16 = 0x1A00;

/// Number of PDO channels per direction.
pub const PDO_CHANNEL_COUNT: u16 = 512;

// PDO communication parameter record sub-indices
pub const SUBIDX_PDO_COMM_COB_ID_U32: u8 = 1;
pub const SUBIDX_PDO_COMM_TRANSMISSION_TYPE_U8: u8 = 2;
pub const SUBIDX_PDO_COMM_INHIBIT_TIME_U16: u8 = 3;
pub const SUBIDX_PDO_COMM_EVENT_TIMER_U16: u8 = 5;

// PDO mapping parameter record sub-indices
pub const SUBIDX_PDO_MAPPING_COUNT_U8: u8 = 0;
pub const SUBIDX_PDO_MAPPING_FIRST_ENTRY_U32: u8 = 1;

// Default COB-ID bases of the predefined connection set (COB-ID = base + node-id).
pub const COB_ID_TPDO_BASES: [u16; 4] = [0x180, 0x280, 0x380, 0x480];
pub const COB_ID_RPDO_BASES: [u16; 4] = [0x200, 0x300, 0x400, 0x500];

// --- 0x6000 - 0x9FFF: Standardized Device Profile Area ---
pub const IDX_DEVICE_PROFILE_AREA_START: u16 = 0x6000;
pub const IDX_DEVICE_PROFILE_AREA_END: u16 = 0x9FFF;
