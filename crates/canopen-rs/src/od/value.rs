// crates/canopen-rs/src/od/value.rs

use crate::OdError;
use crate::types::{
    BOOLEAN, INTEGER8, INTEGER16, INTEGER32, UNSIGNED8, UNSIGNED16, UNSIGNED32,
};
use alloc::vec::Vec;
use core::convert::TryInto;

/// The basic data types an entry can be declared with (CiA 301, Table 44).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Integer8,
    Integer16,
    Integer32,
    Unsigned8,
    Unsigned16,
    Unsigned32,
}

impl DataType {
    /// Width of the type on the bus, in bytes.
    pub const fn size(self) -> usize {
        match self {
            DataType::Boolean | DataType::Integer8 | DataType::Unsigned8 => 1,
            DataType::Integer16 | DataType::Unsigned16 => 2,
            DataType::Integer32 | DataType::Unsigned32 => 4,
        }
    }

}

/// Represents any value that can be stored in an Object Dictionary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectValue {
    Boolean(BOOLEAN),
    Integer8(INTEGER8),
    Integer16(INTEGER16),
    Integer32(INTEGER32),
    Unsigned8(UNSIGNED8),
    Unsigned16(UNSIGNED16),
    Unsigned32(UNSIGNED32),
}

impl ObjectValue {
    pub fn data_type(&self) -> DataType {
        match self {
            ObjectValue::Boolean(_) => DataType::Boolean,
            ObjectValue::Integer8(_) => DataType::Integer8,
            ObjectValue::Integer16(_) => DataType::Integer16,
            ObjectValue::Integer32(_) => DataType::Integer32,
            ObjectValue::Unsigned8(_) => DataType::Unsigned8,
            ObjectValue::Unsigned16(_) => DataType::Unsigned16,
            ObjectValue::Unsigned32(_) => DataType::Unsigned32,
        }
    }

    /// Returns the value's bit pattern, zero-extended to 32 bits.
    pub fn to_raw(&self) -> u32 {
        match *self {
            ObjectValue::Boolean(v) => v as u32,
            ObjectValue::Integer8(v) => v as u8 as u32,
            ObjectValue::Integer16(v) => v as u16 as u32,
            ObjectValue::Integer32(v) => v as u32,
            ObjectValue::Unsigned8(v) => v as u32,
            ObjectValue::Unsigned16(v) => v as u32,
            ObjectValue::Unsigned32(v) => v,
        }
    }

    /// Rebuilds a value of the given type from a raw bit pattern.
    /// Bits above the type's width are discarded.
    pub fn from_raw(data_type: DataType, raw: u32) -> Self {
        match data_type {
            DataType::Boolean => ObjectValue::Boolean(raw & 0x01 != 0),
            DataType::Integer8 => ObjectValue::Integer8(raw as u8 as i8),
            DataType::Integer16 => ObjectValue::Integer16(raw as u16 as i16),
            DataType::Integer32 => ObjectValue::Integer32(raw as i32),
            DataType::Unsigned8 => ObjectValue::Unsigned8(raw as u8),
            DataType::Unsigned16 => ObjectValue::Unsigned16(raw as u16),
            DataType::Unsigned32 => ObjectValue::Unsigned32(raw),
        }
    }

    /// Serializes the inner value into a little-endian byte vector,
    /// as carried in an expedited SDO transfer.
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            ObjectValue::Boolean(v) => (*v as u8).to_le_bytes().to_vec(),
            ObjectValue::Integer8(v) => v.to_le_bytes().to_vec(),
            ObjectValue::Integer16(v) => v.to_le_bytes().to_vec(),
            ObjectValue::Integer32(v) => v.to_le_bytes().to_vec(),
            ObjectValue::Unsigned8(v) => v.to_le_bytes().to_vec(),
            ObjectValue::Unsigned16(v) => v.to_le_bytes().to_vec(),
            ObjectValue::Unsigned32(v) => v.to_le_bytes().to_vec(),
        }
    }

    /// Deserializes a little-endian byte slice into a value of the given type.
    /// The slice length must match the type's width exactly.
    pub fn deserialize(data: &[u8], data_type: DataType) -> Result<ObjectValue, OdError> {
        macro_rules! deserialize_fixed {
            ($data:expr, $variant:path, $type:ty) => {{
                let bytes: [u8; core::mem::size_of::<$type>()] = $data.try_into()?;
                Ok($variant(<$type>::from_le_bytes(bytes)))
            }};
        }

        if data.len() != data_type.size() {
            return Err(OdError::TypeMismatch);
        }

        match data_type {
            DataType::Boolean => match data[0] {
                0 => Ok(ObjectValue::Boolean(false)),
                1 => Ok(ObjectValue::Boolean(true)),
                _ => Err(OdError::Range),
            },
            DataType::Integer8 => deserialize_fixed!(data, ObjectValue::Integer8, i8),
            DataType::Integer16 => deserialize_fixed!(data, ObjectValue::Integer16, i16),
            DataType::Integer32 => deserialize_fixed!(data, ObjectValue::Integer32, i32),
            DataType::Unsigned8 => deserialize_fixed!(data, ObjectValue::Unsigned8, u8),
            DataType::Unsigned16 => deserialize_fixed!(data, ObjectValue::Unsigned16, u16),
            DataType::Unsigned32 => deserialize_fixed!(data, ObjectValue::Unsigned32, u32),
        }
    }
}
