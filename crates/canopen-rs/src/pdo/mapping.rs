// crates/canopen-rs/src/pdo/mapping.rs
use crate::types::{UNSIGNED8, UNSIGNED16, UNSIGNED32};

/// Represents a single PDO mapping entry, parsed from a 32-bit value.
/// (CiA 301, Figure 73)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PdoMappingEntry {
    /// Object Dictionary index of the object to be mapped.
    pub index: UNSIGNED16,
    /// Object Dictionary sub-index of the object to be mapped.
    pub sub_index: UNSIGNED8,
    /// Length of the object in bits.
    pub length_bits: UNSIGNED8,
}

impl PdoMappingEntry {
    pub fn new(index: u16, sub_index: u8, length_bits: u8) -> Self {
        Self {
            index,
            sub_index,
            length_bits,
        }
    }

    /// Deserializes a UNSIGNED32 value from the OD into a mapping entry.
    pub fn from_u32(value: UNSIGNED32) -> Self {
        Self {
            index: (value >> 16) as UNSIGNED16,
            sub_index: ((value >> 8) & 0xFF) as UNSIGNED8,
            length_bits: (value & 0xFF) as UNSIGNED8,
        }
    }

    /// Serializes the mapping entry into a UNSIGNED32 value for storing in the OD.
    pub fn to_u32(&self) -> UNSIGNED32 {
        ((self.index as UNSIGNED32) << 16)
            | ((self.sub_index as UNSIGNED32) << 8)
            | (self.length_bits as UNSIGNED32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdo_mapping_entry_layout() {
        let entry = PdoMappingEntry::new(0x2500, 31, 32);
        // Index [0x2500] @ 16 | SubIndex [0x1F] @ 8 | Length [0x20] @ 0
        assert_eq!(entry.to_u32(), 0x2500_1F20);
        assert_eq!(PdoMappingEntry::from_u32(0x6000_0108), PdoMappingEntry::new(0x6000, 1, 8));
    }
}
