use core::convert::TryFrom;
use core::fmt;

// --- Primitive Types (Based on CiA 301 Section 7.1.4) ---
// These aliases keep object dictionary definitions close to the profile wording (UNSIGNEDn).

/// Alias for BOOLEAN (stored as a single byte)
pub type BOOLEAN = bool;
/// Alias for INTEGER8 (8-bit signed integer)
pub type INTEGER8 = i8;
/// Alias for INTEGER16 (16-bit signed integer)
pub type INTEGER16 = i16;
/// Alias for INTEGER32 (32-bit signed integer)
pub type INTEGER32 = i32;
/// Alias for UNSIGNED8 (8-bit unsigned integer)
pub type UNSIGNED8 = u8;
/// Alias for UNSIGNED16 (16-bit unsigned integer)
pub type UNSIGNED16 = u16;
/// Alias for UNSIGNED32 (32-bit unsigned integer)
pub type UNSIGNED32 = u32;

/// Represents a CANopen Node ID, wrapping a `u8` to ensure type safety.
///
/// Valid Node IDs are in the range 1-127. The value 0 is reserved for
/// NMT broadcast and can never be assigned to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct NodeId(pub u8);

// --- Protocol Constants ---

/// Lowest Node ID a device may be assigned.
pub const C_NODE_ID_MIN: u8 = 1;

/// Highest Node ID a device may be assigned.
pub const C_NODE_ID_MAX: u8 = 127;

/// Maximum payload of a classic CAN frame, in bits (8 bytes).
pub const C_PDO_MAX_PAYLOAD_BITS: u32 = 64;

/// Maximum number of mapping entries a PDO can be configured with.
/// With a granularity of 8 bits, 8 entries already fill a classic CAN frame.
pub const C_PDO_MAX_MAPPING_ENTRIES: u8 = 8;

/// Error type for invalid Node ID creation.
#[derive(Debug, PartialEq, Eq)]
pub enum NodeIdError {
    /// Node ID is outside the valid range (1-127).
    InvalidRange(u8),
}

impl fmt::Display for NodeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeIdError::InvalidRange(value) => {
                write!(f, "Invalid NodeId value: {}. Valid range is 1-127.", value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NodeIdError {}

impl TryFrom<u8> for NodeId {
    type Error = NodeIdError;

    /// Creates a `NodeId` from a `u8`, returning an error if the value is not a valid
    /// CANopen node identifier.
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            C_NODE_ID_MIN..=C_NODE_ID_MAX => Ok(NodeId(value)),
            _ => Err(NodeIdError::InvalidRange(value)),
        }
    }
}

impl From<NodeId> for u8 {
    fn from(node_id: NodeId) -> Self {
        node_id.0
    }
}
