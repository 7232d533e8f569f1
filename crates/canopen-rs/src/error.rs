use crate::types::NodeIdError;
use core::array::TryFromSliceError;
use core::fmt;

/// Defines the error type returned by every Object Dictionary operation.
///
/// The first group of variants describes a bad dynamic value or request,
/// the second group (`MissingComObject`, `MissingMapObject`, `ParaIdx`)
/// a malformed static dictionary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdError {
    /// No entry exists for the requested index/sub-index.
    NoObject,
    /// The operation is not permitted on this entry in its current state.
    Access,
    /// The value violates a protocol-mandated bit pattern or an immutability rule.
    Range,
    /// The value's type or width does not match the entry's data type.
    TypeMismatch,
    /// A mapping entry references an object that is missing, not mappable,
    /// or lacks the access direction required by the PDO.
    MapType,
    /// The mapping count or the summed mapping length exceeds the PDO limits.
    MapLen,
    /// A COB-ID hook is placed where no PDO communication parameter exists.
    MissingComObject,
    /// A mapping hook is placed where no PDO mapping parameter exists.
    MissingMapObject,
    /// A communication parameter hook sits on the wrong index or sub-index.
    ParaIdx,
    /// The node's NMT state does not allow the operation.
    DeviceState,
    /// An entry with the same index/sub-index is already present.
    DuplicateObject,
    /// A PDO configuration is out of range or registered twice.
    InvalidPdoConfig,
    /// Raw data could not be converted to the entry's data type.
    SliceConversion,
    /// An error occurred in the parameter storage backend.
    StorageError(&'static str),
}

impl fmt::Display for OdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoObject => write!(f, "Object does not exist in the object dictionary"),
            Self::Access => write!(f, "Access to the object is not permitted"),
            Self::Range => write!(f, "Value is outside the permitted range"),
            Self::TypeMismatch => write!(f, "Value type does not match the object's data type"),
            Self::MapType => write!(f, "Object cannot be mapped into this PDO"),
            Self::MapLen => write!(f, "PDO mapping exceeds the PDO length"),
            Self::MissingComObject => write!(f, "PDO communication parameter object is missing"),
            Self::MissingMapObject => write!(f, "PDO mapping parameter object is missing"),
            Self::ParaIdx => write!(f, "Parameter hook is placed on a wrong index or sub-index"),
            Self::DeviceState => write!(f, "Operation not permitted in the present device state"),
            Self::DuplicateObject => write!(f, "Object is already present in the dictionary"),
            Self::InvalidPdoConfig => write!(f, "Invalid PDO configuration"),
            Self::SliceConversion => write!(f, "Failed to convert slice to a fixed-size array"),
            Self::StorageError(s) => write!(f, "Storage error: {}", s),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OdError {}

impl OdError {
    /// Returns the SDO abort code reported back to the client for this error.
    pub fn abort_code(&self) -> u32 {
        SdoAbortCode::from(*self) as u32
    }

    /// True for the variants signalling a malformed static dictionary table
    /// rather than a bad value.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            Self::MissingComObject | Self::MissingMapObject | Self::ParaIdx
        )
    }
}

impl From<TryFromSliceError> for OdError {
    fn from(_: TryFromSliceError) -> Self {
        OdError::SliceConversion
    }
}

impl From<NodeIdError> for OdError {
    fn from(_: NodeIdError) -> Self {
        OdError::Range
    }
}

/// SDO abort codes (CiA 301, Table 22) used to report rejected accesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SdoAbortCode {
    UnsupportedAccess = 0x0601_0000,
    ObjectDoesNotExist = 0x0602_0000,
    ObjectCannotBeMapped = 0x0604_0041,
    MappingLengthExceeded = 0x0604_0042,
    TypeMismatch = 0x0607_0010,
    SubIndexDoesNotExist = 0x0609_0011,
    ValueRangeExceeded = 0x0609_0030,
    GeneralError = 0x0800_0000,
    DataCannotBeStored = 0x0800_0020,
    DeviceStateConflict = 0x0800_0022,
}

impl From<OdError> for SdoAbortCode {
    fn from(error: OdError) -> Self {
        match error {
            OdError::NoObject => SdoAbortCode::ObjectDoesNotExist,
            OdError::Access => SdoAbortCode::UnsupportedAccess,
            OdError::Range => SdoAbortCode::ValueRangeExceeded,
            OdError::TypeMismatch | OdError::SliceConversion => SdoAbortCode::TypeMismatch,
            OdError::MapType => SdoAbortCode::ObjectCannotBeMapped,
            OdError::MapLen => SdoAbortCode::MappingLengthExceeded,
            OdError::ParaIdx => SdoAbortCode::SubIndexDoesNotExist,
            OdError::DeviceState => SdoAbortCode::DeviceStateConflict,
            OdError::StorageError(_) => SdoAbortCode::DataCannotBeStored,
            OdError::MissingComObject
            | OdError::MissingMapObject
            | OdError::DuplicateObject
            | OdError::InvalidPdoConfig => SdoAbortCode::GeneralError,
        }
    }
}
