#![cfg_attr(not(feature = "std"), no_std)]

// 'alloc' is used for the dictionary tables (BTreeMap) and SDO payloads (Vec<u8>)
extern crate alloc;

// --- Foundation Modules ---
pub mod error;
pub mod types;

// --- Node Abstraction ---
pub mod node;

// --- Higher Layers ---
pub mod nmt;
pub mod od;
pub mod pdo;

// --- Top-level Exports ---
pub use error::{OdError, SdoAbortCode};
pub use nmt::states::{NmtCommand, NmtState};
pub use node::{Node, NodeConfig, NodeError};
pub use od::{ObjectDictionary, ObjectDictionaryStorage, ObjectValue};
pub use pdo::{CobId, PdoConfig, PdoRole};
pub use types::NodeId;
