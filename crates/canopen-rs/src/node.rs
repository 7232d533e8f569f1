use crate::nmt::NmtStateMachine;
use crate::nmt::states::{NmtCommand, NmtState, ResetScope};
use crate::od::{ObjectDictionary, ObjectValue};
use crate::pdo::{PdoConfig, PdoRole};
use crate::types::NodeId;
use crate::OdError;
use alloc::vec::Vec;
use log::{info, warn};

/// Static configuration of a node: its identifier and PDO layout.
///
/// With the `serde` feature enabled this can be loaded from a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConfig {
    pub node_id: NodeId,
    pub pdos: Vec<PdoConfig>,
}

impl NodeConfig {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            pdos: Vec::new(),
        }
    }

    pub fn with_pdo(mut self, pdo: PdoConfig) -> Self {
        self.pdos.push(pdo);
        self
    }

    /// RPDO1-4 and TPDO1-4 of the predefined connection set, eight mapping
    /// entries each.
    pub fn predefined_connection_set(node_id: NodeId) -> Self {
        let mut config = Self::new(node_id);
        for role in [PdoRole::Receive, PdoRole::Transmit] {
            for number in 0..4 {
                config.pdos.push(PdoConfig::new(role, number, 8));
            }
        }
        config
    }
}

/// A rejected write, kept for later inspection by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeError {
    pub index: u16,
    pub sub_index: u8,
    pub error: OdError,
}

/// A CANopen node: its Object Dictionary plus the NMT state that gates
/// access to it.
///
/// All access from the network goes through the node. Each operation takes
/// `&mut self`, so a write is validated and committed as one step; callers
/// sharing a node between threads wrap it in their own lock.
pub struct Node<'s> {
    od: ObjectDictionary<'s>,
    nmt: NmtStateMachine,
    last_error: Option<NodeError>,
}

impl<'s> Node<'s> {
    /// Creates a new node.
    ///
    /// The application is responsible for creating and populating the Object
    /// Dictionary (see [`crate::od::utils`]) before passing it to this
    /// constructor. Every PDO in `config` is registered with the dictionary
    /// and must have its COB-ID and mapping count objects present.
    pub fn new(config: NodeConfig, mut od: ObjectDictionary<'s>) -> Result<Self, OdError> {
        info!("Creating node {}.", config.node_id.0);
        // Initialise the OD, which involves loading from storage or applying defaults.
        od.init()?;
        od.validate_mandatory_objects()?;

        for pdo in config.pdos {
            od.register_pdo(pdo)?;
            od.pdo_cob_id(&pdo)?;
            if !od.contains(pdo.mapping_index(), 0) {
                warn!(
                    "{:?} PDO {} has no mapping parameter at {:#06X}",
                    pdo.role,
                    pdo.number + 1,
                    pdo.mapping_index()
                );
                return Err(OdError::MissingMapObject);
            }
        }

        let mut nmt = NmtStateMachine::new(config.node_id);
        nmt.boot();
        Ok(Self {
            od,
            nmt,
            last_error: None,
        })
    }

    pub fn node_id(&self) -> NodeId {
        self.nmt.node_id
    }

    pub fn nmt_state(&self) -> NmtState {
        self.nmt.current_state
    }

    /// Read-only view of the dictionary.
    pub fn od(&self) -> &ObjectDictionary<'s> {
        &self.od
    }

    /// Applies an NMT node control command, resetting the dictionary if the
    /// command requires it.
    pub fn apply_nmt_command(&mut self, command: NmtCommand) {
        match self.nmt.process_command(command) {
            Some(ResetScope::Communication) => {
                info!("Restoring communication parameters to defaults.");
                self.od.restore_defaults_in(0x1000..=0x1FFF);
            }
            Some(ResetScope::Application) => {
                info!("Restoring all parameters to defaults.");
                self.od.restore_defaults_in(0x0000..=0xFFFF);
            }
            None => {}
        }
    }

    pub fn read(&self, index: u16, sub_index: u8) -> Result<ObjectValue, OdError> {
        self.od.read(index, sub_index)
    }

    pub fn read_u8(&self, index: u16, sub_index: u8) -> Result<u8, OdError> {
        self.od.read_u8(index, sub_index)
    }

    pub fn read_u16(&self, index: u16, sub_index: u8) -> Result<u16, OdError> {
        self.od.read_u16(index, sub_index)
    }

    pub fn read_u32(&self, index: u16, sub_index: u8) -> Result<u32, OdError> {
        self.od.read_u32(index, sub_index)
    }

    /// Writes a value received from the network.
    ///
    /// On rejection nothing is committed and the error is recorded as the
    /// node's last error.
    pub fn write(&mut self, index: u16, sub_index: u8, value: ObjectValue) -> Result<(), OdError> {
        self.check_writable()
            .and_then(|()| self.od.write(index, sub_index, value))
            .inspect_err(|&error| self.record_error(index, sub_index, error))
    }

    pub fn write_u8(&mut self, index: u16, sub_index: u8, value: u8) -> Result<(), OdError> {
        self.write(index, sub_index, ObjectValue::Unsigned8(value))
    }

    pub fn write_u16(&mut self, index: u16, sub_index: u8, value: u16) -> Result<(), OdError> {
        self.write(index, sub_index, ObjectValue::Unsigned16(value))
    }

    pub fn write_u32(&mut self, index: u16, sub_index: u8, value: u32) -> Result<(), OdError> {
        self.write(index, sub_index, ObjectValue::Unsigned32(value))
    }

    /// Writes a little-endian payload as received in an SDO download.
    pub fn write_bytes(&mut self, index: u16, sub_index: u8, data: &[u8]) -> Result<(), OdError> {
        self.check_writable()
            .and_then(|()| self.od.write_bytes(index, sub_index, data))
            .inspect_err(|&error| self.record_error(index, sub_index, error))
    }

    /// The most recent rejected write, if any.
    pub fn last_error(&self) -> Option<NodeError> {
        self.last_error
    }

    /// Returns and clears the most recent rejected write.
    pub fn take_error(&mut self) -> Option<NodeError> {
        self.last_error.take()
    }

    fn check_writable(&self) -> Result<(), OdError> {
        if self.nmt.allows_sdo() {
            Ok(())
        } else {
            Err(OdError::DeviceState)
        }
    }

    fn record_error(&mut self, index: u16, sub_index: u8, error: OdError) {
        warn!(
            "Write to {:#06X}/{:#04X} failed: {} (abort code {:#010X})",
            index,
            sub_index,
            error,
            error.abort_code()
        );
        self.last_error = Some(NodeError {
            index,
            sub_index,
            error,
        });
    }
}
