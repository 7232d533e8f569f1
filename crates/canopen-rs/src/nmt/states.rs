/// Defines the NMT states of a CANopen slave node.
/// (CiA 301, Section 7.3.2.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NmtState {
    /// Power-on or reset in progress. Left automatically once the
    /// dictionary is ready.
    #[default]
    Initialising,
    /// SDO access is possible, PDOs are not exchanged.
    PreOperational,
    /// SDO and PDO communication are active.
    Operational,
    /// Only NMT commands are processed.
    Stopped,
}

/// Node control commands sent by the NMT master.
/// (CiA 301, Section 7.2.8.3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NmtCommand {
    StartRemoteNode,
    StopRemoteNode,
    EnterPreOperational,
    ResetNode,
    ResetCommunication,
}

impl NmtCommand {
    /// Decodes the command specifier of an NMT node control frame.
    pub fn from_cs(cs: u8) -> Option<Self> {
        match cs {
            0x01 => Some(NmtCommand::StartRemoteNode),
            0x02 => Some(NmtCommand::StopRemoteNode),
            0x80 => Some(NmtCommand::EnterPreOperational),
            0x81 => Some(NmtCommand::ResetNode),
            0x82 => Some(NmtCommand::ResetCommunication),
            _ => None,
        }
    }

    pub fn cs(self) -> u8 {
        match self {
            NmtCommand::StartRemoteNode => 0x01,
            NmtCommand::StopRemoteNode => 0x02,
            NmtCommand::EnterPreOperational => 0x80,
            NmtCommand::ResetNode => 0x81,
            NmtCommand::ResetCommunication => 0x82,
        }
    }
}

/// Which part of the dictionary a reset puts back to its defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Communication profile area (1000h-1FFFh).
    Communication,
    /// Every entry with a default value.
    Application,
}
