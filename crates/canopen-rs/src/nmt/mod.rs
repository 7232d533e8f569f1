use self::states::{NmtCommand, NmtState, ResetScope};
use crate::types::NodeId;
use log::{info, warn};

pub mod states;

/// Manages the NMT state of a CANopen node.
#[derive(Debug, Clone)]
pub struct NmtStateMachine {
    pub current_state: NmtState,
    pub node_id: NodeId,
}

impl NmtStateMachine {
    /// Creates a new NMT state machine for a node.
    pub fn new(node_id: NodeId) -> Self {
        // All nodes start in the Initialising state after power on.
        Self {
            current_state: NmtState::Initialising,
            node_id,
        }
    }

    /// Completes initialisation and enters PreOperational.
    pub fn boot(&mut self) {
        if self.current_state == NmtState::Initialising {
            self.transition(NmtState::PreOperational);
        }
    }

    /// Processes an NMT command and transitions the state accordingly.
    ///
    /// Returns the part of the dictionary the caller has to reset, if any.
    /// A reset passes through Initialising and ends in PreOperational.
    pub fn process_command(&mut self, command: NmtCommand) -> Option<ResetScope> {
        let (next_state, reset) = match (self.current_state, command) {
            (_, NmtCommand::ResetNode) => (NmtState::PreOperational, Some(ResetScope::Application)),
            (_, NmtCommand::ResetCommunication) => {
                (NmtState::PreOperational, Some(ResetScope::Communication))
            }
            (NmtState::Initialising, _) => {
                warn!("NMT command {:?} ignored while initialising", command);
                (NmtState::Initialising, None)
            }
            (_, NmtCommand::StartRemoteNode) => (NmtState::Operational, None),
            (_, NmtCommand::StopRemoteNode) => (NmtState::Stopped, None),
            (_, NmtCommand::EnterPreOperational) => (NmtState::PreOperational, None),
        };
        if reset.is_some() {
            self.transition(NmtState::Initialising);
        }
        self.transition(next_state);
        reset
    }

    /// SDO access to the dictionary is only served in PreOperational and Operational.
    pub fn allows_sdo(&self) -> bool {
        matches!(
            self.current_state,
            NmtState::PreOperational | NmtState::Operational
        )
    }

    fn transition(&mut self, next_state: NmtState) {
        if next_state != self.current_state {
            info!(
                "[NMT] Node {}: {:?} -> {:?}",
                self.node_id.0, self.current_state, next_state
            );
            self.current_state = next_state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booted() -> NmtStateMachine {
        let mut nmt = NmtStateMachine::new(NodeId(5));
        nmt.boot();
        nmt
    }

    #[test]
    fn test_boot_enters_pre_operational() {
        let mut nmt = NmtStateMachine::new(NodeId(5));
        assert_eq!(nmt.current_state, NmtState::Initialising);
        assert!(!nmt.allows_sdo());
        nmt.boot();
        assert_eq!(nmt.current_state, NmtState::PreOperational);
    }

    #[test]
    fn test_start_stop_cycle() {
        let mut nmt = booted();
        assert_eq!(nmt.process_command(NmtCommand::StartRemoteNode), None);
        assert_eq!(nmt.current_state, NmtState::Operational);
        assert!(nmt.allows_sdo());

        nmt.process_command(NmtCommand::StopRemoteNode);
        assert_eq!(nmt.current_state, NmtState::Stopped);
        assert!(!nmt.allows_sdo());

        nmt.process_command(NmtCommand::EnterPreOperational);
        assert_eq!(nmt.current_state, NmtState::PreOperational);
    }

    #[test]
    fn test_resets_report_scope() {
        let mut nmt = booted();
        nmt.process_command(NmtCommand::StopRemoteNode);
        assert_eq!(
            nmt.process_command(NmtCommand::ResetCommunication),
            Some(ResetScope::Communication)
        );
        assert_eq!(nmt.current_state, NmtState::PreOperational);
        assert_eq!(
            nmt.process_command(NmtCommand::ResetNode),
            Some(ResetScope::Application)
        );
        assert_eq!(nmt.current_state, NmtState::PreOperational);
    }

    #[test]
    fn test_command_specifiers() {
        for cs in [0x01, 0x02, 0x80, 0x81, 0x82] {
            assert_eq!(NmtCommand::from_cs(cs).map(NmtCommand::cs), Some(cs));
        }
        assert_eq!(NmtCommand::from_cs(0x03), None);
    }
}
