// crates/canopen-rs/tests/harness/mod.rs
#![allow(dead_code)]

use canopen_rs::od::utils::{self, insert_pdo_objects};
use canopen_rs::od::{AccessType, ObjectDictionary, ObjectEntry, ObjectValue, PdoHook};
use canopen_rs::pdo::{CobId, PdoConfig, PdoRole, TransmissionType};
use canopen_rs::{Node, NodeConfig, NodeId};

/// Node id of every node built by the harness.
pub const NODE_ID: u8 = 1;

/// Application objects provided by [`NodeBuilder::with_app_objects`].
pub const APP_U8_A: (u16, u8) = (0x2500, 31);
pub const APP_U8_B: (u16, u8) = (0x2500, 32);
pub const APP_U8_C: (u16, u8) = (0x2500, 33);
pub const APP_READ_ONLY: (u16, u8) = (0x2501, 4);
pub const APP_WRITE_ONLY: (u16, u8) = (0x2501, 5);
pub const APP_NOT_MAPPABLE: (u16, u8) = (0x2510, 3);
pub const APP_NONEXISTENT: (u16, u8) = (0x2700, 3);

/// Installs `env_logger` so `RUST_LOG=trace cargo test` shows the dictionary's log output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Encodes a mapping entry the way it is written to 1600h/1A00h.
pub fn mapping(target: (u16, u8), bits: u8) -> u32 {
    (target.0 as u32) << 16 | (target.1 as u32) << 8 | bits as u32
}

/// Builds a node the way the device tests set one up: mandatory objects
/// first, then the PDO parameter blocks and application objects, and
/// finally the node itself.
pub struct NodeBuilder {
    config: NodeConfig,
    od: ObjectDictionary<'static>,
}

impl NodeBuilder {
    pub fn new() -> Self {
        init_logging();
        let node_id = NodeId(NODE_ID);
        let od = utils::new_default(node_id, &[]).expect("mandatory objects");
        Self {
            config: NodeConfig::new(node_id),
            od,
        }
    }

    /// Adds RPDO `number` with the given COB-ID and mapping slots.
    pub fn rpdo(self, number: u16, cob_id: u32, max_entries: u8) -> Self {
        self.pdo(PdoConfig::new(PdoRole::Receive, number, max_entries), cob_id)
    }

    /// Adds TPDO `number` with the given COB-ID and mapping slots.
    pub fn tpdo(self, number: u16, cob_id: u32, max_entries: u8) -> Self {
        self.pdo(PdoConfig::new(PdoRole::Transmit, number, max_entries), cob_id)
    }

    /// Adds only the parameter objects of a PDO, without registering it.
    pub fn unregistered_pdo_objects(mut self, config: PdoConfig, cob_id: u32) -> Self {
        insert_pdo_objects(
            &mut self.od,
            &config,
            CobId(cob_id),
            TransmissionType::EventProfile,
        )
        .expect("pdo objects");
        self
    }

    fn pdo(mut self, config: PdoConfig, cob_id: u32) -> Self {
        self = self.unregistered_pdo_objects(config, cob_id);
        self.config.pdos.push(config);
        self
    }

    pub fn with_app_objects(self) -> Self {
        let rw = |name: &'static str| {
            ObjectEntry::variable(name, AccessType::ReadWrite, ObjectValue::Unsigned8(0)).mappable()
        };
        self.object(APP_U8_A, rw("AppVarA"))
            .object(APP_U8_B, rw("AppVarB"))
            .object(APP_U8_C, rw("AppVarC"))
            .object(
                APP_READ_ONLY,
                ObjectEntry::variable("AppInput", AccessType::ReadOnly, ObjectValue::Unsigned32(0))
                    .mappable(),
            )
            .object(
                APP_WRITE_ONLY,
                ObjectEntry::variable(
                    "AppCommand",
                    AccessType::WriteOnly,
                    ObjectValue::Unsigned32(0),
                )
                .mappable(),
            )
            .object(
                APP_NOT_MAPPABLE,
                ObjectEntry::variable("AppPrivate", AccessType::ReadWrite, ObjectValue::Unsigned8(0)),
            )
    }

    /// Places a PDO rule on an arbitrary object, as a misconfigured table would.
    pub fn hook_at(self, target: (u16, u8), hook: PdoHook, value: ObjectValue) -> Self {
        self.object(
            target,
            ObjectEntry::hooked("Misplaced", AccessType::ReadWrite, hook, value),
        )
    }

    pub fn object(mut self, target: (u16, u8), entry: ObjectEntry) -> Self {
        self.od.insert(target.0, target.1, entry).expect("unique object");
        self
    }

    pub fn build(self) -> Node<'static> {
        Node::new(self.config, self.od).expect("node creation")
    }
}
