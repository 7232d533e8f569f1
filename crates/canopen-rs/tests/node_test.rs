// crates/canopen-rs/tests/node_test.rs

mod harness;

mod tests {
    use super::harness::{APP_U8_A, NodeBuilder, init_logging, mapping};

    use canopen_rs::od::constants::{
        IDX_RESTORE_PARAM_REC, IDX_STORE_PARAM_REC, SIGNATURE_LOAD, SIGNATURE_SAVE,
    };
    use canopen_rs::od::{AccessType, ObjectDictionary, ObjectEntry, ObjectValue, utils};
    use canopen_rs::{
        NmtCommand, NmtState, Node, NodeConfig, NodeId, ObjectDictionaryStorage, OdError,
        SdoAbortCode,
    };
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use std::thread;

    // --- In-memory storage backend ---
    #[derive(Default)]
    struct MemoryStorage {
        params: BTreeMap<(u16, u8), ObjectValue>,
        restore_requested: bool,
    }
    impl ObjectDictionaryStorage for MemoryStorage {
        fn load(&mut self) -> Result<BTreeMap<(u16, u8), ObjectValue>, OdError> {
            Ok(self.params.clone())
        }
        fn save(&mut self, params: &BTreeMap<(u16, u8), ObjectValue>) -> Result<(), OdError> {
            self.params.extend(params.iter().map(|(k, v)| (*k, *v)));
            Ok(())
        }
        fn clear(&mut self) -> Result<(), OdError> {
            self.params.clear();
            Ok(())
        }
        fn restore_defaults_requested(&self) -> bool {
            self.restore_requested
        }
        fn request_restore_defaults(&mut self) -> Result<(), OdError> {
            self.restore_requested = true;
            Ok(())
        }
        fn clear_restore_defaults_flag(&mut self) -> Result<(), OdError> {
            self.restore_requested = false;
            Ok(())
        }
    }

    fn storable_node(storage: &mut MemoryStorage) -> Node<'_> {
        let config = NodeConfig::new(NodeId(4));
        let mut od = ObjectDictionary::new(Some(storage));
        utils::insert_mandatory_objects(&mut od, utils::DEFAULT_DEVICE_TYPE, [1, 2, 3, 4]).unwrap();
        od.insert(
            0x6000,
            1,
            ObjectEntry::variable("Setpoint", AccessType::ReadWriteStore, ObjectValue::Integer16(0)),
        )
        .unwrap();
        Node::new(config, od).unwrap()
    }

    #[test]
    fn stopped_node_rejects_writes() {
        let mut node = NodeBuilder::new().rpdo(0, 0x4000_0201, 1).build();
        assert_eq!(node.nmt_state(), NmtState::PreOperational);

        node.apply_nmt_command(NmtCommand::StopRemoteNode);
        assert_eq!(node.write_u32(0x1400, 1, 0xC000_0201), Err(OdError::DeviceState));
        assert_eq!(
            node.take_error().map(|e| e.error.abort_code()),
            Some(SdoAbortCode::DeviceStateConflict as u32)
        );
        assert_eq!(node.read_u32(0x1400, 1), Ok(0x4000_0201));

        node.apply_nmt_command(NmtCommand::StartRemoteNode);
        assert_eq!(node.write_u32(0x1400, 1, 0xC000_0201), Ok(()));
    }

    #[test]
    fn reset_node_restores_application_values() {
        let mut node = NodeBuilder::new()
            .rpdo(0, 0xC000_0201, 2)
            .with_app_objects()
            .build();
        node.write_u8(APP_U8_A.0, APP_U8_A.1, 7).unwrap();
        node.write_u32(0x1600, 1, mapping(APP_U8_A, 8)).unwrap();
        node.write_u8(0x1600, 0, 1).unwrap();

        node.apply_nmt_command(NmtCommand::ResetCommunication);
        assert_eq!(node.read_u8(0x1600, 0), Ok(0));
        assert_eq!(node.read_u8(APP_U8_A.0, APP_U8_A.1), Ok(7));

        node.apply_nmt_command(NmtCommand::ResetNode);
        assert_eq!(node.read_u8(APP_U8_A.0, APP_U8_A.1), Ok(0));
        assert_eq!(node.nmt_state(), NmtState::PreOperational);
    }

    #[test]
    fn sdo_download_bytes() {
        let mut node = NodeBuilder::new().rpdo(0, 0x4000_0201, 1).build();
        assert_eq!(
            node.write_bytes(0x1400, 1, &[0x01, 0x02, 0x00, 0xC0]),
            Ok(())
        );
        assert_eq!(node.read_u32(0x1400, 1), Ok(0xC000_0201));
        // Wrong payload width for an UNSIGNED32.
        assert_eq!(
            node.write_bytes(0x1400, 1, &[0x01, 0x02]),
            Err(OdError::TypeMismatch)
        );
        assert_eq!(
            node.last_error().map(|e| SdoAbortCode::from(e.error)),
            Some(SdoAbortCode::TypeMismatch)
        );
    }

    #[test]
    fn store_and_reload_parameters() {
        init_logging();
        let mut storage = MemoryStorage::default();
        {
            let mut node = storable_node(&mut storage);
            node.write(0x6000, 1, ObjectValue::Integer16(-300)).unwrap();
            assert!(matches!(
                node.write_u32(IDX_STORE_PARAM_REC, 3, 0xDEAD_BEEF),
                Err(OdError::StorageError(_))
            ));
            node.write_u32(IDX_STORE_PARAM_REC, 3, SIGNATURE_SAVE).unwrap();
        }
        assert_eq!(
            storage.params.get(&(0x6000, 1)),
            Some(&ObjectValue::Integer16(-300))
        );

        {
            let node = storable_node(&mut storage);
            assert_eq!(node.read(0x6000, 1), Ok(ObjectValue::Integer16(-300)));
        }

        {
            let mut node = storable_node(&mut storage);
            node.write_u32(IDX_RESTORE_PARAM_REC, 1, SIGNATURE_LOAD).unwrap();
        }
        let node = storable_node(&mut storage);
        assert_eq!(node.read(0x6000, 1), Ok(ObjectValue::Integer16(0)));
    }

    #[test]
    fn independent_nodes_share_nothing() {
        let mut a = NodeBuilder::new().rpdo(0, 0x4000_0201, 1).build();
        let b = NodeBuilder::new().rpdo(0, 0x4000_0201, 1).build();
        a.write_u32(0x1400, 1, 0xC000_0201).unwrap();
        assert_eq!(b.read_u32(0x1400, 1), Ok(0x4000_0201));
    }

    #[test]
    fn concurrent_writers_observe_one_winner() {
        let node = Arc::new(Mutex::new(
            NodeBuilder::new().rpdo(0, 0xC000_0201, 1).build(),
        ));

        // Every thread tries to activate the PDO with its own identifier.
        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let node = Arc::clone(&node);
                thread::spawn(move || {
                    let mut node = node.lock().unwrap();
                    node.write_u32(0x1400, 1, 0x4000_0210 + i).is_ok()
                })
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(accepted, 1);
        let committed = node.lock().unwrap().read_u32(0x1400, 1).unwrap();
        assert!((0x4000_0210..0x4000_0218).contains(&committed));
    }

    #[test]
    fn predefined_connection_set() {
        let config = NodeConfig::predefined_connection_set(NodeId(0x22));
        let od = utils::new_default(config.node_id, &config.pdos).unwrap();
        let node = Node::new(config, od).unwrap();

        assert_eq!(node.read_u32(0x1400, 1), Ok(0x4000_0222));
        assert_eq!(node.read_u32(0x1403, 1), Ok(0x4000_0522));
        assert_eq!(node.read_u32(0x1800, 1), Ok(0x4000_01A2));
        assert_eq!(node.read_u32(0x1803, 1), Ok(0x4000_04A2));
        assert_eq!(node.od().pdo_configs().count(), 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn node_config_from_json() {
        use canopen_rs::pdo::{PdoConfig, PdoRole};

        let json = r#"{
            "node_id": 5,
            "pdos": [
                { "role": "receive", "number": 0, "max_mapping_entries": 4 },
                { "role": "transmit", "number": 2, "max_mapping_entries": 8 }
            ]
        }"#;
        let config: NodeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.node_id, NodeId(5));
        assert_eq!(config.pdos[1], PdoConfig::new(PdoRole::Transmit, 2, 8));

        let od = utils::new_default(config.node_id, &config.pdos).unwrap();
        let node = Node::new(config, od).unwrap();
        assert_eq!(node.read_u32(0x1802, 1), Ok(0x4000_0385));

        let bad_id = r#"{ "node_id": 0, "pdos": [] }"#;
        assert!(serde_json::from_str::<NodeConfig>(bad_id).is_err());
    }
}
