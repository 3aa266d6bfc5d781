//! Test utilities for unit testing the reconciler
//!
//! This module provides helpers for creating test data and setting up test scenarios.

use crate::reconciler::Reconciler;
use ironic_client::{MockIronicClient, Node};
use node_spec::{BaremetalNodeSpec, DriverInfo, Nic, NodeProperties};
use serde_json::{json, Map, Value};

/// Turn a `json!` object literal into a driver_info group
pub fn object(value: Value) -> Option<Map<String, Value>> {
    value.as_object().cloned()
}

/// Helper to create the parameters of a basic IPMI node
pub fn create_test_spec(uuid: Option<&str>, name: Option<&str>) -> BaremetalNodeSpec {
    BaremetalNodeSpec {
        uuid: uuid.map(str::to_string),
        name: name.map(str::to_string),
        driver: Some("pxe_ipmitool".to_string()),
        driver_info: DriverInfo {
            power: object(json!({"ipmi_address": "1.2.3.4"})),
            ..Default::default()
        },
        nics: vec![Nic {
            mac: "aa:bb:cc:aa:bb:cc".to_string(),
        }],
        properties: NodeProperties {
            cpus: Some(json!(2)),
            ram: Some(json!(8192)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Helper to create a node as Ironic would store it for `create_test_spec`
pub fn create_test_node(uuid: &str, driver: &str) -> Node {
    Node {
        uuid: uuid.to_string(),
        name: None,
        driver: driver.to_string(),
        driver_info: object(json!({"ipmi_address": "1.2.3.4"})).unwrap_or_default(),
        properties: object(json!({"cpus": 2, "memory_mb": 8192})).unwrap_or_default(),
        extra: Map::new(),
        chassis_uuid: None,
        provision_state: Some("manageable".to_string()),
        power_state: Some("power off".to_string()),
        maintenance: false,
        created_at: None,
        updated_at: None,
    }
}

/// Helper to create a reconciler sharing state with the returned mock
pub fn create_test_reconciler() -> (Reconciler, MockIronicClient) {
    let mock = MockIronicClient::new("http://test-ironic:6385");
    let reconciler = Reconciler::new(Box::new(mock.clone()));
    (reconciler, mock)
}
