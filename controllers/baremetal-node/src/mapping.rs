//! Mapping between declared parameters and Ironic node attributes

use crate::error::ControllerError;
use ironic_client::{Node, NodeCreateRequest};
use node_spec::{BaremetalNodeSpec, DriverInfo, NodeProperties};
use serde_json::{Map, Value};

/// Rename declared properties to Ironic's names, dropping unset ones
pub fn map_properties(properties: &NodeProperties) -> Map<String, Value> {
    properties
        .native_entries()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Flatten the driver_info groups; console, management and deploy are
/// layered over power in that order.
pub fn merge_driver_info(driver_info: &DriverInfo) -> Result<Map<String, Value>, ControllerError> {
    let power = match &driver_info.power {
        Some(power) if !driver_info.power_is_empty() => power,
        _ => {
            return Err(ControllerError::Validation(
                "driver_info['power'] is required".to_string(),
            ));
        }
    };

    let mut merged = power.clone();
    for group in driver_info.overlays() {
        merged.extend(group.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Ok(merged)
}

/// The updatable subset of a node, in the shape used for both create and diff
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub driver: String,
    pub properties: Map<String, Value>,
    pub driver_info: Map<String, Value>,
    pub name: Option<String>,
    /// Compared only when set
    pub chassis_uuid: Option<String>,
}

impl NodeConfig {
    /// Configuration the parameters ask for
    pub fn desired(spec: &BaremetalNodeSpec) -> Result<Self, ControllerError> {
        let driver = spec.driver.clone().ok_or_else(|| {
            ControllerError::Validation(
                "A driver must be defined in order to set a node to present.".to_string(),
            )
        })?;

        Ok(Self {
            driver,
            properties: map_properties(&spec.properties),
            driver_info: merge_driver_info(&spec.driver_info)?,
            name: spec.name.clone(),
            chassis_uuid: spec.chassis_uuid.clone().filter(|c| !c.is_empty()),
        })
    }

    /// Configuration Ironic currently holds
    pub fn current(node: &Node) -> Self {
        Self {
            driver: node.driver.clone(),
            properties: node.properties.clone(),
            driver_info: node.driver_info.clone(),
            name: node.name.clone(),
            chassis_uuid: node.chassis_uuid.clone(),
        }
    }

    /// JSON document the patch diff runs over. `name` is always present
    /// (null when unset); `chassis_uuid` only when set.
    pub fn to_value(&self) -> Value {
        let mut document = Map::new();
        document.insert("driver".to_string(), Value::String(self.driver.clone()));
        document.insert("properties".to_string(), Value::Object(self.properties.clone()));
        document.insert("driver_info".to_string(), Value::Object(self.driver_info.clone()));
        document.insert(
            "name".to_string(),
            self.name.clone().map_or(Value::Null, Value::String),
        );
        if let Some(chassis_uuid) = &self.chassis_uuid {
            document.insert("chassis_uuid".to_string(), Value::String(chassis_uuid.clone()));
        }
        Value::Object(document)
    }

    /// Body for `POST /v1/nodes`
    pub fn into_create_request(self, uuid: Option<String>) -> NodeCreateRequest {
        NodeCreateRequest {
            uuid: uuid.filter(|u| !u.is_empty()),
            name: self.name,
            driver: self.driver,
            driver_info: self.driver_info,
            properties: self.properties,
            chassis_uuid: self.chassis_uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use serde_json::json;

    #[test]
    fn test_map_properties_renames() {
        let properties = NodeProperties {
            cpu_arch: Some(json!("x86_64")),
            cpus: Some(json!(2)),
            ram: Some(json!(8192)),
            disk_size: Some(json!(64)),
            capabilities: Some(json!("boot_option:local")),
            root_device: Some(json!({"wwn": "0x4000cca77fc4dba1"})),
        };
        assert_eq!(
            Value::Object(map_properties(&properties)),
            json!({
                "cpu_arch": "x86_64",
                "cpus": 2,
                "memory_mb": 8192,
                "local_gb": 64,
                "capabilities": "boot_option:local",
                "root_device": {"wwn": "0x4000cca77fc4dba1"}
            })
        );
    }

    #[test]
    fn test_map_properties_omits_missing_ram() {
        let properties = NodeProperties {
            cpus: Some(json!(4)),
            ..Default::default()
        };
        let mapped = map_properties(&properties);
        assert!(!mapped.contains_key("memory_mb"));
        assert_eq!(mapped.len(), 1);
    }

    #[test]
    fn test_merge_driver_info_later_group_wins() {
        let driver_info = DriverInfo {
            power: object(json!({"a": 1, "b": 1})),
            management: object(json!({"a": 2})),
            ..Default::default()
        };
        let merged = merge_driver_info(&driver_info).expect("power present");
        assert_eq!(Value::Object(merged), json!({"a": 2, "b": 1}));
    }

    #[test]
    fn test_merge_driver_info_full_order() {
        let driver_info = DriverInfo {
            power: object(json!({"k": "power", "p": 1})),
            console: object(json!({"k": "console", "c": 1})),
            management: object(json!({"k": "management", "m": 1})),
            deploy: object(json!({"k": "deploy", "d": 1})),
        };
        let merged = merge_driver_info(&driver_info).expect("power present");
        assert_eq!(
            Value::Object(merged),
            json!({"k": "deploy", "p": 1, "c": 1, "m": 1, "d": 1})
        );
    }

    #[test]
    fn test_merge_driver_info_requires_power() {
        let missing = DriverInfo {
            management: object(json!({"a": 2})),
            ..Default::default()
        };
        let err = merge_driver_info(&missing).expect_err("power missing");
        assert_eq!(err.to_string(), "driver_info['power'] is required");

        let empty = DriverInfo {
            power: object(json!({})),
            ..Default::default()
        };
        assert!(merge_driver_info(&empty).is_err());
    }

    #[test]
    fn test_desired_requires_driver() {
        let mut spec = create_test_spec(Some("U1"), None);
        spec.driver = None;
        let err = NodeConfig::desired(&spec).expect_err("driver missing");
        assert_eq!(
            err.to_string(),
            "A driver must be defined in order to set a node to present."
        );
    }

    #[test]
    fn test_to_value_shape() {
        let config = NodeConfig::desired(&create_test_spec(Some("U1"), None)).expect("valid spec");
        let value = config.to_value();
        assert_eq!(value["name"], Value::Null);
        assert!(value.get("chassis_uuid").is_none());
        assert!(value.get("uuid").is_none());

        let mut spec = create_test_spec(Some("U1"), Some("node-1"));
        spec.chassis_uuid = Some("C1".to_string());
        let value = NodeConfig::desired(&spec).expect("valid spec").to_value();
        assert_eq!(value["name"], json!("node-1"));
        assert_eq!(value["chassis_uuid"], json!("C1"));
    }

    #[test]
    fn test_current_from_node() {
        let mut node = create_test_node("U1", "pxe_ipmitool");
        node.chassis_uuid = Some("C1".to_string());
        let config = NodeConfig::current(&node);
        assert_eq!(config.chassis_uuid.as_deref(), Some("C1"));
        assert_eq!(config.to_value()["driver"], json!("pxe_ipmitool"));
    }
}
