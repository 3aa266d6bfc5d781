//! Desired node parameters

use crate::driver_info::DriverInfo;
use crate::error::SpecError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Desired state of the node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    #[default]
    Present,
    Absent,
}

/// A network interface card to register as an Ironic port
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Nic {
    /// The MAC address of the network interface card
    pub mac: String,
}

/// Physical characteristics of the server, used for scheduling
///
/// Values are kept as declared so they compare equal to what Ironic stores.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct NodeProperties {
    /// CPU architecture (x86_64, i686, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_arch: Option<Value>,

    /// Number of CPU cores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<Value>,

    /// Amount of RAM in MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<Value>,

    /// Size of the first storage device in GB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<Value>,

    /// Special capabilities, e.g. `boot_option:local`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Value>,

    /// Root disk device hints for deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_device: Option<Value>,
}

impl NodeProperties {
    /// Declared properties paired with their Ironic attribute names.
    ///
    /// Unset and null properties are skipped.
    pub fn native_entries(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        [
            ("cpu_arch", &self.cpu_arch),
            ("cpus", &self.cpus),
            ("memory_mb", &self.ram),
            ("local_gb", &self.disk_size),
            ("capabilities", &self.capabilities),
            ("root_device", &self.root_device),
        ]
        .into_iter()
        .filter_map(|(native, value)| match value {
            Some(Value::Null) | None => None,
            Some(v) => Some((native, v)),
        })
    }
}

/// Parameter document for one bare metal node
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BaremetalNodeSpec {
    /// Desired state of the node
    #[serde(default)]
    pub state: NodeState,

    /// Globally unique identifier to give the node. Takes precedence over
    /// `name` when looking the node up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// Unique name of the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ironic driver; required when `state` is `present`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,

    /// Chassis to associate the node with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis_uuid: Option<String>,

    /// Driver credentials, grouped by interface
    pub driver_info: DriverInfo,

    /// Network interface cards, registered as ports on creation
    pub nics: Vec<Nic>,

    /// Hardware properties used for scheduling
    #[serde(default)]
    pub properties: NodeProperties,

    /// Skip the update when the only change is the masked password field.
    /// Ironic never returns stored passwords, so they always look changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_update_of_masked_password: Option<bool>,

    /// Deprecated alias of `skip_update_of_masked_password`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_update_of_driver_password: Option<bool>,
}

impl BaremetalNodeSpec {
    /// Parse a YAML or JSON parameter document
    pub fn from_yaml_str(document: &str) -> Result<Self, SpecError> {
        Ok(serde_yaml::from_str(document)?)
    }

    /// Read and parse a parameter document from disk
    pub fn from_path(path: &Path) -> Result<Self, SpecError> {
        let document = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&document)
    }

    /// Identifier used to look the node up: uuid first, then name
    pub fn node_id(&self) -> Option<&str> {
        self.uuid
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.name.as_deref().filter(|s| !s.is_empty()))
    }

    /// Whether a lone masked-password change should be ignored
    pub fn skip_masked_password(&self) -> bool {
        if let Some(skip) = self.skip_update_of_masked_password {
            return skip;
        }
        match self.skip_update_of_driver_password {
            Some(skip) => {
                warn!(
                    "skip_update_of_driver_password is deprecated, use skip_update_of_masked_password"
                );
                skip
            }
            None => false,
        }
    }

    /// Check constraints the schema cannot express
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.nics.is_empty() {
            return Err(SpecError::Invalid(
                "at least one nic must be defined".to_string(),
            ));
        }
        if let Some(index) = self.nics.iter().position(|nic| nic.mac.trim().is_empty()) {
            return Err(SpecError::Invalid(format!(
                "nics[{index}].mac must not be empty"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ENROLL_EXAMPLE: &str = r#"
driver: "pxe_ipmitool"
uuid: "00000000-0000-0000-0000-000000000002"
properties:
  cpus: 2
  cpu_arch: "x86_64"
  ram: 8192
  disk_size: 64
  capabilities: "boot_option:local"
  root_device:
    wwn: "0x4000cca77fc4dba1"
nics:
  - mac: "aa:bb:cc:aa:bb:cc"
  - mac: "dd:ee:ff:dd:ee:ff"
driver_info:
  power:
    ipmi_address: "1.2.3.4"
    ipmi_username: "admin"
    ipmi_password: "adminpass"
chassis_uuid: "00000000-0000-0000-0000-000000000001"
"#;

    #[test]
    fn test_parse_enroll_example() {
        let spec = BaremetalNodeSpec::from_yaml_str(ENROLL_EXAMPLE).expect("valid document");

        assert_eq!(spec.state, NodeState::Present);
        assert_eq!(spec.driver.as_deref(), Some("pxe_ipmitool"));
        assert_eq!(spec.nics.len(), 2);
        assert_eq!(spec.nics[1].mac, "dd:ee:ff:dd:ee:ff");
        assert_eq!(spec.properties.ram, Some(json!(8192)));
        assert_eq!(
            spec.properties.root_device,
            Some(json!({"wwn": "0x4000cca77fc4dba1"}))
        );
        assert_eq!(
            spec.chassis_uuid.as_deref(),
            Some("00000000-0000-0000-0000-000000000001")
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_parse_json_document() {
        let spec = BaremetalNodeSpec::from_yaml_str(
            r#"{"state": "absent", "name": "node-1", "driver_info": {}, "nics": [{"mac": "aa:bb:cc:dd:ee:ff"}]}"#,
        )
        .expect("valid document");
        assert_eq!(spec.state, NodeState::Absent);
        assert_eq!(spec.node_id(), Some("node-1"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = BaremetalNodeSpec::from_yaml_str(
            "driver_info: {}\nnics: []\nflavor: large\n",
        );
        assert!(matches!(result, Err(SpecError::Parse(_))));
    }

    #[test]
    fn test_nics_required() {
        let result = BaremetalNodeSpec::from_yaml_str("driver_info: {}\n");
        assert!(matches!(result, Err(SpecError::Parse(_))));
    }

    #[test]
    fn test_node_id_prefers_uuid() {
        let spec = BaremetalNodeSpec {
            uuid: Some("U1".to_string()),
            name: Some("node-1".to_string()),
            ..Default::default()
        };
        assert_eq!(spec.node_id(), Some("U1"));
    }

    #[test]
    fn test_node_id_falls_back_to_name() {
        let spec = BaremetalNodeSpec {
            uuid: Some(String::new()),
            name: Some("node-1".to_string()),
            ..Default::default()
        };
        assert_eq!(spec.node_id(), Some("node-1"));
        assert_eq!(BaremetalNodeSpec::default().node_id(), None);
    }

    #[test]
    fn test_skip_masked_password_alias() {
        let spec = BaremetalNodeSpec::from_yaml_str(
            "driver_info: {}\nnics: []\nskip_update_of_driver_password: true\n",
        )
        .expect("valid document");
        assert!(spec.skip_masked_password());

        let spec = BaremetalNodeSpec {
            skip_update_of_masked_password: Some(false),
            skip_update_of_driver_password: Some(true),
            ..Default::default()
        };
        assert!(!spec.skip_masked_password(), "canonical key wins");

        assert!(!BaremetalNodeSpec::default().skip_masked_password());
    }

    #[test]
    fn test_validate_nics() {
        let spec = BaremetalNodeSpec::default();
        assert!(matches!(spec.validate(), Err(SpecError::Invalid(_))));

        let spec = BaremetalNodeSpec {
            nics: vec![
                Nic { mac: "aa:bb:cc:aa:bb:cc".to_string() },
                Nic { mac: " ".to_string() },
            ],
            ..Default::default()
        };
        let err = spec.validate().expect_err("blank mac");
        assert!(err.to_string().contains("nics[1].mac"));
    }

    #[test]
    fn test_native_entries_skip_unset() {
        let properties = NodeProperties {
            cpus: Some(json!(2)),
            ram: Some(json!(8192)),
            disk_size: Some(Value::Null),
            ..Default::default()
        };
        let entries: Vec<(&str, &Value)> = properties.native_entries().collect();
        assert_eq!(entries, vec![("cpus", &json!(2)), ("memory_mb", &json!(8192))]);
    }

    #[test]
    fn test_parameter_schema_lists_fields() {
        let schema = serde_json::to_value(crate::parameter_schema()).expect("schema serializes");
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .expect("object schema");
        assert!(properties.contains_key("driver_info"));
        assert!(properties.contains_key("skip_update_of_masked_password"));
    }
}
