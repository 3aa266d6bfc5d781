//! Ironic API models
//!
//! These models match the Ironic v1 REST API representations.
//! See: ironic/api/controllers/v1/node.py and port.py

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provision states in which a node must not be unregistered
pub const UNREGISTER_BLOCKED_STATES: &[&str] = &["active", "cleaning", "clean wait", "clean failed"];

/// Value Ironic returns in place of a stored secret
pub const MASKED_SECRET: &str = "******";

/// Node as returned by `GET /v1/nodes/{node_ident}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
    pub driver: String,
    #[serde(default)]
    pub driver_info: Map<String, Value>,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub extra: Map<String, Value>,
    /// Absent on nodes not associated with a chassis
    #[serde(default)]
    pub chassis_uuid: Option<String>,
    #[serde(default)]
    pub provision_state: Option<String>,
    #[serde(default)]
    pub power_state: Option<String>,
    #[serde(default)]
    pub maintenance: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Node {
    /// Whether the node's provision state allows removing it
    pub fn can_unregister(&self) -> bool {
        self.provision_state
            .as_deref()
            .is_none_or(|state| !UNREGISTER_BLOCKED_STATES.contains(&state))
    }
}

/// Request body for `POST /v1/nodes`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NodeCreateRequest {
    /// Explicit UUID; Ironic generates one when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub driver: String,
    pub driver_info: Map<String, Value>,
    pub properties: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chassis_uuid: Option<String>,
}

/// Port (network interface) as returned by the ports endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Port {
    pub uuid: String,
    pub address: String,
    #[serde(default)]
    pub node_uuid: Option<String>,
}

/// Request body for `POST /v1/ports`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortCreateRequest {
    pub address: String,
    pub node_uuid: String,
}

/// Response of `GET /v1/ports`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortCollection {
    pub ports: Vec<Port>,
}

/// JSON patch operation kind (RFC 6902 subset used by Ironic)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

/// Single JSON patch edit, e.g. `{"op": "replace", "path": "/driver", "value": "ipmi"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self { op: PatchOp::Add, path: path.into(), value: Some(value) }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self { op: PatchOp::Remove, path: path.into(), value: None }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self { op: PatchOp::Replace, path: path.into(), value: Some(value) }
    }
}

/// Ironic error body: `{"error_message": "{\"faultstring\": \"...\"}"}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error_message: Value,
}

impl ErrorBody {
    /// Extract the human readable fault string, if any
    pub(crate) fn fault_string(&self) -> Option<String> {
        let inner = match &self.error_message {
            Value::String(s) => serde_json::from_str::<Value>(s).unwrap_or(Value::String(s.clone())),
            other => other.clone(),
        };
        match inner {
            Value::Object(map) => map
                .get("faultstring")
                .and_then(Value::as_str)
                .map(str::to_string),
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}
