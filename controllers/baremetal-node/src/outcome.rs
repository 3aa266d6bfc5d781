//! Reconciliation results and their JSON report

use serde_json::{json, Value};

/// What a reconciliation run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Node registered
    Created {
        uuid: String,
        provision_state: Option<String>,
    },
    /// Node exists and matches (or only the masked password differs)
    NotUpdated {
        uuid: String,
        provision_state: Option<String>,
    },
    /// Node patched
    Updated {
        changes: Vec<String>,
        uuid: String,
        provision_state: Option<String>,
    },
    /// Node unregistered
    Deleted,
    /// Node absent and asked to be absent
    NotFound,
}

impl ReconcileOutcome {
    /// Whether the run changed anything in Ironic
    pub fn changed(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Updated { .. } | Self::Deleted)
    }

    /// Structured result printed on success
    pub fn to_json(&self) -> Value {
        match self {
            Self::Created { uuid, provision_state } => json!({
                "changed": true,
                "uuid": uuid,
                "provision_state": provision_state,
            }),
            Self::NotUpdated { uuid, provision_state } => json!({
                "changed": false,
                "result": "Node not updated",
                "uuid": uuid,
                "provision_state": provision_state,
            }),
            Self::Updated { changes, uuid, provision_state } => json!({
                "changed": true,
                "result": "Node Updated",
                "changes": changes,
                "uuid": uuid,
                "provision_state": provision_state,
            }),
            Self::Deleted => json!({"changed": true, "result": "deleted"}),
            Self::NotFound => json!({"changed": false, "result": "Server not found"}),
        }
    }
}

/// Structured result printed on failure
pub fn failure_json(message: &str) -> Value {
    json!({"failed": true, "msg": message})
}
