//! Node reconciler
//!
//! Lookup result × desired state:
//! - missing, present: register the node and its ports
//! - missing, absent: nothing to do
//! - found, present: diff and patch when it drifted
//! - found, absent: unregister ports and node
//!
//! Nics are only registered on creation; drift in nics is not corrected.

use super::Reconciler;
use crate::error::ControllerError;
use crate::mapping::NodeConfig;
use crate::outcome::ReconcileOutcome;
use crate::patch;
use ironic_client::Node;
use node_spec::{BaremetalNodeSpec, NodeState};
use tracing::{debug, error, info};

impl Reconciler {
    /// Bring Ironic in line with `spec`, making at most one mutating call.
    ///
    /// All parameter checks run before the first provider call.
    pub async fn reconcile_node(&self, spec: &BaremetalNodeSpec) -> Result<ReconcileOutcome, ControllerError> {
        spec.validate()?;
        let node_id = spec.node_id();

        info!(
            "Reconciling node {} (state: {:?})",
            node_id.unwrap_or("<unnamed>"),
            spec.state
        );

        match spec.state {
            NodeState::Present => self.ensure_present(spec, node_id).await,
            NodeState::Absent => self.ensure_absent(spec, node_id).await,
        }
    }

    async fn lookup(&self, node_id: Option<&str>) -> Result<Option<Node>, ControllerError> {
        match node_id {
            Some(id) => Ok(self.ironic_client.find_node(id).await?),
            None => {
                debug!("No uuid or name given, Ironic will assign a uuid");
                Ok(None)
            }
        }
    }

    async fn ensure_present(
        &self,
        spec: &BaremetalNodeSpec,
        node_id: Option<&str>,
    ) -> Result<ReconcileOutcome, ControllerError> {
        let desired = NodeConfig::desired(spec)?;

        match self.lookup(node_id).await? {
            None => self.create_node(spec, desired).await,
            Some(node) => self.update_node(spec, node_id, &desired, node).await,
        }
    }

    async fn create_node(
        &self,
        spec: &BaremetalNodeSpec,
        desired: NodeConfig,
    ) -> Result<ReconcileOutcome, ControllerError> {
        let request = desired.into_create_request(spec.uuid.clone());
        let node = self
            .ironic_client
            .register_node(request, &mac_addresses(spec))
            .await?;

        info!(
            "Registered node {} with {} port(s), provision state {:?}",
            node.uuid,
            spec.nics.len(),
            node.provision_state
        );
        Ok(ReconcileOutcome::Created {
            uuid: node.uuid,
            provision_state: node.provision_state,
        })
    }

    async fn update_node(
        &self,
        spec: &BaremetalNodeSpec,
        node_id: Option<&str>,
        desired: &NodeConfig,
        node: Node,
    ) -> Result<ReconcileOutcome, ControllerError> {
        if node_id.is_none() {
            return Err(ControllerError::Validation(
                "A uuid or name value must be defined".to_string(),
            ));
        }

        let current = NodeConfig::current(&node);
        let patch = patch::diff(&current.to_value(), &desired.to_value());

        if patch.is_empty() {
            debug!("Node {} already up-to-date", node.uuid);
            return Ok(not_updated(node));
        }

        if patch::is_masked_password_only(&patch, spec.skip_masked_password()) {
            info!(
                "Node {}: only {} differs, skipping update of masked password",
                node.uuid, patch[0].path
            );
            return Ok(not_updated(node));
        }

        let changes = patch::changed_paths(&patch);
        info!("Node {} drifted, patching {:?}", node.uuid, changes);

        let updated = self
            .ironic_client
            .patch_node(&node.uuid, &patch)
            .await
            .map_err(|e| {
                error!("Failed to patch node {}: {}", node.uuid, e);
                ControllerError::UpdateFailed(e.to_string())
            })?;

        Ok(ReconcileOutcome::Updated {
            changes,
            uuid: updated.uuid,
            provision_state: updated.provision_state,
        })
    }

    async fn ensure_absent(
        &self,
        spec: &BaremetalNodeSpec,
        node_id: Option<&str>,
    ) -> Result<ReconcileOutcome, ControllerError> {
        if node_id.is_none() {
            return Err(ControllerError::Validation(
                "A uuid or name value must be defined in order to remove a node.".to_string(),
            ));
        }

        match self.lookup(node_id).await? {
            Some(node) => {
                self.ironic_client
                    .unregister_node(&mac_addresses(spec), &node.uuid)
                    .await?;
                info!("Unregistered node {}", node.uuid);
                Ok(ReconcileOutcome::Deleted)
            }
            None => {
                debug!("Node {} not found, nothing to remove", node_id.unwrap_or_default());
                Ok(ReconcileOutcome::NotFound)
            }
        }
    }
}

fn not_updated(node: Node) -> ReconcileOutcome {
    ReconcileOutcome::NotUpdated {
        uuid: node.uuid,
        provision_state: node.provision_state,
    }
}

fn mac_addresses(spec: &BaremetalNodeSpec) -> Vec<String> {
    spec.nics.iter().map(|nic| nic.mac.clone()).collect()
}
