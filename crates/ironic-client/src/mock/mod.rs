//! Mock IronicClient for unit testing
//!
//! This module provides a mock implementation of IronicClientTrait that can be used
//! in unit tests without requiring a running Ironic instance.
//!
//! The mock behaves like the API where it matters for reconciliation: stored
//! passwords come back masked, patches are applied to the stored node, and
//! unregistering is refused in the same provision states. Every trait call is
//! recorded so tests can assert which provider operations were issued.

mod helpers;

pub use helpers::{apply_patch, mask_secrets};

use crate::error::IronicError;
use crate::ironic_trait::IronicClientTrait;
use crate::models::{Node, NodeCreateRequest, PatchOperation, Port};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// A recorded call against the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    FindNode(String),
    RegisterNode(NodeCreateRequest, Vec<String>),
    PatchNode(String, Vec<PatchOperation>),
    UnregisterNode(Vec<String>, String),
}

/// Mock IronicClient for testing
///
/// Clones share state, so a test can keep a handle while the reconciler
/// owns another.
#[derive(Clone)]
pub struct MockIronicClient {
    pub(crate) base_url: String,
    // In-memory storage, nodes keyed by uuid and ports by MAC address
    pub(crate) nodes: Arc<Mutex<HashMap<String, Node>>>,
    pub(crate) ports: Arc<Mutex<HashMap<String, Port>>>,
    pub(crate) calls: Arc<Mutex<Vec<MockCall>>>,
    // Error message returned by the next patch_node call
    pub(crate) patch_failure: Arc<Mutex<Option<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl MockIronicClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            nodes: Arc::new(Mutex::new(HashMap::new())),
            ports: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            patch_failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a node to the mock store (for test setup)
    ///
    /// The node is stored as given; secrets are masked only when read back.
    pub fn add_node(&self, node: Node) {
        lock(&self.nodes).insert(node.uuid.clone(), node);
    }

    /// Add a port to the mock store (for test setup)
    pub fn add_port(&self, port: Port) {
        lock(&self.ports).insert(port.address.clone(), port);
    }

    /// Make the next `patch_node` call fail with an API error
    pub fn fail_next_patch(&self, message: impl Into<String>) {
        *lock(&self.patch_failure) = Some(message.into());
    }

    /// Node as stored (unmasked), by uuid
    pub fn stored_node(&self, uuid: &str) -> Option<Node> {
        lock(&self.nodes).get(uuid).cloned()
    }

    /// Ports currently registered
    pub fn stored_ports(&self) -> Vec<Port> {
        let mut ports: Vec<Port> = lock(&self.ports).values().cloned().collect();
        ports.sort_by(|a, b| a.address.cmp(&b.address));
        ports
    }

    /// All recorded calls, oldest first
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Forget recorded calls (stored resources are kept)
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Number of recorded mutating calls
    pub fn mutation_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| !matches!(call, MockCall::FindNode(_)))
            .count()
    }

    fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
    }

    /// Node as the API would return it
    fn present(node: &Node) -> Node {
        Node {
            driver_info: mask_secrets(&node.driver_info),
            ..node.clone()
        }
    }
}

#[async_trait::async_trait]
impl IronicClientTrait for MockIronicClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn find_node(&self, name_or_uuid: &str) -> Result<Option<Node>, IronicError> {
        self.record(MockCall::FindNode(name_or_uuid.to_string()));
        let nodes = lock(&self.nodes);
        let found = nodes.get(name_or_uuid).or_else(|| {
            nodes
                .values()
                .find(|node| node.name.as_deref() == Some(name_or_uuid))
        });
        Ok(found.map(Self::present))
    }

    async fn register_node(&self, request: NodeCreateRequest, macs: &[String]) -> Result<Node, IronicError> {
        self.record(MockCall::RegisterNode(request.clone(), macs.to_vec()));

        let uuid = request
            .uuid
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut nodes = lock(&self.nodes);
        if nodes.contains_key(&uuid) {
            return Err(IronicError::Api(format!("Node with UUID {uuid} already exists")));
        }
        if let Some(name) = request.name.as_deref() {
            if nodes.values().any(|node| node.name.as_deref() == Some(name)) {
                return Err(IronicError::Api(format!("Node with name {name} already exists")));
            }
        }

        let node = Node {
            uuid: uuid.clone(),
            name: request.name,
            driver: request.driver,
            driver_info: request.driver_info,
            properties: request.properties,
            extra: serde_json::Map::new(),
            chassis_uuid: request.chassis_uuid,
            provision_state: Some("enroll".to_string()),
            power_state: None,
            maintenance: false,
            created_at: Some(chrono::Utc::now()),
            updated_at: None,
        };
        nodes.insert(uuid.clone(), node.clone());
        drop(nodes);

        let mut ports = lock(&self.ports);
        for mac in macs {
            if ports.contains_key(mac) {
                return Err(IronicError::Api(format!("A port with MAC address {mac} already exists")));
            }
            ports.insert(
                mac.clone(),
                Port {
                    uuid: uuid::Uuid::new_v4().to_string(),
                    address: mac.clone(),
                    node_uuid: Some(uuid.clone()),
                },
            );
        }

        Ok(Self::present(&node))
    }

    async fn patch_node(&self, uuid: &str, patch: &[PatchOperation]) -> Result<Node, IronicError> {
        self.record(MockCall::PatchNode(uuid.to_string(), patch.to_vec()));

        if let Some(message) = lock(&self.patch_failure).take() {
            return Err(IronicError::Api(message));
        }

        let mut nodes = lock(&self.nodes);
        let stored = nodes
            .get_mut(uuid)
            .ok_or_else(|| IronicError::NotFound(format!("Node {uuid} could not be found")))?;

        let mut document = serde_json::to_value(&*stored)?;
        apply_patch(&mut document, patch)?;
        let mut updated: Node = serde_json::from_value(document)?;
        updated.updated_at = Some(chrono::Utc::now());
        *stored = updated;

        Ok(Self::present(stored))
    }

    async fn unregister_node(&self, macs: &[String], uuid: &str) -> Result<(), IronicError> {
        self.record(MockCall::UnregisterNode(macs.to_vec(), uuid.to_string()));

        let mut nodes = lock(&self.nodes);
        let node = nodes
            .get(uuid)
            .ok_or_else(|| IronicError::NotFound(format!("Node {uuid} could not be found")))?;
        if !node.can_unregister() {
            return Err(IronicError::InvalidState(format!(
                "node {} is in provision state {}, refusing to unregister",
                uuid,
                node.provision_state.as_deref().unwrap_or("unknown")
            )));
        }

        let mut ports = lock(&self.ports);
        for mac in macs {
            ports.remove(mac);
        }
        nodes.remove(uuid);
        Ok(())
    }
}
