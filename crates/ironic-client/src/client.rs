//! Ironic API client
//!
//! Implements the Ironic v1 REST API calls used for node enrollment:
//! /v1/nodes and /v1/ports.

use crate::common::{encode, HttpClient};
use crate::error::IronicError;
use crate::ironic_trait::IronicClientTrait;
use crate::models::{Node, NodeCreateRequest, PatchOperation, Port, PortCollection, PortCreateRequest};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Ironic API client
pub struct IronicClient {
    http: HttpClient,
}

impl IronicClient {
    /// Create a new Ironic client
    ///
    /// # Arguments
    /// * `base_url` - Ironic endpoint (e.g., "http://ironic:6385")
    /// * `token` - Keystone token; `None` for noauth deployments
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: String, token: Option<String>, timeout: Duration) -> Result<Self, IronicError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http: HttpClient::new(client, base_url, token),
        })
    }

    /// Request a specific API microversion (default: 1.46)
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.http.set_api_version(api_version.into());
        self
    }

    /// Get a node by UUID or name
    pub async fn get_node(&self, name_or_uuid: &str) -> Result<Node, IronicError> {
        self.http.get(&format!("/v1/nodes/{}", encode(name_or_uuid))).await
    }

    /// Create a node
    pub async fn create_node(&self, request: &NodeCreateRequest) -> Result<Node, IronicError> {
        self.http.post("/v1/nodes", request).await
    }

    /// Create a port on a node
    pub async fn create_port(&self, node_uuid: &str, address: &str) -> Result<Port, IronicError> {
        let request = PortCreateRequest {
            address: address.to_string(),
            node_uuid: node_uuid.to_string(),
        };
        self.http.post("/v1/ports", &request).await
    }

    /// List ports with the given MAC address
    pub async fn query_ports_by_address(&self, address: &str) -> Result<Vec<Port>, IronicError> {
        let collection: PortCollection = self
            .http
            .get(&format!("/v1/ports?address={}", encode(address)))
            .await?;
        Ok(collection.ports)
    }

    /// Delete a port
    pub async fn delete_port(&self, uuid: &str) -> Result<(), IronicError> {
        self.http.delete(&format!("/v1/ports/{}", encode(uuid))).await
    }

    /// Delete a node
    pub async fn delete_node(&self, uuid: &str) -> Result<(), IronicError> {
        self.http.delete(&format!("/v1/nodes/{}", encode(uuid))).await
    }
}

#[async_trait::async_trait]
impl IronicClientTrait for IronicClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn find_node(&self, name_or_uuid: &str) -> Result<Option<Node>, IronicError> {
        debug!("Looking up node {}", name_or_uuid);
        self.http
            .get_optional(&format!("/v1/nodes/{}", encode(name_or_uuid)))
            .await
    }

    async fn register_node(&self, request: NodeCreateRequest, macs: &[String]) -> Result<Node, IronicError> {
        let node = self.create_node(&request).await?;
        info!("Created node {} with driver {}", node.uuid, node.driver);

        // A failed port leaves the node (and earlier ports) in place.
        for mac in macs {
            let port = self.create_port(&node.uuid, mac).await?;
            debug!("Created port {} ({}) on node {}", port.uuid, port.address, node.uuid);
        }

        Ok(node)
    }

    async fn patch_node(&self, uuid: &str, patch: &[PatchOperation]) -> Result<Node, IronicError> {
        self.http.patch(&format!("/v1/nodes/{}", encode(uuid)), patch).await
    }

    async fn unregister_node(&self, macs: &[String], uuid: &str) -> Result<(), IronicError> {
        let node = self.get_node(uuid).await?;
        if !node.can_unregister() {
            return Err(IronicError::InvalidState(format!(
                "node {} is in provision state {}, refusing to unregister",
                uuid,
                node.provision_state.as_deref().unwrap_or("unknown")
            )));
        }

        for mac in macs {
            let ports = self.query_ports_by_address(mac).await?;
            if ports.is_empty() {
                warn!("No port with address {} found for node {}", mac, uuid);
            }
            for port in ports {
                self.delete_port(&port.uuid).await?;
                debug!("Deleted port {} ({})", port.uuid, port.address);
            }
        }

        self.delete_node(uuid).await?;
        info!("Deleted node {}", uuid);
        Ok(())
    }
}
