//! IronicClient trait for mocking
//!
//! This trait abstracts the IronicClient to enable mocking in unit tests.
//! The concrete IronicClient implements this trait, and tests can use mock implementations.

use crate::error::IronicError;
use crate::models::{Node, NodeCreateRequest, PatchOperation};

/// Trait for the Ironic operations node reconciliation needs
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait IronicClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Look a node up by UUID or name; `Ok(None)` when it does not exist
    async fn find_node(&self, name_or_uuid: &str) -> Result<Option<Node>, IronicError>;

    /// Create a node and register one port per MAC address, in order
    async fn register_node(&self, request: NodeCreateRequest, macs: &[String]) -> Result<Node, IronicError>;

    /// Apply a JSON patch to a node and return the updated node
    async fn patch_node(&self, uuid: &str, patch: &[PatchOperation]) -> Result<Node, IronicError>;

    /// Delete the ports matching the MAC addresses, then the node
    async fn unregister_node(&self, macs: &[String], uuid: &str) -> Result<(), IronicError>;
}
