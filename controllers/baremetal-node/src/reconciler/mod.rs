//! Reconciliation logic for bare metal nodes.
//!
//! - `node`: present/absent state machine for a single Ironic node

pub mod node;

use ironic_client::IronicClientTrait;

/// Reconciles declared node parameters against Ironic.
pub struct Reconciler {
    pub(crate) ironic_client: Box<dyn IronicClientTrait + Send + Sync>,
}

impl Reconciler {
    /// Creates a reconciler backed by the given Ironic client.
    pub fn new(ironic_client: Box<dyn IronicClientTrait + Send + Sync>) -> Self {
        Self { ironic_client }
    }
}
