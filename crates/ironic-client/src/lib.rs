//! Ironic REST API Client
//!
//! A Rust client library for the OpenStack Ironic Bare Metal API.
//! Covers the node and port calls needed to enroll, patch and remove nodes.
//!
//! # Example
//!
//! ```no_run
//! use ironic_client::{IronicClient, IronicClientTrait, PatchOperation};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // noauth deployment: no token
//! let client = IronicClient::new(
//!     "http://ironic:6385".to_string(),
//!     None,
//!     Duration::from_secs(30),
//! )?;
//!
//! if let Some(node) = client.find_node("node-1").await? {
//!     let patch = vec![PatchOperation::replace("/driver", "ipmi".into())];
//!     client.patch_node(&node.uuid, &patch).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod ironic_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use client::IronicClient;
pub use common::{HttpClient, DEFAULT_API_VERSION};
pub use error::IronicError;
pub use models::*;
pub use ironic_trait::IronicClientTrait;
#[cfg(feature = "test-util")]
pub use mock::{MockCall, MockIronicClient};
