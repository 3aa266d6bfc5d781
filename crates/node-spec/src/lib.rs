//! Bare Metal Node Parameters
//!
//! Declared parameter types for reconciling an Ironic node. A parameter
//! document is plain YAML (or JSON) and describes the desired state of one
//! node: its driver, driver credentials, hardware properties and nics.
//!
//! # Example
//!
//! ```
//! use node_spec::{BaremetalNodeSpec, NodeState};
//!
//! let spec = BaremetalNodeSpec::from_yaml_str(r#"
//! driver: pxe_ipmitool
//! uuid: "00000000-0000-0000-0000-000000000002"
//! driver_info:
//!   power:
//!     ipmi_address: "1.2.3.4"
//! nics:
//!   - mac: "aa:bb:cc:aa:bb:cc"
//! "#).unwrap();
//!
//! assert_eq!(spec.state, NodeState::Present);
//! assert_eq!(spec.node_id(), Some("00000000-0000-0000-0000-000000000002"));
//! ```

pub mod driver_info;
pub mod error;
pub mod node;

pub use driver_info::DriverInfo;
pub use error::SpecError;
pub use node::*;

/// JSON schema of the parameter document
#[must_use]
pub fn parameter_schema() -> schemars::Schema {
    schemars::schema_for!(BaremetalNodeSpec)
}
