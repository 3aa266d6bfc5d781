//! Driver credential groups
//!
//! Ironic stores `driver_info` as one flat object. The parameter document
//! splits it into groups by purpose so that shared keys (an IPMI address used
//! for both power and management, for example) can be declared once.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Driver information grouped by interface
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct DriverInfo {
    /// Information necessary to turn this server on / off (IPMI username,
    /// password and address, for example). Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<Map<String, Value>>,

    /// Information necessary to connect to the serial console
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console: Option<Map<String, Value>>,

    /// Information necessary to interact with the management interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management: Option<Map<String, Value>>,

    /// Information necessary to deploy this server directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<Map<String, Value>>,
}

impl DriverInfo {
    /// Returns `true` when the power group is missing or has no keys
    pub fn power_is_empty(&self) -> bool {
        self.power.as_ref().is_none_or(Map::is_empty)
    }

    /// Groups layered on top of `power`, in overwrite order
    pub fn overlays(&self) -> impl Iterator<Item = &Map<String, Value>> {
        [&self.console, &self.management, &self.deploy]
            .into_iter()
            .filter_map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group(value: Value) -> Option<Map<String, Value>> {
        value.as_object().cloned()
    }

    #[test]
    fn test_power_is_empty() {
        assert!(DriverInfo::default().power_is_empty());

        let info = DriverInfo {
            power: group(json!({})),
            ..Default::default()
        };
        assert!(info.power_is_empty());

        let info = DriverInfo {
            power: group(json!({"ipmi_address": "1.2.3.4"})),
            ..Default::default()
        };
        assert!(!info.power_is_empty());
    }

    #[test]
    fn test_overlays_order_skips_missing_groups() {
        let info = DriverInfo {
            power: group(json!({"a": 1})),
            console: None,
            management: group(json!({"a": 2})),
            deploy: group(json!({"a": 3})),
        };
        let values: Vec<&Value> = info.overlays().filter_map(|g| g.get("a")).collect();
        assert_eq!(values, vec![&json!(2), &json!(3)]);
    }
}
