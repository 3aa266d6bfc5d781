//! Helpers emulating Ironic server-side behaviour in the mock

use crate::error::IronicError;
use crate::models::{PatchOp, PatchOperation, MASKED_SECRET};
use serde_json::{Map, Value};

/// Replace every password-like `driver_info` value with the mask Ironic returns
pub fn mask_secrets(driver_info: &Map<String, Value>) -> Map<String, Value> {
    driver_info
        .iter()
        .map(|(key, value)| {
            if key.contains("password") {
                (key.clone(), Value::String(MASKED_SECRET.to_string()))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

/// Split a JSON pointer into unescaped reference tokens
fn parse_pointer(path: &str) -> Result<Vec<String>, IronicError> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| IronicError::InvalidRequest(format!("invalid patch path '{path}'")))?;
    Ok(rest
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

/// Apply a JSON patch in place, the way the Ironic API does on PATCH
pub fn apply_patch(document: &mut Value, patch: &[PatchOperation]) -> Result<(), IronicError> {
    for operation in patch {
        let mut tokens = parse_pointer(&operation.path)?;
        let last = tokens
            .pop()
            .ok_or_else(|| IronicError::InvalidRequest("empty patch path".to_string()))?;

        let mut parent = &mut *document;
        for token in &tokens {
            parent = parent.get_mut(token.as_str()).ok_or_else(|| {
                IronicError::InvalidRequest(format!("patch path '{}' does not exist", operation.path))
            })?;
        }
        let object = parent.as_object_mut().ok_or_else(|| {
            IronicError::InvalidRequest(format!("patch path '{}' is not an object member", operation.path))
        })?;

        match operation.op {
            PatchOp::Add => {
                object.insert(last, operation.value.clone().unwrap_or(Value::Null));
            }
            PatchOp::Replace => {
                if !object.contains_key(&last) {
                    return Err(IronicError::InvalidRequest(format!(
                        "can't replace non-existent path '{}'",
                        operation.path
                    )));
                }
                object.insert(last, operation.value.clone().unwrap_or(Value::Null));
            }
            PatchOp::Remove => {
                if object.remove(&last).is_none() {
                    return Err(IronicError::InvalidRequest(format!(
                        "can't remove non-existent path '{}'",
                        operation.path
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mask_secrets() {
        let info = json!({"ipmi_address": "1.2.3.4", "ipmi_password": "secret"});
        let masked = mask_secrets(info.as_object().expect("object"));
        assert_eq!(masked["ipmi_address"], json!("1.2.3.4"));
        assert_eq!(masked["ipmi_password"], json!(MASKED_SECRET));
    }

    #[test]
    fn test_apply_patch() {
        let mut doc = json!({"driver": "ipmi", "properties": {"cpus": 2}, "chassis_uuid": "c1"});
        apply_patch(
            &mut doc,
            &[
                PatchOperation::replace("/driver", json!("redfish")),
                PatchOperation::add("/properties/memory_mb", json!(8192)),
                PatchOperation::remove("/chassis_uuid"),
            ],
        )
        .expect("patch applies");
        assert_eq!(doc, json!({"driver": "redfish", "properties": {"cpus": 2, "memory_mb": 8192}}));
    }

    #[test]
    fn test_apply_patch_escaped_key() {
        let mut doc = json!({"properties": {}});
        apply_patch(&mut doc, &[PatchOperation::add("/properties/a~1b", json!(1))]).expect("patch applies");
        assert_eq!(doc, json!({"properties": {"a/b": 1}}));
    }

    #[test]
    fn test_apply_patch_missing_path() {
        let mut doc = json!({"properties": {}});
        let err = apply_patch(&mut doc, &[PatchOperation::remove("/properties/cpus")]).expect_err("missing key");
        assert!(matches!(err, IronicError::InvalidRequest(_)));
    }
}
