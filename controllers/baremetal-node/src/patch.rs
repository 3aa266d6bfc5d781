//! JSON patch computation
//!
//! Produces the RFC 6902 edits that turn the node Ironic holds into the node
//! the parameters describe. Objects are compared member by member; any other
//! differing value (scalars, arrays) is replaced whole.

use ironic_client::PatchOperation;
use serde_json::{Map, Value};

/// Compute the edits transforming `source` into `target`.
///
/// Members only in `source` are removed, members only in `target` are added
/// after the removals and replacements. Keys are visited in sorted order.
pub fn diff(source: &Value, target: &Value) -> Vec<PatchOperation> {
    let mut patch = Vec::new();
    diff_at("", source, target, &mut patch);
    patch
}

fn diff_at(path: &str, source: &Value, target: &Value, patch: &mut Vec<PatchOperation>) {
    match (source, target) {
        (Value::Object(src), Value::Object(dst)) => {
            for key in sorted_keys(src) {
                let child = pointer(path, key);
                match dst.get(key) {
                    Some(dst_value) => diff_at(&child, &src[key], dst_value, patch),
                    None => patch.push(PatchOperation::remove(child)),
                }
            }
            for key in sorted_keys(dst) {
                if !src.contains_key(key) {
                    patch.push(PatchOperation::add(pointer(path, key), dst[key].clone()));
                }
            }
        }
        _ if source == target => {}
        _ => patch.push(PatchOperation::replace(path, target.clone())),
    }
}

// Map iteration order depends on serde_json's `preserve_order` feature.
fn sorted_keys(map: &Map<String, Value>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

/// Append an RFC 6901 escaped reference token
fn pointer(parent: &str, key: &str) -> String {
    format!("{}/{}", parent, key.replace('~', "~0").replace('/', "~1"))
}

/// Paths touched by a patch, in order
pub fn changed_paths(patch: &[PatchOperation]) -> Vec<String> {
    patch.iter().map(|op| op.path.clone()).collect()
}

/// Whether the patch is a lone edit of a password-like field that should be
/// skipped. Ironic masks stored secrets, so they always differ from the
/// declared value.
pub fn is_masked_password_only(patch: &[PatchOperation], skip_masked_password: bool) -> bool {
    match patch {
        [only] => skip_masked_password && only.path.contains("password"),
        _ => false,
    }
}
