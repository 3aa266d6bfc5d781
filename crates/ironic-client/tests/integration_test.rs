//! Integration tests for the Ironic client
//!
//! These tests require a running Ironic instance (noauth mode is enough).
//! Set IRONIC_URL and optionally IRONIC_AUTH_TOKEN environment variables to run.

use ironic_client::{IronicClient, IronicClientTrait, NodeCreateRequest, PatchOperation};
use std::time::Duration;

fn client_from_env() -> IronicClient {
    let url = std::env::var("IRONIC_URL")
        .unwrap_or_else(|_| "http://localhost:6385".to_string());
    let token = std::env::var("IRONIC_AUTH_TOKEN").ok();

    IronicClient::new(url, token, Duration::from_secs(30)).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running Ironic instance
async fn test_find_missing_node() {
    let client = client_from_env();

    let node = client
        .find_node("ironic-client-integration-missing")
        .await
        .expect("Lookup should not fail for a missing node");
    assert!(node.is_none());
}

#[tokio::test]
#[ignore]
async fn test_register_patch_unregister() {
    let client = client_from_env();
    let macs = vec!["52:54:00:aa:bb:01".to_string()];

    let request = NodeCreateRequest {
        name: Some("ironic-client-integration".to_string()),
        driver: "fake-hardware".to_string(),
        ..Default::default()
    };

    let node = client
        .register_node(request, &macs)
        .await
        .expect("Failed to register node");
    println!("Registered node {} ({:?})", node.uuid, node.provision_state);

    let patch = vec![PatchOperation::add("/properties/cpus", 2.into())];
    let patched = client
        .patch_node(&node.uuid, &patch)
        .await
        .expect("Failed to patch node");
    assert_eq!(patched.properties.get("cpus"), Some(&serde_json::json!(2)));

    // Clean up
    client
        .unregister_node(&macs, &node.uuid)
        .await
        .expect("Failed to unregister node");
}
