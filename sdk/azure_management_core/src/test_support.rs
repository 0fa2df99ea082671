//! Helpers for testing crates built on `azure_management_core` against a
//! [`wiremock::MockServer`].

use crate::client::ManagementClient;
use std::time::Duration;
use wiremock::MockServer;

/// Subscription ID used by [`setup_mock_client`].
pub const TEST_SUBSCRIPTION_ID: &str = "test-subscription";

/// Create a client pointed at a mock server, without a certificate and with a
/// short poll interval.
pub fn setup_mock_client(server: &MockServer) -> ManagementClient {
    ManagementClient::builder()
        .subscription_id(TEST_SUBSCRIPTION_ID)
        .endpoint(server.uri())
        .http_client(reqwest::Client::new())
        .poll_interval(Duration::from_millis(10))
        .build()
        .expect("should build client")
}

/// The path a mock must match for a request to `relative` under the test
/// subscription.
pub fn subscription_path(relative: &str) -> String {
    format!("/{TEST_SUBSCRIPTION_ID}/{relative}")
}
