//! Helpers for wiring the client against a local test server.

use crate::{Client, Config, Credentials};

/// Client pointed at a wiremock server with dummy credentials.
pub fn test_client(base_url: &str) -> Client {
    Client::new(Config {
        base_url: Some(base_url.to_string()),
        credentials: Some(Credentials::new("token-id-test", "token-secret-test")),
        ..Default::default()
    })
    .expect("client")
}
