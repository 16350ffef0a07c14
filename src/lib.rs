//! Rust connector SDK for the Blue project-management GraphQL API.
//!
//! The crate maps a host-supplied operation name plus a loosely-typed
//! parameter bag onto a single GraphQL request/response cycle: parameter
//! extraction, document construction, authentication headers, response
//! normalization and error classification. It also implements the cascading
//! searchable lookups (company, project, todo list) that back the host's
//! dropdown UI.
//!
//! ```no_run
//! use blue_connector::{Client, Config, Credentials, Parameters};
//! use serde_json::json;
//!
//! # async fn run() -> blue_connector::Result<()> {
//! let client = Client::new(Config {
//!     credentials: Some(Credentials::new("token-id", "token-secret")),
//!     ..Default::default()
//! })?;
//!
//! let params = Parameters::from_value(json!({ "companyId": "acme" }));
//! let result = client.execute("getRecords", 0, params).await?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Default GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.blue.cc/graphql";

/// HTTP header carrying the API token id.
pub const TOKEN_ID_HEADER: &str = "X-Bloo-Token-ID";

/// HTTP header carrying the API token secret.
pub const TOKEN_SECRET_HEADER: &str = "X-Bloo-Token-Secret";

/// HTTP header scoping a request to one company.
pub const COMPANY_SCOPE_HEADER: &str = "X-Bloo-Company-ID";

/// Default per-request timeout (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: std::time::Duration =
    std::time::Duration::from_millis(30_000);

mod client;
mod envelope;
mod errors;
mod locator;
pub mod operations;
mod query;
pub mod resolve;
mod transport;
mod types;

#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
mod mock;
pub mod testing;

pub use client::{Client, Config};
pub use envelope::{normalize, GraphQLEnvelope, GraphQLErrorEntry};
pub use errors::{
    Error, GraphQLError, ParameterError, Result, TransportError, TransportErrorKind,
};
pub use locator::{normalize_locator, LocatorMode, Parameters, ResourceLocator};
pub use operations::{dispatch, Operation};
pub use query::GraphQLRequest;
pub use transport::{RequestScope, Transport};
pub use types::{
    BatchItem, CallOptions, Credentials, CustomFieldUpdate, CustomFieldValue, OperationContext,
    OperationResult, SearchItem,
};

#[cfg(feature = "mock")]
pub use mock::{MockConfig, MockTransport};
