use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};

use crate::{
    envelope::GraphQLEnvelope,
    errors::{Error, Result, TransportError, TransportErrorKind},
    locator::Parameters,
    operations,
    query::GraphQLRequest,
    resolve,
    transport::{RequestScope, Transport},
    types::{BatchItem, Credentials, OperationContext, OperationResult, SearchItem},
    COMPANY_SCOPE_HEADER, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT, TOKEN_ID_HEADER,
    TOKEN_SECRET_HEADER,
};

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Override the GraphQL endpoint (defaults to the public API).
    pub base_url: Option<String>,
    pub credentials: Option<Credentials>,
    /// Override the default per-request timeout (30s).
    pub timeout: Option<Duration>,
    pub http_client: Option<reqwest::Client>,
}

/// Connector client: operation dispatch plus the resolver surface.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    endpoint: reqwest::Url,
    credentials: Credentials,
    http: reqwest::Client,
    request_timeout: Duration,
}

impl Client {
    pub fn new(cfg: Config) -> Result<Self> {
        let base = cfg
            .base_url
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = reqwest::Url::parse(base.trim_end_matches('/'))
            .map_err(|err| Error::Config(format!("invalid base url: {err}")))?;

        let credentials = cfg
            .credentials
            .ok_or_else(|| Error::Config("credentials are required".to_string()))?;
        if credentials.token_id.trim().is_empty() || credentials.token_secret.trim().is_empty() {
            return Err(Error::Config(
                "token id and token secret are required".to_string(),
            ));
        }

        let http = match cfg.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .build()
                .map_err(|err| TransportError {
                    kind: TransportErrorKind::Connect,
                    message: "failed to build http client".to_string(),
                    source: Some(err),
                })?,
        };

        Ok(Self {
            inner: Arc::new(ClientInner {
                endpoint,
                credentials,
                http,
                request_timeout: cfg.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            }),
        })
    }

    /// Execute one operation against one item's raw parameters.
    ///
    /// Failures inside the operation come back as `success: false`; an
    /// unknown operation name is a dispatch error.
    pub async fn execute(
        &self,
        operation: &str,
        item_index: usize,
        params: Parameters,
    ) -> Result<OperationResult> {
        let ctx = OperationContext::new(item_index, self.inner.credentials.clone(), params);
        operations::dispatch(operation, &ctx, self.inner.as_ref()).await
    }

    /// Process items in order, each to completion before the next begins.
    ///
    /// With `continue_on_fail` every failure, dispatch errors included,
    /// folds into an `{"error": ...}` row; otherwise the first failure
    /// aborts the batch.
    pub async fn execute_batch(
        &self,
        items: Vec<BatchItem>,
        continue_on_fail: bool,
    ) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match self.execute(&item.operation, index, item.parameters).await {
                Ok(result) if result.success => {
                    out.push(result.data.unwrap_or(Value::Null));
                }
                Ok(result) => {
                    let message = result
                        .error
                        .unwrap_or_else(|| "unknown error".to_string());
                    if continue_on_fail {
                        out.push(json!({ "error": message }));
                    } else {
                        return Err(Error::Operation {
                            operation: item.operation,
                            message,
                        });
                    }
                }
                Err(err) => {
                    if continue_on_fail {
                        out.push(json!({ "error": err.to_string() }));
                    } else {
                        return Err(err);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Searchable dropdown: companies.
    pub async fn search_companies(&self, filter: Option<&str>) -> Vec<SearchItem> {
        resolve::search_companies(self.inner.as_ref(), filter).await
    }

    /// Searchable dropdown: projects, scoped by the sibling `companyId`
    /// parameter.
    pub async fn search_projects(
        &self,
        params: &Parameters,
        filter: Option<&str>,
    ) -> Vec<SearchItem> {
        resolve::search_projects(self.inner.as_ref(), params, filter).await
    }

    /// Searchable dropdown: todo lists, scoped by the sibling `companyId`
    /// and `projectId` parameters.
    pub async fn search_todo_lists(
        &self,
        params: &Parameters,
        filter: Option<&str>,
    ) -> Vec<SearchItem> {
        resolve::search_todo_lists(self.inner.as_ref(), params, filter).await
    }
}

#[async_trait]
impl Transport for ClientInner {
    async fn send(&self, request: GraphQLRequest, scope: RequestScope) -> Result<GraphQLEnvelope> {
        let timeout = scope.timeout.unwrap_or(self.request_timeout);
        let mut builder = self
            .http
            .post(self.endpoint.clone())
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(TOKEN_ID_HEADER, self.credentials.token_id.as_str())
            .header(TOKEN_SECRET_HEADER, self.credentials.token_secret.as_str());
        if let Some(company_id) = scope.company_id.as_deref() {
            let value = HeaderValue::from_str(company_id)
                .map_err(|err| Error::Config(format!("invalid company id header: {err}")))?;
            builder = builder.header(COMPANY_SCOPE_HEADER, value);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            endpoint = %self.endpoint,
            company = scope.company_id.as_deref().unwrap_or(""),
            "sending graphql request"
        );

        let resp = builder
            .json(&request)
            .send()
            .await
            .map_err(to_transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            #[cfg(feature = "tracing")]
            tracing::warn!(status = %status, "graphql request failed");
            return Err(TransportError {
                kind: TransportErrorKind::Request,
                message: format!("http {}: {}", status.as_u16(), body.trim()),
                source: None,
            }
            .into());
        }

        let bytes = resp.bytes().await.map_err(to_transport_error)?;
        let envelope =
            serde_json::from_slice::<GraphQLEnvelope>(&bytes).map_err(|err| TransportError {
                kind: TransportErrorKind::Other,
                message: format!("invalid response body: {err}"),
                source: None,
            })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(errors = envelope.errors.len(), "graphql response received");

        Ok(envelope)
    }
}

fn to_transport_error(err: reqwest::Error) -> Error {
    let kind = if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_request() {
        TransportErrorKind::Request
    } else {
        TransportErrorKind::Other
    };

    TransportError {
        kind,
        message: err.to_string(),
        source: Some(err),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_credentials() {
        let err = Client::new(Config::default()).err().expect("config error");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn client_rejects_blank_tokens() {
        let err = Client::new(Config {
            credentials: Some(Credentials::new("", "secret")),
            ..Default::default()
        })
        .err()
        .expect("config error");
        assert!(err.to_string().contains("token id"));
    }

    #[test]
    fn client_rejects_malformed_base_url() {
        let err = Client::new(Config {
            base_url: Some("not a url".to_string()),
            credentials: Some(Credentials::new("id", "secret")),
            ..Default::default()
        })
        .err()
        .expect("config error");
        assert!(err.to_string().contains("invalid base url"));
    }
}
