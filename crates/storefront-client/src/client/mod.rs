//! HTTP client for the Shopify Storefront GraphQL API.

mod cart;
mod catalog;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_core::AppConfig;

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::GraphQlResponse;

/// Maximum number of product pages to fetch before returning an error.
/// Guards against a backend that keeps reporting `hasNextPage`.
pub(crate) const MAX_PAGES: usize = 100;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: &'a V,
}

/// Connection and retry settings for [`StorefrontClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Retry attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// `first:` argument for each products page (1–250).
    pub page_size: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "storefront/0.1".to_owned(),
            max_retries: 3,
            backoff_base_ms: 500,
            page_size: 250,
        }
    }
}

impl From<&AppConfig> for ClientOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            page_size: config.products_page_size,
        }
    }
}

/// Client for the Storefront GraphQL endpoint.
///
/// Every call is a `POST` of `{query, variables}` carrying the public access
/// token. HTTP 429/401/403/404 and other non-2xx statuses map to typed
/// errors; a non-empty GraphQL `errors` array becomes
/// [`ClientError::GraphQl`]. Transient failures are retried with back-off.
pub struct StorefrontClient {
    client: Client,
    endpoint: Url,
    access_token: String,
    options: ClientOptions,
}

impl StorefrontClient {
    /// Creates a client for `endpoint`
    /// (`https://{shop}/api/{version}/graphql.json`, or a mock server URL).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidEndpoint`] if
    /// `endpoint` is not an absolute URL.
    pub fn new(
        endpoint: &str,
        access_token: &str,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_owned(),
            options,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`StorefrontClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.graphql_endpoint(),
            &config.storefront_access_token,
            ClientOptions::from(config),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Executes one GraphQL operation and returns its `data`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`] for HTTP 429 after all retries.
    /// - [`ClientError::Unauthorized`] for HTTP 401/403 (not retried).
    /// - [`ClientError::NotFound`] for HTTP 404 (not retried).
    /// - [`ClientError::UnexpectedStatus`] for other non-2xx (5xx retried).
    /// - [`ClientError::Http`] on network failure after all retries.
    /// - [`ClientError::Deserialize`] if the body does not match `T`.
    /// - [`ClientError::GraphQl`] if the response carries `errors`.
    /// - [`ClientError::EmptyResponse`] if `data` is absent without errors.
    pub(crate) async fn execute<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: &V,
    ) -> Result<T, ClientError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest { query, variables };

        let envelope: GraphQlResponse<T> =
            retry_with_backoff(self.options.max_retries, self.options.backoff_base_ms, || {
                let body = &body;
                async move { self.post(operation, body).await }
            })
            .await?;
        into_data(operation, envelope)
    }

    /// Executes one GraphQL operation with a single attempt.
    ///
    /// Used for mutations that are not idempotent, where a replay after a
    /// lost response could apply the change twice.
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute`], without any retries.
    pub(crate) async fn execute_once<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: &V,
    ) -> Result<T, ClientError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = GraphQlRequest { query, variables };
        let envelope: GraphQlResponse<T> = self.post(operation, &body).await?;
        into_data(operation, envelope)
    }

    async fn post<V, T>(
        &self,
        operation: &str,
        body: &GraphQlRequest<'_, V>,
    ) -> Result<GraphQlResponse<T>, ClientError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ClientError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ClientError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                url: self.endpoint.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: operation.to_owned(),
            source: e,
        })
    }
}

/// Unwraps `data` from a response envelope, surfacing GraphQL `errors`.
fn into_data<T>(operation: &str, envelope: GraphQlResponse<T>) -> Result<T, ClientError> {
    if !envelope.errors.is_empty() {
        let message = envelope
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ClientError::GraphQl {
            operation: operation.to_owned(),
            message,
        });
    }

    envelope.data.ok_or_else(|| ClientError::EmptyResponse {
        operation: operation.to_owned(),
    })
}
