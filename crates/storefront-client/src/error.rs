use thiserror::Error;

/// Errors returned by the Storefront API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by storefront API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// HTTP 401/403: the access token is missing, wrong, or lacks a scope.
    #[error("storefront API rejected the access token (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response carried a top-level GraphQL `errors` array.
    #[error("GraphQL error in {operation}: {message}")]
    GraphQl { operation: String, message: String },

    /// A cart mutation returned `userErrors`.
    #[error("cart rejected: {message}")]
    CartUserErrors { message: String },

    /// The response had neither `errors` nor the expected `data`.
    #[error("empty response for {operation}")]
    EmptyResponse { operation: String },

    #[error("pagination limit reached: exceeded {max_pages} pages")]
    PaginationLimit { max_pages: usize },

    #[error("invalid endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
