//! Error types for the MORRE client
//!
//! Every operation fails with exactly one of three tiers, so callers can
//! handle them distinctly:
//!
//! - [`ClientError`]: the request was rejected locally and never sent
//! - [`CommunicationError`]: the transport failed or the response was unreadable
//! - [`ServiceError`]: MORRE answered and refused the request
//!
//! [`MorreError::kind`] flattens the tier into an [`ErrorKind`] for `match`
//! arms that do not care about the details.

use std::fmt;
use thiserror::Error;

/// Result type alias for MORRE client operations
pub type Result<T> = std::result::Result<T, MorreError>;

/// The three failure tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Client,
    Communication,
    Service,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Client => "client",
            ErrorKind::Communication => "communication",
            ErrorKind::Service => "service",
        };
        f.write_str(name)
    }
}

/// Top-level error returned by every [`MorreClient`](crate::MorreClient) call
#[derive(Error, Debug)]
pub enum MorreError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Communication error: {0}")]
    Communication(#[from] CommunicationError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl MorreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MorreError::Client(_) => ErrorKind::Client,
            MorreError::Communication(_) => ErrorKind::Communication,
            MorreError::Service(_) => ErrorKind::Service,
        }
    }

    /// Only transport failures are worth retrying; the client itself never does.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Communication
    }

    pub fn empty_argument(name: &'static str) -> Self {
        Self::Client(ClientError::EmptyArgument(name))
    }

    pub fn unknown_feature(query_type: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self::Client(ClientError::UnknownFeature {
            query_type: query_type.into(),
            keyword: keyword.into(),
        })
    }

    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Client(ClientError::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        })
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Client(ClientError::Config(msg.into()))
    }
}

/// Local misuse: bad arguments or configuration. Never reaches the network.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0} cannot be empty")]
    EmptyArgument(&'static str),

    #[error("Feature set for query type '{0}' contains no features")]
    EmptyFeatureSet(String),

    #[error("Unknown feature '{keyword}' for query type '{query_type}'. Run 'morre features {query_type}' to list the valid keywords.")]
    UnknownFeature { query_type: String, keyword: String },

    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Failed to set up HTTP transport: {0}")]
    HttpSetup(#[source] reqwest::Error),
}

/// Transport-level failure
#[derive(Error, Debug)]
pub enum CommunicationError {
    #[error("Request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not connect to {url}. Check that the MORRE server is running and reachable.")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {url} reported success but carried no data")]
    MissingData { url: String },
}

impl CommunicationError {
    /// Classify a `reqwest` failure for the request to `url`.
    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            Self::Timeout { url, source }
        } else if source.is_connect() {
            Self::Connect { url, source }
        } else {
            Self::Transport { url, source }
        }
    }
}

/// MORRE received the request and refused or failed it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("MORRE rejected '{endpoint}'{}: {message}", http_status(.status))]
pub struct ServiceError {
    /// Query endpoint, e.g. `query/simple_model_query`
    pub endpoint: String,
    /// HTTP status of the response
    pub status: Option<u16>,
    /// Message reported by the server
    pub message: String,
}

impl ServiceError {
    pub fn new(endpoint: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }
}

/// " (HTTP 404)" when the status is known
fn http_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}
