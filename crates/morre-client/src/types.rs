//! Query types, result records and wire envelopes
//!
//! The result records mirror what the MORRE service returns. Only the
//! identifier is required; everything else is optional, and fields this
//! client does not know about are kept in `extra` rather than dropped.

use crate::error::{MorreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Query types
// ============================================================================

/// Server-defined query category.
///
/// Legal values are discovered at runtime; the associated constants name the
/// categories this client addresses directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryType(String);

impl QueryType {
    pub const MODEL: &'static str = "model_query";
    pub const PERSON: &'static str = "person_query";
    pub const PUBLICATION: &'static str = "publication_query";
    pub const ANNOTATION: &'static str = "annotation_query";

    /// Create a query type, rejecting blank names.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(MorreError::empty_argument("query type"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn model() -> Self {
        Self(Self::MODEL.to_string())
    }

    pub fn person() -> Self {
        Self(Self::PERSON.to_string())
    }

    pub fn publication() -> Self {
        Self(Self::PUBLICATION.to_string())
    }

    pub fn annotation() -> Self {
        Self(Self::ANNOTATION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for QueryType {
    type Err = MorreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// ============================================================================
// Result records
// ============================================================================

/// Common view over the four result record kinds
pub trait QueryResult {
    /// Identifier of the matched entity
    fn identifier(&self) -> &str;

    /// Relevance score assigned by the server, if any
    fn score(&self) -> Option<f64>;

    /// Short human-readable title
    fn label(&self) -> Option<String>;
}

/// A matched model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResult {
    #[serde(rename = "modelID")]
    pub model_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// URI of the model document (SBML, CellML, ...)
    #[serde(rename = "documentURI", skip_serializing_if = "Option::is_none")]
    pub document_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub persons: Vec<PersonResult>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<PublicationResult>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryResult for ModelResult {
    fn identifier(&self) -> &str {
        &self.model_id
    }

    fn score(&self) -> Option<f64> {
        self.score
    }

    fn label(&self) -> Option<String> {
        self.model_name.clone()
    }
}

/// A matched person (author, curator, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResult {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// Identifiers of models this person is attached to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersonResult {
    /// "First Last", or whichever part is present
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        }
    }
}

impl QueryResult for PersonResult {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn score(&self) -> Option<f64> {
        self.score
    }

    fn label(&self) -> Option<String> {
        self.full_name().or_else(|| self.email.clone())
    }
}

/// A matched publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationResult {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<PersonResult>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryResult for PublicationResult {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn score(&self) -> Option<f64> {
        self.score
    }

    fn label(&self) -> Option<String> {
        self.title.clone()
    }
}

/// A matched annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationResult {
    pub id: String,

    /// Annotated resource, typically an identifiers.org URI
    #[serde(rename = "resourceURI", skip_serializing_if = "Option::is_none")]
    pub resource_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryResult for AnnotationResult {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn score(&self) -> Option<f64> {
        self.score
    }

    fn label(&self) -> Option<String> {
        self.resource_uri.clone()
    }
}

// ============================================================================
// Wire envelopes
// ============================================================================

/// Standard MORRE response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error body as sent with non-2xx statuses; either field may be present
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KeywordRequest<'a> {
    pub keyword: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AggregatedRequest<'a> {
    pub keyword: &'a str,
    pub aggregation_type: &'a str,
    pub rankers_weights: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryFeaturesRequest<'a> {
    pub query_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeatureQueryRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<&'a str>,
    pub features: &'a crate::features::FeatureSet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SimpleModelRequest<'a> {
    pub query_type: &'a str,
    pub keyword: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rankers_weights: Option<&'a str>,
}
