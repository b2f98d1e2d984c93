//! MORRE Client Library
//!
//! Typed client for the MORRE model repository query service.
//!
//! # Overview
//!
//! - **Model search**: free text, aggregated/ranked, feature-based and
//!   single-keyword ([`MorreClient::model_query`] and friends)
//! - **Person, publication and annotation search**
//! - **Feature discovery**: [`MorreClient::query_features`] lists the keywords
//!   a query type accepts; [`FeatureVocabulary`] snapshots them so
//!   [`FeatureSet`]s can be checked before sending
//! - **Errors**: every call returns [`Result`], failing with a client,
//!   communication or service tier error ([`ErrorKind`])
//!
//! # Example
//!
//! ```no_run
//! use morre_client::{ErrorKind, FeatureSet, MorreClient};
//!
//! # async fn run() -> morre_client::Result<()> {
//! let client = MorreClient::new("http://localhost:7474/morre/")?;
//!
//! let vocabulary = client.vocabulary("person_query").await?;
//! let features = vocabulary.builder().feature("LASTNAME", "Teusink")?.build();
//!
//! match client.do_person_query(&features).await {
//!     Ok(persons) => println!("{} persons", persons.len()),
//!     Err(e) if e.kind() == ErrorKind::Communication => eprintln!("retry later: {e}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod features;
pub mod types;

// Re-export commonly used types
pub use client::MorreClient;
pub use config::ClientConfig;
pub use error::{
    ClientError, CommunicationError, ErrorKind, MorreError, Result, ServiceError,
};
pub use features::{FeatureSet, FeatureSetBuilder, FeatureVocabulary};
pub use types::{
    AnnotationResult, ModelResult, PersonResult, PublicationResult, QueryResult, QueryType,
};
