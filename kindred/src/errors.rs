//! Error types for related-title discovery.
//!
//! Only [`DiscoveryError::Unsupported`] is fatal to a discovery call as a
//! whole. Backend failures are scoped to the keyword that triggered them,
//! captured as [`KeywordFailure`] records, and reported through the sink's
//! error side-channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for discovery operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No discovery is possible for this source (disabled, or no capability).
    #[error("related discovery unsupported: {reason}")]
    Unsupported {
        /// Why the strategy selector rejected the call.
        reason: String,
    },

    /// The caller stopped consuming mid-flight.
    #[error("discovery cancelled: {0}")]
    Cancelled(String),

    /// A search backend call failed.
    #[error("{0}")]
    Backend(#[from] BackendError),

    /// A generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DiscoveryError {
    /// Creates an unsupported error with the given reason.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    /// Returns true if the error is the synchronous unsupported signal.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Classification of a failed backend search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendErrorKind {
    /// Network-level failure (timeout, connection reset, DNS).
    Transport,
    /// The response could not be parsed into a page of works.
    Parse,
    /// The filter list was rejected by the backend.
    InvalidFilters,
    /// Anything else.
    #[default]
    Other,
}

/// A failed call to the search backend, scoped to one query and page.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("search for '{query}' page {page} failed: {message}")]
pub struct BackendError {
    /// The query that was being searched.
    pub query: String,
    /// The page number that failed.
    pub page: u32,
    /// Failure classification.
    pub kind: BackendErrorKind,
    /// Human-readable failure message.
    pub message: String,
}

impl BackendError {
    /// Creates a new backend error for a query.
    #[must_use]
    pub fn new(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            kind: BackendErrorKind::default(),
            message: message.into(),
        }
    }

    /// Sets the page number.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the failure classification.
    #[must_use]
    pub fn with_kind(mut self, kind: BackendErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("query".to_string(), serde_json::json!(self.query));
        map.insert("page".to_string(), serde_json::json!(self.page));
        map.insert("kind".to_string(), serde_json::json!(self.kind));
        map.insert("message".to_string(), serde_json::json!(self.message));
        map
    }
}

/// Record of one keyword's failed search branch.
///
/// Failures are absorbed per keyword: the record is handed to the sink's
/// error callback and kept in the aggregator's summary, and the remaining
/// keywords run unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordFailure {
    /// The keyword whose search failed.
    pub keyword: String,
    /// The page number being fetched when the failure occurred.
    pub page: u32,
    /// Error message.
    pub error: String,
    /// When the failure was recorded.
    pub timestamp: DateTime<Utc>,
}

impl KeywordFailure {
    /// Creates a new failure record.
    #[must_use]
    pub fn new(keyword: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            page: 1,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }

    /// Sets the page number.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("keyword".to_string(), serde_json::json!(self.keyword));
        map.insert("page".to_string(), serde_json::json!(self.page));
        map.insert("error".to_string(), serde_json::json!(self.error));
        map.insert(
            "timestamp".to_string(),
            serde_json::json!(self.timestamp.to_rfc3339()),
        );
        map
    }
}
