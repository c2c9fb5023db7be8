//! Splits a work's title into normalized, searchable keywords.

use crate::errors::DiscoveryError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Tokens dropped because they mark volumes, chapters or similar counters
/// rather than carrying searchable meaning. Pinned by tests.
const DEFAULT_STOP_TOKENS: &[&str] = &[
    "vol", "volume", "ch", "chapter", "season", "part", "episode", "ep",
];

/// Splits title tokens on whitespace and separator punctuation.
const SEPARATOR_PATTERN: &str = r"[\s\p{P}~+=|]+";

/// Matches a stop token fused with a counter, e.g. `vol3` or `ch12`.
const FUSED_MARKER_PATTERN: &str = r"^(?:vol|volume|ch|chapter|season|part|episode|ep)\d+$";

/// Configuration for [`KeywordExtractor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Tokens at or below this length are dropped.
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    /// Tokens dropped outright (compared case-insensitively).
    #[serde(default = "default_stop_tokens")]
    pub stop_tokens: Vec<String>,
    /// Whether purely numeric tokens are dropped.
    #[serde(default = "default_true")]
    pub drop_numeric: bool,
    /// Optional cap on the number of keywords returned.
    #[serde(default)]
    pub max_keywords: Option<usize>,
}

fn default_min_token_len() -> usize {
    1
}

fn default_stop_tokens() -> Vec<String> {
    DEFAULT_STOP_TOKENS.iter().map(|s| (*s).to_string()).collect()
}

fn default_true() -> bool {
    true
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
            stop_tokens: default_stop_tokens(),
            drop_numeric: default_true(),
            max_keywords: None,
        }
    }
}

impl ExtractorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum token length.
    #[must_use]
    pub fn with_min_token_len(mut self, len: usize) -> Self {
        self.min_token_len = len;
        self
    }

    /// Replaces the stop-token list.
    #[must_use]
    pub fn with_stop_tokens(mut self, tokens: Vec<String>) -> Self {
        self.stop_tokens = tokens;
        self
    }

    /// Caps the number of keywords returned.
    #[must_use]
    pub fn with_max_keywords(mut self, max: usize) -> Self {
        self.max_keywords = Some(max);
        self
    }
}

/// Splits and strips a title into an ordered, deduplicated keyword set.
///
/// Extraction never fails: the worst case for a stripped-down or empty
/// title is an empty set, which callers must treat as "no keyword-driven
/// search possible" rather than an error.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    config: ExtractorConfig,
    stop_tokens: HashSet<String>,
    separators: Regex,
    fused_marker: Regex,
}

impl KeywordExtractor {
    /// Creates an extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Result<Self, DiscoveryError> {
        let separators = Regex::new(SEPARATOR_PATTERN)
            .map_err(|e| DiscoveryError::Internal(format!("separator pattern: {e}")))?;
        let fused_marker = Regex::new(FUSED_MARKER_PATTERN)
            .map_err(|e| DiscoveryError::Internal(format!("marker pattern: {e}")))?;
        let stop_tokens = config
            .stop_tokens
            .iter()
            .map(|t| t.to_lowercase())
            .collect();

        Ok(Self {
            config,
            stop_tokens,
            separators,
            fused_marker,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts search keywords from a title.
    ///
    /// Keywords are lowercased, deduplicated case-insensitively, and keep
    /// first-seen order.
    #[must_use]
    pub fn extract(&self, title: &str) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut keywords = Vec::new();

        for token in self.separators.split(title.trim()) {
            let token = token.trim().to_lowercase();
            if !self.keep(&token) {
                continue;
            }
            if seen.insert(token.clone()) {
                keywords.push(token);
                if let Some(max) = self.config.max_keywords {
                    if keywords.len() >= max {
                        break;
                    }
                }
            }
        }

        keywords
    }

    fn keep(&self, token: &str) -> bool {
        if token.len() <= self.config.min_token_len {
            return false;
        }
        if self.config.drop_numeric && token.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        if self.stop_tokens.contains(token) {
            return false;
        }
        if self.fused_marker.is_match(token) {
            return false;
        }
        true
    }
}

impl Default for KeywordExtractor {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        // The built-in patterns are static and known to compile.
        Self::new(ExtractorConfig::default()).expect("default extractor config is valid")
    }
}
