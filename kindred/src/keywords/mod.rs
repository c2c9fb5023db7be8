//! Keyword extraction from work titles.

mod extractor;

pub use extractor::{ExtractorConfig, KeywordExtractor};
