//! Python bindings for the kindred related-title discovery engine.
//!
//! Exposes the synchronous surface - keyword extraction, capability flags
//! and strategy selection, and work records - so Python hosts can reuse the
//! exact tokenization and precedence rules of the Rust engine.

use kindred::discovery::{select_strategy, EmptyReason, Strategy};
use kindred::keywords::{ExtractorConfig, KeywordExtractor};
use kindred::model::{Work, WorkStatus};
use kindred::source::Capabilities;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Python wrapper for a catalogue work record.
#[pyclass(name = "Work")]
#[derive(Clone)]
pub struct PyWork {
    inner: Work,
}

#[pymethods]
impl PyWork {
    /// Creates a work from its locator and title.
    #[new]
    fn new(locator: String, title: String) -> Self {
        Self {
            inner: Work::new(locator, title),
        }
    }

    /// The source-relative locator. The identity key for deduplication.
    #[getter]
    fn locator(&self) -> String {
        self.inner.locator.clone()
    }

    /// The display title.
    #[getter]
    fn title(&self) -> String {
        self.inner.title.clone()
    }

    /// Sets the author.
    fn set_author(&mut self, author: String) {
        self.inner.author = Some(author);
    }

    /// Sets the publication status from its snake_case name.
    fn set_status(&mut self, status: &str) -> PyResult<()> {
        let json = format!("\"{status}\"");
        self.inner.status = serde_json::from_str::<WorkStatus>(&json)
            .map_err(|_| PyValueError::new_err(format!("unknown status: {status}")))?;
        Ok(())
    }

    /// Whether two records point at the same catalogue item.
    fn same_item(&self, other: &PyWork) -> bool {
        self.inner.same_item(&other.inner)
    }

    fn __repr__(&self) -> String {
        format!("Work(locator={:?}, title={:?})", self.inner.locator, self.inner.title)
    }
}

/// Python wrapper for source capability flags.
#[pyclass(name = "Capabilities")]
#[derive(Clone)]
pub struct PyCapabilities {
    inner: Capabilities,
}

#[pymethods]
impl PyCapabilities {
    /// Creates capabilities from individual flags.
    #[new]
    #[pyo3(signature = (
        custom_override = false,
        extension_list = false,
        keyword_fallback_disabled = false,
        discovery_disabled = false
    ))]
    fn new(
        custom_override: bool,
        extension_list: bool,
        keyword_fallback_disabled: bool,
        discovery_disabled: bool,
    ) -> Self {
        Self {
            inner: Capabilities {
                custom_override,
                extension_list,
                keyword_fallback_disabled,
                discovery_disabled,
            },
        }
    }

    /// Maps the raw flags of a source descriptor.
    #[staticmethod]
    fn from_source_flags(
        related_supported: bool,
        related_via_extension_only: bool,
        related_disabled: bool,
    ) -> Self {
        Self {
            inner: Capabilities::from_source_flags(
                related_supported,
                related_via_extension_only,
                related_disabled,
            ),
        }
    }

    /// The strategy the engine would select, as a string:
    /// one of "custom_override", "fixed_list", "keyword_search",
    /// "empty:disabled", "empty:no_capability".
    fn strategy(&self) -> String {
        match select_strategy(&self.inner) {
            Strategy::CustomOverride => "custom_override".to_string(),
            Strategy::FixedList => "fixed_list".to_string(),
            Strategy::KeywordSearch => "keyword_search".to_string(),
            Strategy::Empty {
                reason: EmptyReason::Disabled,
            } => "empty:disabled".to_string(),
            Strategy::Empty {
                reason: EmptyReason::NoCapability,
            } => "empty:no_capability".to_string(),
        }
    }

    fn __repr__(&self) -> String {
        format!("Capabilities(strategy={})", self.strategy())
    }
}

/// Python wrapper for the keyword extractor.
#[pyclass(name = "KeywordExtractor")]
pub struct PyKeywordExtractor {
    inner: KeywordExtractor,
}

#[pymethods]
impl PyKeywordExtractor {
    /// Creates an extractor. `stop_tokens` replaces the default stop list
    /// when given; `max_keywords` caps the result.
    #[new]
    #[pyo3(signature = (min_token_len = 1, stop_tokens = None, max_keywords = None))]
    fn new(
        min_token_len: usize,
        stop_tokens: Option<Vec<String>>,
        max_keywords: Option<usize>,
    ) -> PyResult<Self> {
        let mut config = ExtractorConfig::new().with_min_token_len(min_token_len);
        if let Some(tokens) = stop_tokens {
            config = config.with_stop_tokens(tokens);
        }
        config.max_keywords = max_keywords;

        let inner = KeywordExtractor::new(config)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Splits a title into ordered, deduplicated search keywords.
    fn extract(&self, title: &str) -> Vec<String> {
        self.inner.extract(title)
    }
}

/// The kindred Python module.
#[pymodule]
fn kindred_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyWork>()?;
    m.add_class::<PyCapabilities>()?;
    m.add_class::<PyKeywordExtractor>()?;

    m.add("__version__", "0.1.0")?;
    m.add("__rust_version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
