//! Capability flags reported by a source descriptor.

use serde::{Deserialize, Serialize};

/// What kinds of related-title discovery a source supports.
///
/// The flags are independent; [`crate::discovery::select_strategy`] turns
/// them into exactly one strategy per call with a fixed precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// The source ships its own discovery routine that replaces the engine's
    /// keyword search entirely.
    #[serde(default)]
    pub custom_override: bool,
    /// The source provides a fixed, ready-made related list.
    #[serde(default)]
    pub extension_list: bool,
    /// The source opts out of the keyword-search fallback.
    #[serde(default)]
    pub keyword_fallback_disabled: bool,
    /// Related discovery is disabled for this source entirely.
    #[serde(default)]
    pub discovery_disabled: bool,
}

impl Capabilities {
    /// Creates capabilities with everything off except the keyword-search
    /// fallback, which is the default path for sources that declare nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps the raw flags of a source descriptor.
    ///
    /// `related_supported` means the source brings its own related-title
    /// routine; `related_via_extension_only` opts out of the keyword-search
    /// fallback; `related_disabled` switches discovery off entirely.
    #[must_use]
    pub fn from_source_flags(
        related_supported: bool,
        related_via_extension_only: bool,
        related_disabled: bool,
    ) -> Self {
        Self {
            custom_override: related_supported,
            extension_list: false,
            keyword_fallback_disabled: related_via_extension_only,
            discovery_disabled: related_disabled,
        }
    }

    /// Marks the source as shipping a custom override.
    #[must_use]
    pub fn with_custom_override(mut self) -> Self {
        self.custom_override = true;
        self
    }

    /// Marks the source as providing a fixed related list.
    #[must_use]
    pub fn with_extension_list(mut self) -> Self {
        self.extension_list = true;
        self
    }

    /// Opts out of the keyword-search fallback.
    #[must_use]
    pub fn without_keyword_fallback(mut self) -> Self {
        self.keyword_fallback_disabled = true;
        self
    }

    /// Disables related discovery entirely.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.discovery_disabled = true;
        self
    }
}
