//! Per-call strategy selection over source capability flags.

use crate::source::Capabilities;
use serde::{Deserialize, Serialize};

/// Why the empty strategy was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// Related discovery is switched off for this source.
    Disabled,
    /// Nothing left to run: no override, no fixed list, and the
    /// keyword-search fallback is opted out.
    NoCapability,
}

/// Exactly one strategy applies per discovery call.
///
/// The original dispatch chain was default/virtual method resolution
/// (custom method, then extension-provided method, then keyword search);
/// selecting an explicit variant once per call makes the precedence
/// independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum Strategy {
    /// No search performed; the call resolves immediately.
    Empty {
        /// Why nothing runs.
        reason: EmptyReason,
    },
    /// The source's own discovery routine runs, unmodified.
    CustomOverride,
    /// The source's fixed related list is emitted as one synthetic group.
    FixedList,
    /// Title keywords fan out into one bounded search stream each.
    KeywordSearch,
}

/// Selects the strategy for one call. Fixed, non-configurable precedence:
/// disabled, custom override, fixed list, keyword fallback.
#[must_use]
pub fn select_strategy(caps: &Capabilities) -> Strategy {
    if caps.discovery_disabled {
        return Strategy::Empty {
            reason: EmptyReason::Disabled,
        };
    }
    if caps.custom_override {
        return Strategy::CustomOverride;
    }
    if caps.extension_list {
        return Strategy::FixedList;
    }
    if caps.keyword_fallback_disabled {
        Strategy::Empty {
            reason: EmptyReason::NoCapability,
        }
    } else {
        Strategy::KeywordSearch
    }
}
