//! Contracts consumed from the catalogue source.
//!
//! The engine never fetches or parses anything itself; sources plug in
//! behind these traits and the capability flags of their descriptor decide
//! which discovery strategy runs.

mod backend;
mod capabilities;

pub use backend::{ExtensionList, RelatedOverride, SearchBackend};
pub use capabilities::Capabilities;
