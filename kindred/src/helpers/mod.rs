//! Helper modules: scripted mock collaborators for tests and downstream
//! consumers.

pub mod mocks;

pub use mocks::{MockExtensionList, MockRelatedOverride, MockSearchBackend};
