//! The related-title discovery core.
//!
//! This module contains:
//! - Strategy selection over source capability flags
//! - The per-keyword fan-out orchestrator with bounded paging
//! - The per-call result aggregator (dedup, completion tracking)
//! - The engine facade tying the pieces together

mod aggregator;
mod engine;
mod group;
mod orchestrator;
mod outcome;
mod strategy;

#[cfg(test)]
mod integration_tests;

pub use aggregator::{AggregatingSink, DiscoveryReport, ResultAggregator};
pub use engine::{DiscoveryEngine, DiscoveryEngineBuilder, EXTENSION_GROUP_LABEL};
pub use group::RelatedGroup;
pub use orchestrator::{KeywordSearchOrchestrator, OrchestratorConfig};
pub use outcome::DiscoveryOutcome;
pub use strategy::{select_strategy, EmptyReason, Strategy};
