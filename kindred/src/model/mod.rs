//! Data model for catalogue works and discovery requests.

mod request;
mod work;

pub use request::{DiscoveryRequest, FilterList};
pub use work::{Work, WorkPage, WorkStatus};
