//! Push-based result streaming.
//!
//! Discovery results are pushed to a [`DiscoverySink`] as they become
//! available; per-keyword failures travel on a side channel and never
//! terminate the stream.

mod channel;
mod sink;

pub use channel::{ChannelSink, StreamEvent};
pub use sink::{CollectingSink, DiscoverySink, GroupUpdate, LoggingSink, NoOpSink};
