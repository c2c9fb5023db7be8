//! Bridges sink pushes into a consumable event stream.

use super::{DiscoverySink, GroupUpdate};
use crate::errors::KeywordFailure;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One event on the consumer side of a [`ChannelSink`].
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// An incremental group update.
    Update(GroupUpdate),
    /// An absorbed per-keyword failure.
    Error {
        /// The group label the failure belongs to.
        label: String,
        /// The failure record.
        failure: KeywordFailure,
    },
}

/// A sink that forwards every push into an unbounded channel, turning the
/// callback protocol into a stream the caller can `recv` from.
///
/// Dropping the receiver is how a caller stops consuming; sends to a closed
/// channel are silently discarded rather than treated as errors.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<StreamEvent>,
}

impl ChannelSink {
    /// Creates a sink plus the receiving end of its stream.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl DiscoverySink for ChannelSink {
    async fn push_group(&self, update: GroupUpdate) {
        let _ = self.tx.send(StreamEvent::Update(update));
    }

    fn record_error(&self, label: &str, failure: &KeywordFailure) {
        let _ = self.tx.send(StreamEvent::Error {
            label: label.to_string(),
            failure: failure.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Work;

    #[tokio::test]
    async fn test_channel_sink_forwards_events() {
        let (sink, mut rx) = ChannelSink::new();

        sink.push_group(GroupUpdate::new(
            "great",
            vec![Work::new("/a", "A")],
            false,
        ))
        .await;
        sink.record_error("adventure", &KeywordFailure::new("adventure", "boom"));

        match rx.recv().await.unwrap() {
            StreamEvent::Update(update) => {
                assert_eq!(update.label, "great");
                assert_eq!(update.works.len(), 1);
            }
            StreamEvent::Error { .. } => panic!("expected update first"),
        }
        match rx.recv().await.unwrap() {
            StreamEvent::Error { label, failure } => {
                assert_eq!(label, "adventure");
                assert_eq!(failure.error, "boom");
            }
            StreamEvent::Update(_) => panic!("expected error second"),
        }
    }

    #[tokio::test]
    async fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);

        sink.push_group(GroupUpdate::new("great", Vec::new(), true))
            .await;
        sink.record_error("great", &KeywordFailure::new("great", "boom"));
        // Should not panic
    }
}
