//! The outbound feed seam.
//!
//! The state machine only needs three operations: send a new announcement,
//! edit one by handle, and message the administrator. Real transports plug
//! in behind [`AnnouncementFeed`]; the shipped [`LogFeed`] mirrors
//! everything to the log so the service runs without one.

use async_trait::async_trait;
use presage_core::MessageRef;
use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery failure on the outbound feed. Logged by callers, never
/// retried: in-memory state stays authoritative.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("outbound feed unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AnnouncementFeed: Send + Sync {
    /// Send a new message, returning a handle usable for later edits.
    async fn send(&self, text: &str) -> Result<MessageRef, FeedError>;

    /// Edit a previously sent message in place.
    async fn edit(&self, reference: MessageRef, text: &str) -> Result<(), FeedError>;

    /// Message the administrator on the command channel.
    async fn notify_admin(&self, text: &str) -> Result<(), FeedError>;
}

/// Feed that writes announcements to the log, handing out sequential
/// handles so edit flows stay exercised.
#[derive(Debug, Default)]
pub struct LogFeed {
    next_ref: AtomicU64,
}

impl LogFeed {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnnouncementFeed for LogFeed {
    async fn send(&self, text: &str) -> Result<MessageRef, FeedError> {
        let reference = MessageRef(self.next_ref.fetch_add(1, Ordering::Relaxed));
        tracing::info!("[announce {:?}] {}", reference, text.replace('\n', " | "));
        Ok(reference)
    }

    async fn edit(&self, reference: MessageRef, text: &str) -> Result<(), FeedError> {
        tracing::info!("[edit {:?}] {}", reference, text.replace('\n', " | "));
        Ok(())
    }

    async fn notify_admin(&self, text: &str) -> Result<(), FeedError> {
        tracing::info!("[admin] {}", text.replace('\n', " | "));
        Ok(())
    }
}
