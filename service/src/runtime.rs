//! Drives the core state machine against the feeds.
//!
//! All mutations of the shared cache flow through here, one event at a
//! time: each classify→mutate→notify sequence holds the write lock end to
//! end, so no second mutation of the prediction slot can interleave even
//! while an outbound send is in flight. Deliveries are fire-and-forget;
//! a failed send or edit is logged and the state transition stands.

use crate::feed::AnnouncementFeed;
use crate::filler;
use crate::state::SharedState;
use chrono::Local;
use presage_core::error::ControlError;
use presage_core::format::{AnnouncementStatus, format_announcement};
use presage_core::{FeedSignal, ServiceCache, advance_prediction_state, pause};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Process one raw inbound feed message end to end. Messages without a
/// recognizable game number are ignored.
pub async fn process_source_text(
    state: &SharedState,
    feed: &Arc<dyn AnnouncementFeed>,
    text: &str,
) {
    let Some(message) = presage_core::classify(text) else {
        return;
    };
    tracing::info!(
        "source message #{} (editing: {}, finalized: {})",
        message.number,
        message.editing,
        message.finalized
    );

    let mut s = state.write().await;
    let now = Local::now().naive_local();
    let signals = advance_prediction_state(&mut s.cache, &message, now);
    execute_signals(&mut s.cache, feed.as_ref(), signals).await;
}

/// Execute the outbound actions a transition produced.
pub async fn execute_signals(
    cache: &mut ServiceCache,
    feed: &dyn AnnouncementFeed,
    signals: Vec<FeedSignal>,
) {
    for signal in signals {
        match signal {
            FeedSignal::Announce { number, suit } => {
                let text = format_announcement(number, suit, AnnouncementStatus::Pending);
                match feed.send(&text).await {
                    Ok(reference) => cache.attach_outbound_ref(number, reference),
                    Err(e) => tracing::error!("announcement send failed: {e}"),
                }
            }
            FeedSignal::EditAnnouncement {
                reference,
                number,
                suit,
                status,
            } => {
                let Some(reference) = reference else {
                    tracing::warn!("no outbound handle for #{number}, skipping edit");
                    continue;
                };
                let text = format_announcement(number, suit, status);
                if let Err(e) = feed.edit(reference, &text).await {
                    tracing::error!("announcement edit failed: {e}");
                }
            }
            FeedSignal::ChannelNotice(text) => {
                if let Err(e) = feed.send(&text).await {
                    tracing::error!("channel notice failed: {e}");
                }
            }
            FeedSignal::AdminNotice(text) => {
                if let Err(e) = feed.notify_admin(&text).await {
                    tracing::error!("admin notice failed: {e}");
                }
            }
        }
    }
}

/// Enter a pause and start the filler loop.
pub async fn pause_service(
    state: &SharedState,
    feed: &Arc<dyn AnnouncementFeed>,
    minutes: u64,
) -> Result<(), ControlError> {
    let mut s = state.write().await;
    let now = Local::now().naive_local();
    let signals = pause::enter_pause(&mut s.cache, minutes, now)?;
    execute_signals(&mut s.cache, feed.as_ref(), signals).await;

    let (stop, handle) = filler::spawn_filler_loop(Arc::clone(state), Arc::clone(feed));
    s.filler_stop = Some(stop);
    s.filler_task = Some(handle);
    Ok(())
}

/// Leave a pause. The filler loop is cancelled and joined before the exit
/// is considered complete.
pub async fn resume_service(
    state: &SharedState,
    feed: &Arc<dyn AnnouncementFeed>,
) -> Result<(), ControlError> {
    let (signals, stop, handle) = {
        let mut s = state.write().await;
        let signals = pause::exit_pause(&mut s.cache)?;
        (signals, s.filler_stop.take(), s.filler_task.take())
    };

    if let Some(stop) = stop {
        let _ = stop.send(true);
    }
    if let Some(handle) = handle {
        if let Err(e) = handle.await {
            tracing::debug!("filler task ended abnormally: {e}");
        }
    }

    let mut s = state.write().await;
    execute_signals(&mut s.cache, feed.as_ref(), signals).await;
    Ok(())
}

/// Coarse background tick that completes timed pauses.
pub fn spawn_auto_resume(state: SharedState, feed: Arc<dyn AnnouncementFeed>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let tick_secs = { state.read().await.config.auto_resume_tick_secs };
        let mut interval = tokio::time::interval(Duration::from_secs(tick_secs.max(1)));
        interval.tick().await; // first tick is immediate
        loop {
            interval.tick().await;
            let due = {
                let s = state.read().await;
                pause::auto_resume_due(&s.cache, Local::now().naive_local())
            };
            if due {
                tracing::info!("auto-resume deadline reached");
                if let Err(e) = resume_service(&state, &feed).await {
                    tracing::debug!("auto-resume raced with manual resume: {e}");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedError;
    use crate::state::ServiceState;
    use async_trait::async_trait;
    use presage_core::MessageRef;
    use presage_core::Suit;
    use presage_core::table::store::TableStore;
    use presage_types::ServiceConfig;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Debug, Default)]
    struct RecordingFeed {
        next_ref: AtomicU64,
        pub sent: Mutex<Vec<String>>,
        pub edits: Mutex<Vec<(MessageRef, String)>>,
        pub admin: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnnouncementFeed for RecordingFeed {
        async fn send(&self, text: &str) -> Result<MessageRef, FeedError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(MessageRef(self.next_ref.fetch_add(1, Ordering::Relaxed)))
        }

        async fn edit(&self, reference: MessageRef, text: &str) -> Result<(), FeedError> {
            self.edits.lock().unwrap().push((reference, text.to_string()));
            Ok(())
        }

        async fn notify_admin(&self, text: &str) -> Result<(), FeedError> {
            self.admin.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    /// Feed whose sends always fail.
    struct DeadFeed;

    #[async_trait]
    impl AnnouncementFeed for DeadFeed {
        async fn send(&self, _text: &str) -> Result<MessageRef, FeedError> {
            Err(FeedError::Unavailable("down".into()))
        }

        async fn edit(&self, _reference: MessageRef, _text: &str) -> Result<(), FeedError> {
            Err(FeedError::Unavailable("down".into()))
        }

        async fn notify_admin(&self, _text: &str) -> Result<(), FeedError> {
            Err(FeedError::Unavailable("down".into()))
        }
    }

    fn test_state() -> SharedState {
        let store = TableStore::new(
            std::env::temp_dir().join(format!("presage-runtime-{}.json", std::process::id())),
        );
        ServiceState::new(ServiceConfig::default(), store).shared()
    }

    #[tokio::test]
    async fn launch_and_win_flow_edits_the_original_announcement() {
        let state = test_state();
        let recording = Arc::new(RecordingFeed::default());
        let feed: Arc<dyn AnnouncementFeed> = recording.clone();
        state.write().await.cache.table.insert(12, Suit::Hearts);

        process_source_text(&state, &feed, "#N 10 (♠️) ✅").await;
        {
            let s = state.read().await;
            assert_eq!(s.cache.record().unwrap().number, 12);
            assert_eq!(s.cache.record().unwrap().outbound_ref, Some(MessageRef(0)));
        }

        process_source_text(&state, &feed, "#N 12 (♥️ ♣️) ✅").await;
        let s = state.read().await;
        assert!(!s.cache.has_record());
        assert_eq!(s.cache.ledger.wins, 1);

        let sent = recording.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("#12"));
        let edits = recording.edits.lock().unwrap();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, MessageRef(0));
        assert!(edits[0].1.contains("✅0️⃣"));
    }

    #[tokio::test]
    async fn messages_without_a_number_are_ignored() {
        let state = test_state();
        let feed: Arc<dyn AnnouncementFeed> = Arc::new(RecordingFeed::default());
        state.write().await.cache.table.insert(12, Suit::Hearts);

        process_source_text(&state, &feed, "maintenance notice (♥️)").await;
        let s = state.read().await;
        assert_eq!(s.cache.last_source_number, 0);
        assert!(!s.cache.has_record());
    }

    #[tokio::test]
    async fn delivery_failure_does_not_roll_back_state() {
        let state = test_state();
        let feed: Arc<dyn AnnouncementFeed> = Arc::new(DeadFeed);
        state.write().await.cache.table.insert(12, Suit::Hearts);

        process_source_text(&state, &feed, "#N 10 ✅").await;
        {
            let s = state.read().await;
            let record = s.cache.record().unwrap();
            assert_eq!(record.number, 12);
            assert_eq!(record.outbound_ref, None);
        }

        // Resolution still happens; the edit is skipped for want of a handle.
        process_source_text(&state, &feed, "#N 12 (♥️) ✅").await;
        let s = state.read().await;
        assert!(!s.cache.has_record());
        assert_eq!(s.cache.ledger.wins, 1);
    }

    #[tokio::test]
    async fn pause_and_resume_round_trip_joins_the_filler_task() {
        let state = test_state();
        let feed: Arc<dyn AnnouncementFeed> = Arc::new(RecordingFeed::default());

        pause_service(&state, &feed, 0).await.unwrap();
        {
            let s = state.read().await;
            assert!(s.cache.pause.is_paused);
            assert!(s.filler_task.is_some());
        }
        assert_eq!(
            pause_service(&state, &feed, 5).await,
            Err(ControlError::AlreadyPaused)
        );

        resume_service(&state, &feed).await.unwrap();
        let s = state.read().await;
        assert!(!s.cache.pause.is_paused);
        assert!(s.filler_task.is_none());
        assert!(s.filler_stop.is_none());
    }
}
