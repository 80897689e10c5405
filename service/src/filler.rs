//! The filler-announcement loop that runs while paused.
//!
//! One filler goes out per interval, drawn from the pool without
//! repetition until it is exhausted. The loop is a cancellable task: it
//! watches a stop channel at every sleep boundary so pause-exit is
//! observed promptly, and checks the auto-resume deadline each iteration —
//! when the deadline has passed the loop completes the exit itself rather
//! than leaving the pause set until the next coarse ticker check.

use crate::feed::AnnouncementFeed;
use crate::runtime;
use crate::state::SharedState;
use chrono::Local;
use presage_core::pause;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

enum Tick {
    Filler(Option<String>, u64),
    Done,
}

/// Spawn the filler loop. The returned sender stops the loop; the handle
/// must be joined before a pause-exit is considered complete.
pub fn spawn_filler_loop(
    state: SharedState,
    feed: Arc<dyn AnnouncementFeed>,
) -> (watch::Sender<bool>, JoinHandle<()>) {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        loop {
            let tick = {
                let mut s = state.write().await;
                let now = Local::now().naive_local();
                if pause::auto_resume_due(&s.cache, now) {
                    // Deadline reached: exit the pause from here. The loop
                    // cannot join its own handle, so the stored stop/handle
                    // pair is dropped instead of awaited.
                    match pause::exit_pause(&mut s.cache) {
                        Ok(signals) => {
                            s.filler_stop = None;
                            s.filler_task = None;
                            tracing::info!("auto-resume deadline reached");
                            runtime::execute_signals(&mut s.cache, feed.as_ref(), signals)
                                .await;
                        }
                        Err(e) => tracing::debug!("auto-resume raced with resume: {e}"),
                    }
                    Tick::Done
                } else if !s.cache.pause.is_paused {
                    Tick::Done
                } else {
                    Tick::Filler(s.fillers.next(), s.config.filler_interval_secs)
                }
            };

            let (filler, interval_secs) = match tick {
                Tick::Done => break,
                Tick::Filler(filler, interval_secs) => (filler, interval_secs),
            };

            if let Some(text) = filler {
                match feed.send(&text).await {
                    Ok(_) => tracing::info!("filler announcement sent"),
                    Err(e) => tracing::error!("filler send failed: {e}"),
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(interval_secs.max(1))) => {}
                _ = stop_rx.changed() => break,
            }
        }
        tracing::debug!("filler loop finished");
    });

    (stop_tx, handle)
}
