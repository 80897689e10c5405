//! Launch decisions for new predictions.
//!
//! The scheduler owns the trigger-distance rule and, together with the
//! slot guard in [`ServiceCache`], the single-in-flight rule: a launch
//! while a prediction is already being verified is contention, rejected
//! with no side effects.

use super::FeedSignal;
use crate::state::{PredictionRecord, ServiceCache};
use crate::suit::Suit;
use crate::table::LookupTable;
use chrono::NaiveDateTime;

/// Attempt to launch a prediction off the latest source number. Returns the
/// signals to execute; an empty vec means nothing was launched this cycle.
pub fn try_launch(
    cache: &mut ServiceCache,
    source_number: u64,
    now: NaiveDateTime,
) -> Vec<FeedSignal> {
    if cache.pause.is_paused {
        tracing::debug!("launch suppressed: pause active");
        return Vec::new();
    }

    if let Some(record) = cache.record() {
        tracing::warn!(
            "launch blocked: prediction #{} still verifying",
            record.number
        );
        return Vec::new();
    }

    if cache.table.is_empty() {
        tracing::debug!("lookup table empty, no candidate");
        return Vec::new();
    }

    let Some((target, suit)) =
        find_candidate(&cache.table, source_number, cache.settings.trigger_distance)
    else {
        return Vec::new();
    };

    let record = PredictionRecord {
        number: target,
        suit,
        offset: 0,
        outbound_ref: None,
        trigger: source_number,
        created_at: now,
    };
    if cache.install_record(record).is_err() {
        // Unreachable given the guard above; refuse rather than clobber.
        return Vec::new();
    }

    tracing::info!("prediction #{target} ({suit}) launched [trigger #{source_number}]");
    vec![FeedSignal::Announce {
        number: target,
        suit,
    }]
}

/// First table entry within the trigger window, smallest offset wins.
fn find_candidate(
    table: &LookupTable,
    source_number: u64,
    trigger_distance: u64,
) -> Option<(u64, Suit)> {
    (1..=trigger_distance).find_map(|offset| {
        let candidate = source_number + offset;
        table.get(candidate).map(|suit| (candidate, suit))
    })
}
