//! Verification of the in-flight prediction.
//!
//! The slot walks `EMPTY → PENDING → {WON, LOST, EXPIRED} → EMPTY`. Each
//! classified source message either expires the slot, advances it one
//! step, resolves it, or is ignored as out of sequence. A feed that jumps
//! past the expected number never self-advances the offset and never
//! counts a loss; only the timeout resolves such a slot (missing-step and
//! wrong-suit are distinct paths).

use super::{FeedSignal, scheduler};
use crate::classify::SourceMessage;
use crate::format::AnnouncementStatus;
use crate::ledger::CHECK_STEPS;
use crate::state::cache::MAX_CHECK_OFFSET;
use crate::state::ServiceCache;
use chrono::NaiveDateTime;

/// Advance the state machine with one classified source message and return
/// the outbound actions to perform.
///
/// The expiry check always runs before any launch attempt on the same
/// number, so a freshly expired slot may immediately accept a new
/// prediction within the same processing step. Likewise a win or loss
/// frees the slot for a relaunch off the same number.
pub fn advance_prediction_state(
    cache: &mut ServiceCache,
    msg: &SourceMessage,
    now: NaiveDateTime,
) -> Vec<FeedSignal> {
    cache.last_source_number = msg.number;

    let Some((predicted, expected)) = cache
        .record()
        .map(|r| (r.number, r.expected_number()))
    else {
        return scheduler::try_launch(cache, msg.number, now);
    };

    let mut signals = Vec::new();
    let timeout = cache.settings.prediction_timeout;

    if msg.number > predicted + timeout {
        signals.extend(expire_prediction(cache));
        signals.extend(scheduler::try_launch(cache, msg.number, now));
    } else if msg.number == expected {
        if !msg.is_settled() {
            tracing::debug!("#{} still being edited, deferring", msg.number);
        } else {
            signals.extend(step_verification(cache, msg));
            if !cache.has_record() {
                signals.extend(scheduler::try_launch(cache, msg.number, now));
            }
        }
    } else {
        tracing::warn!("received #{} while waiting for #{expected}", msg.number);
    }

    signals
}

/// Evaluate the expected-number message against the predicted suit.
fn step_verification(cache: &mut ServiceCache, msg: &SourceMessage) -> Vec<FeedSignal> {
    let Some(record) = cache.record() else {
        return Vec::new();
    };
    let offset = record.offset;
    let suit = record.suit;

    tracing::info!(
        "verifying #{}: observed {:?}, expecting {suit}",
        msg.number,
        msg.suits
    );

    if msg.suits.contains(&suit) {
        let Some(record) = cache.take_record() else {
            return Vec::new();
        };
        cache.ledger.record_win(offset);
        tracing::info!("prediction #{} won at step {offset}", record.number);
        return vec![FeedSignal::EditAnnouncement {
            reference: record.outbound_ref,
            number: record.number,
            suit,
            status: AnnouncementStatus::Won(offset),
        }];
    }

    if offset < MAX_CHECK_OFFSET {
        if let Some(record) = cache.record_mut() {
            record.offset += 1;
            tracing::info!(
                "step {offset} missed on #{}, next: #{}",
                msg.number,
                record.expected_number()
            );
        }
        return Vec::new();
    }

    let Some(record) = cache.take_record() else {
        return Vec::new();
    };
    cache.ledger.record_loss();
    tracing::info!(
        "prediction #{} lost after {CHECK_STEPS} checks",
        record.number
    );
    vec![FeedSignal::EditAnnouncement {
        reference: record.outbound_ref,
        number: record.number,
        suit: record.suit,
        status: AnnouncementStatus::Lost,
    }]
}

/// Expire the in-flight prediction. Counters are untouched: expiry is a
/// policy outcome, not a loss.
fn expire_prediction(cache: &mut ServiceCache) -> Vec<FeedSignal> {
    let Some(record) = cache.take_record() else {
        return Vec::new();
    };

    tracing::warn!(
        "prediction #{} expired (source at #{})",
        record.number,
        cache.last_source_number
    );

    vec![
        FeedSignal::EditAnnouncement {
            reference: record.outbound_ref,
            number: record.number,
            suit: record.suit,
            status: AnnouncementStatus::Expired,
        },
        FeedSignal::AdminNotice(format!(
            "⚠️ Prediction #{} expired. Slot freed.",
            record.number
        )),
    ]
}
