//! Pause control and the filler-announcement pool.
//!
//! While paused the scheduler launches nothing; the service instead emits
//! periodic filler messages so the outbound feed shows liveness. Entering a
//! pause always discards any in-flight prediction without crediting an
//! outcome.

use crate::engine::FeedSignal;
use crate::error::ControlError;
use crate::state::ServiceCache;
use chrono::NaiveDateTime;
use rand::seq::SliceRandom;

/// Pause flag plus the optional auto-resume deadline. The deadline is only
/// meaningful while paused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseState {
    pub is_paused: bool,
    pub resume_deadline: Option<NaiveDateTime>,
}

impl PauseState {
    /// Whole minutes until auto-resume, if a deadline is set.
    pub fn remaining_minutes(&self, now: NaiveDateTime) -> Option<i64> {
        let deadline = self.resume_deadline?;
        Some((deadline - now).num_minutes().max(0))
    }
}

/// Enter a pause. `minutes == 0` means indefinite. Rejected if already
/// paused; the in-flight prediction (if any) is discarded unconditionally.
pub fn enter_pause(
    cache: &mut ServiceCache,
    minutes: u64,
    now: NaiveDateTime,
) -> Result<Vec<FeedSignal>, ControlError> {
    if cache.pause.is_paused {
        return Err(ControlError::AlreadyPaused);
    }

    cache.pause.is_paused = true;
    cache.pause.resume_deadline =
        (minutes > 0).then(|| now + chrono::Duration::minutes(minutes as i64));

    if let Some(number) = cache.clear_record() {
        tracing::info!("pause entry discarded in-flight prediction #{number}");
    }

    let duration = if minutes > 0 {
        format!("{minutes} minutes")
    } else {
        "indefinite".to_string()
    };
    tracing::info!("pause started ({duration})");

    Ok(vec![
        FeedSignal::ChannelNotice(format!(
            "🛑 **PAUSED**\n\n⏱️ Duration: {duration}\n🎰 Predictions: suspended\n\nUse `resume` to continue"
        )),
        FeedSignal::AdminNotice(format!("🛑 Pause started ({duration})")),
    ])
}

/// Leave a pause. Rejected when no pause is active so the caller can tell
/// the requester nothing happened.
pub fn exit_pause(cache: &mut ServiceCache) -> Result<Vec<FeedSignal>, ControlError> {
    if !cache.pause.is_paused {
        return Err(ControlError::NotPaused);
    }

    cache.pause.is_paused = false;
    cache.pause.resume_deadline = None;
    tracing::info!("pause ended, predictions resume");

    Ok(vec![
        FeedSignal::ChannelNotice(
            "✅ **PAUSE ENDED**\n\n🤖 Predictions are back!\n🎰 Good luck! 🍀".to_string(),
        ),
        FeedSignal::AdminNotice("✅ Pause ended — predictions resumed".to_string()),
    ])
}

/// True when a paused cache has reached its auto-resume deadline.
pub fn auto_resume_due(cache: &ServiceCache, now: NaiveDateTime) -> bool {
    cache.pause.is_paused
        && cache
            .pause
            .resume_deadline
            .is_some_and(|deadline| now >= deadline)
}

/// Default filler messages shipped with the service.
pub const DEFAULT_FILLERS: [&str; 10] = [
    "🎰 Why don't cards ever play football? They're afraid of tackles! ⚽",
    "🃏 Which card is the funniest? The joker — always an ace up its sleeve... or not! 😄",
    "♠️ Why did the heart lose at poker? It kept wearing its feelings on its sleeve! 💔",
    "🎲 What did one die say to the other? 'See you at the casino tonight?' 🎰",
    "♦️ Why are diamonds so expensive? Too many carats... and too much character! 💎",
    "🍀 Difference between a poker player and a magician? One loses his hat, the other his shirt! 🎩",
    "♣️ Why are clubs lucky? They never have to work — they're already in the cards! 🍀",
    "🎰 What does a tired card do? It folds... on the green felt! 😴",
    "❤️ Why is the king of hearts always in love? His heart is always in his hand! 👑",
    "🃏 What do you call a lying ace? An ace... of bluffs! 😎",
];

/// Pool of filler messages served without repetition until exhausted, then
/// reshuffled for the next cycle.
#[derive(Debug, Clone)]
pub struct FillerPool {
    messages: Vec<String>,
    /// Indices not yet served in the current cycle, pre-shuffled.
    order: Vec<usize>,
}

impl Default for FillerPool {
    fn default() -> Self {
        Self::with_messages(DEFAULT_FILLERS.iter().map(|s| s.to_string()).collect())
    }
}

impl FillerPool {
    pub fn with_messages(messages: Vec<String>) -> Self {
        Self {
            messages,
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Next filler message. Each message appears once per cycle; a fresh
    /// shuffle starts when the cycle is exhausted.
    pub fn next(&mut self) -> Option<String> {
        if self.messages.is_empty() {
            return None;
        }
        if self.order.is_empty() {
            self.order = (0..self.messages.len()).collect();
            self.order.shuffle(&mut rand::thread_rng());
        }
        self.order.pop().map(|i| self.messages[i].clone())
    }

    pub fn add(&mut self, message: String) {
        self.messages.push(message);
        self.order.clear();
    }

    /// Remove the message at `index`, returning it. 0-based.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.messages.len() {
            return None;
        }
        self.order.clear();
        Some(self.messages.remove(index))
    }

    /// Replace the message at `index`, returning the old text.
    pub fn edit(&mut self, index: usize, message: String) -> Option<String> {
        let slot = self.messages.get_mut(index)?;
        self.order.clear();
        Some(std::mem::replace(slot, message))
    }

    pub fn reset_defaults(&mut self) {
        *self = Self::default();
    }
}
