//! Pure storage for process-wide service state.
//!
//! Routing logic lives in the engine; this module only holds the data and
//! guards the single-slot invariant: at most one in-flight prediction
//! exists, and installing a second is refused without side effects.

use crate::error::ControlError;
use crate::ledger::OutcomeLedger;
use crate::pause::PauseState;
use crate::suit::Suit;
use crate::table::LookupTable;
use chrono::NaiveDateTime;
use presage_types::ServiceConfig;

/// Highest verification offset before a prediction is lost.
pub const MAX_CHECK_OFFSET: u8 = 3;

/// Opaque handle to an announcement already sent on the outbound feed,
/// kept so the announcement can be edited in place on resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef(pub u64);

/// Engine tunables, copied out of the service configuration at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Search window width for launching predictions.
    pub trigger_distance: u64,
    /// Source numbers past the predicted one before the slot expires.
    pub prediction_timeout: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            trigger_distance: 2,
            prediction_timeout: 10,
        }
    }
}

impl From<&ServiceConfig> for EngineSettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            trigger_distance: config.trigger_distance,
            prediction_timeout: config.prediction_timeout,
        }
    }
}

/// The single in-flight prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRecord {
    /// Target game number the prediction is about.
    pub number: u64,
    pub suit: Suit,
    /// Verification steps elapsed, 0..=3.
    pub offset: u8,
    /// Handle to the sent announcement; `None` if the send failed (the
    /// prediction still runs, the display is best-effort).
    pub outbound_ref: Option<MessageRef>,
    /// Source number that triggered the launch.
    pub trigger: u64,
    pub created_at: NaiveDateTime,
}

impl PredictionRecord {
    /// The source number the next verification step is waiting for.
    pub fn expected_number(&self) -> u64 {
        self.number + self.offset as u64
    }
}

/// Process-wide mutable state. One of these exists per process; every
/// mutation runs under the caller's single-consumer sequencing.
#[derive(Debug, Clone, Default)]
pub struct ServiceCache {
    pub settings: EngineSettings,
    pub table: LookupTable,
    record: Option<PredictionRecord>,
    pub pause: PauseState,
    pub ledger: OutcomeLedger,
    /// Highest game number observed on the source feed. Advisory, not
    /// enforced monotone.
    pub last_source_number: u64,
}

impl ServiceCache {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn record(&self) -> Option<&PredictionRecord> {
        self.record.as_ref()
    }

    pub fn record_mut(&mut self) -> Option<&mut PredictionRecord> {
        self.record.as_mut()
    }

    pub fn has_record(&self) -> bool {
        self.record.is_some()
    }

    /// Install a new in-flight record. Refused without side effects while
    /// one already exists.
    pub fn install_record(&mut self, record: PredictionRecord) -> Result<(), ControlError> {
        if self.record.is_some() {
            return Err(ControlError::SlotOccupied);
        }
        self.record = Some(record);
        Ok(())
    }

    /// Clear the slot, returning the cancelled prediction's number if one
    /// was in flight.
    pub fn clear_record(&mut self) -> Option<u64> {
        self.record.take().map(|r| r.number)
    }

    /// Take the whole record out of the slot.
    pub fn take_record(&mut self) -> Option<PredictionRecord> {
        self.record.take()
    }

    /// Attach the outbound message handle to the record, if the slot still
    /// holds the prediction the announcement was sent for.
    pub fn attach_outbound_ref(&mut self, number: u64, reference: MessageRef) {
        if let Some(record) = self.record.as_mut()
            && record.number == number
        {
            record.outbound_ref = Some(reference);
        }
    }
}
