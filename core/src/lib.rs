pub mod classify;
pub mod engine;
pub mod error;
pub mod format;
pub mod ledger;
pub mod pause;
pub mod state;
pub mod suit;
pub mod table;

// Re-exports for convenience
pub use classify::{SourceMessage, classify};
pub use engine::{FeedSignal, advance_prediction_state};
pub use state::{EngineSettings, MessageRef, PredictionRecord, ServiceCache};
pub use suit::Suit;
pub use table::LookupTable;
