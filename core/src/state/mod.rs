pub mod cache;

pub use cache::{EngineSettings, MessageRef, PredictionRecord, ServiceCache};
