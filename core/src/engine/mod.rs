//! The prediction state machine.
//!
//! All transitions are pure functions over a [`ServiceCache`]: they mutate
//! in-memory state and return [`FeedSignal`]s describing the outbound I/O
//! the driver should perform. In-memory state is authoritative; the
//! displayed announcements are a best-effort mirror.
//!
//! [`ServiceCache`]: crate::state::ServiceCache

pub mod scheduler;
pub mod signal;
pub mod verification;


pub use scheduler::try_launch;
pub use signal::FeedSignal;
pub use verification::advance_prediction_state;
