//! Stateless windowed aggregation over contest records.
//!
//! Nothing in here holds state: callers pass the full record collection, the
//! current instant and the window mode on every call.

pub mod clock;
pub mod metrics;
pub mod window;

pub use clock::{format_utc_clock, normalize_timestamp};
pub use metrics::{rate, sum, summarize, WindowSummary};
pub use window::{partition, WindowBounds, WindowPair};
