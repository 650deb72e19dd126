//! Statistics module for Hourblock
//!
//! Read-side roll-ups over the day's blocks and goals. Nothing here holds
//! state; every report is recomputed from scratch on request.

mod daily;

pub use daily::{percent, DailyAnalytics, MinuteTotals};
