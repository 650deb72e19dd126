mod engine;

pub use engine::{format_hms, ActiveTask, ExpiryDecision, SessionSnapshot, SessionState, SessionTimer};
