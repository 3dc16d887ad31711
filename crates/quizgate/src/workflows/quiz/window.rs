use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle phase of a quiz relative to its availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    Upcoming,
    Active,
    Expired,
}

/// Classifies `now` against the closed window `[start, end]`.
///
/// A window with `start > end` never reports `Active`: instants before `start`
/// are `Upcoming`, everything else is `Expired`.
pub fn phase(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> QuizPhase {
    if now < start {
        QuizPhase::Upcoming
    } else if now <= end {
        QuizPhase::Active
    } else {
        QuizPhase::Expired
    }
}
