//! Quiz availability, student listings, and score statistics.
//!
//! Everything below `service` is a pure function of a quiz population and an
//! instant; the service and router only fetch a fresh population per request.

pub mod access;
pub mod board;
pub mod domain;
pub mod facets;
pub mod gradebook;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod snapshot;
pub mod stats;
pub mod visibility;
pub mod window;

#[cfg(test)]
mod tests;

pub use access::{
    actions_for, evaluate_display, AccessDecision, CallerActions, Countdown, DisplayStatus,
    ManagementActions, StudentAction,
};
pub use board::{BoardRequest, QuizBoard, QuizCard};
pub use domain::{
    AllowedGroup, Answer, Caller, Quiz, QuizId, Role, Subject, Submission, SubmissionId,
    SubmissionStatus, SubmissionsByQuiz, UserId,
};
pub use facets::{CohortMatch, FacetError, FacetQuery, ManagementFilters, QuizFacets};
pub use gradebook::{GradebookImportError, GradebookImporter};
pub use repository::{Clock, FixedClock, QuizFilter, QuizRepository, RepositoryError, SystemClock};
pub use router::{caller_from_headers, quiz_router, CallerError};
pub use scoring::{percentage, raw_score, score_submission, ScoreBand, ScoredSubmission};
pub use service::{BoardError, QuizBoardService, StatisticsReport};
pub use snapshot::{QuizSnapshot, SnapshotError};
pub use stats::{aggregate, AggregateBucket, QuizStatistics, ScoreDistribution};
pub use visibility::{visible, BoardView, StudentRoute};
pub use window::{phase, QuizPhase};
