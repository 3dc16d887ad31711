mod aggregate;
mod summary;
pub mod views;

pub use aggregate::{
    aggregate, AggregateBucket, QuizStatistics, ScoreDistribution, SubjectBucket,
    UNASSIGNED_SUBJECT,
};
