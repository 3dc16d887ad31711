use super::domain::{Quiz, Submission};
use serde::Serialize;

/// Qualitative score bucket used by the statistics dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreBand {
    pub const fn ordered() -> [Self; 4] {
        [Self::Excellent, Self::Good, Self::Average, Self::Poor]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }

    /// Thresholds are strict: a boundary value falls into the lower band.
    pub fn classify(percentage: f64) -> Self {
        if percentage > 90.0 {
            Self::Excellent
        } else if percentage > 70.0 {
            Self::Good
        } else if percentage > 50.0 {
            Self::Average
        } else {
            Self::Poor
        }
    }
}

/// Raw score: the sum of per-question marks.
pub fn raw_score(submission: &Submission) -> f64 {
    submission.answers.iter().map(|answer| answer.marks).sum()
}

/// Score as a percentage of the quiz total; quizzes without marks score 0.
pub fn percentage(score: f64, total_marks: f64) -> f64 {
    if total_marks > 0.0 {
        score / total_marks * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredSubmission {
    pub score: f64,
    pub percentage: f64,
    pub band: ScoreBand,
}

pub fn score_submission(quiz: &Quiz, submission: &Submission) -> ScoredSubmission {
    let score = raw_score(submission);
    let percentage = percentage(score, quiz.total_marks);
    ScoredSubmission {
        score,
        percentage,
        band: ScoreBand::classify(percentage),
    }
}
