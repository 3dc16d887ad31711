use super::domain::{Quiz, QuizId, Submission, SubmissionsByQuiz, UserId};
use super::facets::{CohortMatch, QuizFacets};
use super::repository::{QuizFilter, QuizRepository, RepositoryError};
use super::stats::{aggregate, QuizStatistics};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Frozen quiz and submission population. Every board or statistics call
/// works from one of these instead of shared mutable state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizSnapshot {
    pub quizzes: Vec<Quiz>,
    #[serde(default)]
    pub submissions: SubmissionsByQuiz,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read quiz snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid quiz snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quiz {quiz_id} must start before it ends")]
    InvalidWindow { quiz_id: QuizId },
    #[error("submissions reference unknown quiz {quiz_id}")]
    UnknownQuiz { quiz_id: QuizId },
    #[error("submission {submission_id} is filed under quiz {quiz_id} but names quiz {named}")]
    MisfiledSubmission {
        quiz_id: QuizId,
        submission_id: String,
        named: QuizId,
    },
    #[error("student {student_id} has more than one submission for quiz {quiz_id}")]
    DuplicateSubmission { quiz_id: QuizId, student_id: String },
}

impl QuizSnapshot {
    pub fn new(quizzes: Vec<Quiz>, submissions: SubmissionsByQuiz) -> Self {
        Self {
            quizzes,
            submissions,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_reader(reader)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Checks the window ordering of every quiz, that every submission list
    /// belongs to a known quiz, and the one-submission-per-student rule.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if let Some(quiz) = self
            .quizzes
            .iter()
            .find(|quiz| quiz.start_time >= quiz.end_time)
        {
            return Err(SnapshotError::InvalidWindow {
                quiz_id: quiz.id.clone(),
            });
        }

        let known: HashSet<&QuizId> = self.quizzes.iter().map(|quiz| &quiz.id).collect();
        for (quiz_id, submissions) in &self.submissions {
            if !known.contains(quiz_id) {
                return Err(SnapshotError::UnknownQuiz {
                    quiz_id: quiz_id.clone(),
                });
            }

            let mut seen = HashSet::new();
            for submission in submissions {
                if &submission.quiz_id != quiz_id {
                    return Err(SnapshotError::MisfiledSubmission {
                        quiz_id: quiz_id.clone(),
                        submission_id: submission.id.0.clone(),
                        named: submission.quiz_id.clone(),
                    });
                }
                if !seen.insert(&submission.student_id) {
                    return Err(SnapshotError::DuplicateSubmission {
                        quiz_id: quiz_id.clone(),
                        student_id: submission.student_id.0.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Replaces the submission lists of every quiz present in `imported`.
    pub fn merge_submissions(&mut self, imported: SubmissionsByQuiz) {
        self.submissions.extend(imported);
    }

    pub fn submission_for(&self, quiz_id: &QuizId, student_id: &UserId) -> Option<&Submission> {
        self.submissions
            .get(quiz_id)?
            .iter()
            .find(|submission| &submission.student_id == student_id)
    }

    pub fn statistics(&self, facets: &QuizFacets, cohort_match: CohortMatch) -> QuizStatistics {
        aggregate(&self.quizzes, &self.submissions, facets, cohort_match)
    }
}

impl QuizRepository for QuizSnapshot {
    fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, RepositoryError> {
        Ok(self.quizzes.iter().find(|quiz| &quiz.id == id).cloned())
    }

    fn list_quizzes(&self, filter: Option<QuizFilter<'_>>) -> Result<Vec<Quiz>, RepositoryError> {
        Ok(self
            .quizzes
            .iter()
            .filter(|quiz| filter.map_or(true, |filter| filter.matches(quiz)))
            .cloned()
            .collect())
    }

    fn list_submissions(&self, quiz_id: &QuizId) -> Result<Vec<Submission>, RepositoryError> {
        Ok(self.submissions.get(quiz_id).cloned().unwrap_or_default())
    }

    fn list_all_submissions(&self) -> Result<SubmissionsByQuiz, RepositoryError> {
        Ok(self.submissions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SNAPSHOT: &str = r#"{
        "quizzes": [
            {
                "id": "quiz-1",
                "title": "Algorithms Quiz",
                "subject": {"_id": "subj-algo", "name": "Algorithms", "code": "CS310"},
                "duration_minutes": 30,
                "start_time": "2025-04-01T09:00:00Z",
                "end_time": "2025-04-01T10:00:00Z",
                "allowed_groups": [{"department": "CS", "year": 3, "semester": 2, "section": "A"}],
                "total_authorized_students": 45,
                "total_marks": 10
            }
        ],
        "submissions": {
            "quiz-1": [
                {"id": "s-1", "quiz_id": "quiz-1", "student_id": "stu-1", "status": "evaluated",
                 "answers": [{"marks": 4}, {"marks": 5}]}
            ]
        }
    }"#;

    #[test]
    fn loads_and_aggregates_a_snapshot() {
        let snapshot = QuizSnapshot::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot loads");
        let stats = snapshot.statistics(&QuizFacets::default(), CohortMatch::SameGroup);

        assert_eq!(stats.total_students, 45);
        assert_eq!(stats.submitted_count(), 1);
        assert_eq!(stats.overall.average_score_percent, 9.0);
        assert_eq!(stats.score_distribution.average, 0);
        assert_eq!(stats.score_distribution.good, 1);
        assert!(snapshot
            .submission_for(&QuizId("quiz-1".to_string()), &UserId("stu-1".to_string()))
            .is_some());
    }

    #[test]
    fn rejects_inverted_windows() {
        let raw = SNAPSHOT.replace("2025-04-01T10:00:00Z", "2025-04-01T08:00:00Z");
        let err = QuizSnapshot::from_reader(Cursor::new(raw)).expect_err("window rejected");
        assert!(matches!(err, SnapshotError::InvalidWindow { .. }));
    }

    #[test]
    fn rejects_duplicate_student_submissions() {
        let mut snapshot =
            QuizSnapshot::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot loads");
        let quiz_id = QuizId("quiz-1".to_string());
        let duplicate = snapshot.submissions[&quiz_id][0].clone();
        snapshot
            .submissions
            .get_mut(&quiz_id)
            .expect("quiz submissions")
            .push(duplicate);

        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::DuplicateSubmission { .. })
        ));
    }

    #[test]
    fn rejects_submissions_for_unknown_quizzes() {
        let mut snapshot =
            QuizSnapshot::from_reader(Cursor::new(SNAPSHOT)).expect("snapshot loads");
        let mut orphan = snapshot.submissions[&QuizId("quiz-1".to_string())][0].clone();
        orphan.quiz_id = QuizId("ghost-quiz".to_string());
        snapshot.merge_submissions(SubmissionsByQuiz::from([(
            QuizId("ghost-quiz".to_string()),
            vec![orphan],
        )]));

        match snapshot.validate() {
            Err(SnapshotError::UnknownQuiz { quiz_id }) => assert_eq!(quiz_id.0, "ghost-quiz"),
            other => panic!("unexpected validation result: {other:?}"),
        }
    }

    #[test]
    fn rejects_submissions_filed_under_another_quiz() {
        let raw = SNAPSHOT.replace(r#""quiz_id": "quiz-1""#, r#""quiz_id": "quiz-9""#);
        let err = QuizSnapshot::from_reader(Cursor::new(raw)).expect_err("misfiled rejected");
        assert!(matches!(
            err,
            SnapshotError::MisfiledSubmission { ref named, .. } if named.0 == "quiz-9"
        ));
    }
}
