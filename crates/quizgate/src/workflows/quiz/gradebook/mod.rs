mod parser;

use super::domain::{
    Answer, QuizId, Submission, SubmissionId, SubmissionStatus, SubmissionsByQuiz, UserId,
};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use parser::GradebookRow;

#[derive(Debug)]
pub enum GradebookImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidStatus { line: u64, value: String },
    InvalidMarks { line: u64, value: String },
    DuplicateSubmission { line: u64, quiz_id: String, student_id: String },
}

impl std::fmt::Display for GradebookImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradebookImportError::Io(err) => write!(f, "failed to read gradebook export: {}", err),
            GradebookImportError::Csv(err) => write!(f, "invalid gradebook CSV data: {}", err),
            GradebookImportError::InvalidStatus { line, value } => write!(
                f,
                "line {line}: status must be in_progress, submitted or evaluated (got '{value}')"
            ),
            GradebookImportError::InvalidMarks { line, value } => {
                write!(f, "line {line}: '{value}' is not a valid mark")
            }
            GradebookImportError::DuplicateSubmission {
                line,
                quiz_id,
                student_id,
            } => write!(
                f,
                "line {line}: student {student_id} already has a submission for quiz {quiz_id}"
            ),
        }
    }
}

impl std::error::Error for GradebookImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GradebookImportError::Io(err) => Some(err),
            GradebookImportError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GradebookImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for GradebookImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads a gradebook CSV export into per-quiz submission lists.
pub struct GradebookImporter;

impl GradebookImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SubmissionsByQuiz, GradebookImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<SubmissionsByQuiz, GradebookImportError> {
        let rows = parser::parse_rows(reader)?;
        let mut seen = HashSet::new();
        let mut submissions = SubmissionsByQuiz::new();

        for row in rows {
            if !seen.insert((row.quiz_id.clone(), row.student_id.clone())) {
                return Err(GradebookImportError::DuplicateSubmission {
                    line: row.line,
                    quiz_id: row.quiz_id,
                    student_id: row.student_id,
                });
            }

            let submission = submission_from_row(row)?;
            submissions
                .entry(submission.quiz_id.clone())
                .or_default()
                .push(submission);
        }

        Ok(submissions)
    }
}

fn submission_from_row(row: GradebookRow) -> Result<Submission, GradebookImportError> {
    let status = SubmissionStatus::from_label(&row.status)
        .filter(|status| *status != SubmissionStatus::NotAttempted)
        .ok_or_else(|| GradebookImportError::InvalidStatus {
            line: row.line,
            value: row.status.clone(),
        })?;

    let answers = match row.marks.as_deref() {
        Some(cell) => parser::parse_marks(cell)
            .map_err(|value| GradebookImportError::InvalidMarks {
                line: row.line,
                value,
            })?
            .into_iter()
            .map(|marks| Answer { marks })
            .collect(),
        None => Vec::new(),
    };

    let id = row
        .submission_id
        .unwrap_or_else(|| format!("{}:{}", row.quiz_id, row.student_id));

    Ok(Submission {
        id: SubmissionId(id),
        quiz_id: QuizId(row.quiz_id),
        student_id: UserId(row.student_id),
        status,
        answers,
    })
}
