use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier wrapper for quizzes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(pub String);

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for any authenticated user (student, faculty, or admin).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "faculty" => Some(Self::Faculty),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
            Self::Admin => "admin",
        }
    }
}

/// Caller identity as resolved by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role,
        }
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

/// Subject reference as stored on a quiz: either a bare identifier or an
/// expanded record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subject {
    Ref(String),
    Inline {
        #[serde(alias = "_id")]
        id: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        code: Option<String>,
    },
}

impl Subject {
    pub fn id(&self) -> &str {
        match self {
            Subject::Ref(id) => id,
            Subject::Inline { id, .. } => id,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Subject::Ref(_) => None,
            Subject::Inline { code, .. } => code.as_deref().filter(|code| !code.is_empty()),
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Subject::Ref(_) => None,
            Subject::Inline { name, .. } => name.as_deref().filter(|name| !name.is_empty()),
        }
    }

    /// A facet value selects a subject by identity or by course code.
    pub fn matches(&self, value: &str) -> bool {
        self.id() == value || self.code() == Some(value)
    }

    pub fn display(&self) -> String {
        match (self.name(), self.code()) {
            (Some(name), Some(code)) if name == code => code.to_string(),
            (Some(name), Some(code)) => format!("{name} ({code})"),
            (Some(name), None) => name.to_string(),
            (None, Some(code)) => code.to_string(),
            (None, None) => self.id().to_string(),
        }
    }
}

pub const MISSING_SUBJECT_LABEL: &str = "N/A";

pub fn subject_display(subject: Option<&Subject>) -> String {
    subject
        .map(Subject::display)
        .unwrap_or_else(|| MISSING_SUBJECT_LABEL.to_string())
}

/// Cohort allowed to take a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedGroup {
    pub department: String,
    pub year: u8,
    #[serde(default)]
    pub semester: Option<u8>,
    pub section: String,
}

impl AllowedGroup {
    pub fn label(&self) -> String {
        let semester = self
            .semester
            .map(|semester| semester.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "{} - Year {} - Semester {} - Section {}",
            self.department, self.year, semester, self.section
        )
    }
}

/// Quiz definition as read from persistence. Optional source fields are
/// resolved to their defaults during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    #[serde(default)]
    pub subject: Option<Subject>,
    #[serde(default)]
    pub duration_minutes: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub allowed_groups: Vec<AllowedGroup>,
    #[serde(default)]
    pub total_authorized_students: u32,
    #[serde(default)]
    pub total_marks: f64,
    #[serde(default)]
    pub created_by: Option<UserId>,
}

impl Quiz {
    pub fn subject_label(&self) -> String {
        subject_display(self.subject.as_ref())
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.created_by.as_ref() == Some(user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    NotAttempted,
    InProgress,
    Submitted,
    Evaluated,
}

impl SubmissionStatus {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "not_attempted" => Some(Self::NotAttempted),
            "in_progress" => Some(Self::InProgress),
            "submitted" => Some(Self::Submitted),
            "evaluated" => Some(Self::Evaluated),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::NotAttempted => "not_attempted",
            Self::InProgress => "in_progress",
            Self::Submitted => "submitted",
            Self::Evaluated => "evaluated",
        }
    }

    /// Submitted and evaluated attempts close the quiz for the student.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Submitted | Self::Evaluated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub marks: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub quiz_id: QuizId,
    pub student_id: UserId,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Submission {
    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }
}

/// Submission state of a student for one quiz; absence of a record is the
/// synthetic `not_attempted` state.
pub fn effective_status(submission: Option<&Submission>) -> SubmissionStatus {
    submission
        .map(|submission| submission.status)
        .unwrap_or(SubmissionStatus::NotAttempted)
}

pub type SubmissionsByQuiz = BTreeMap<QuizId, Vec<Submission>>;
