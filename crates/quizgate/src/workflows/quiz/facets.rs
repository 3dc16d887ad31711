use super::domain::{AllowedGroup, Quiz};
use serde::{Deserialize, Serialize};

/// How cohort facets are matched against a quiz's allowed groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortMatch {
    /// Every supplied cohort facet must hold for one and the same group.
    #[default]
    SameGroup,
    /// Each supplied cohort facet may be satisfied by a different group.
    AnyGroup,
}

impl CohortMatch {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "same_group" | "same-group" => Some(Self::SameGroup),
            "any_group" | "any-group" => Some(Self::AnyGroup),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SameGroup => "same_group",
            Self::AnyGroup => "any_group",
        }
    }
}

/// Optional filter dimensions narrowing a quiz population. `None` is a
/// wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizFacets {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
    #[serde(default)]
    pub semester: Option<u8>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
}

impl QuizFacets {
    pub fn has_cohort_facets(&self) -> bool {
        self.department.is_some()
            || self.year.is_some()
            || self.semester.is_some()
            || self.section.is_some()
    }

    pub fn department_matches(&self, group: &AllowedGroup) -> bool {
        self.department
            .as_deref()
            .map_or(true, |department| group.department == department)
    }

    pub fn year_matches(&self, group: &AllowedGroup) -> bool {
        self.year.map_or(true, |year| group.year == year)
    }

    pub fn semester_matches(&self, group: &AllowedGroup) -> bool {
        self.semester
            .map_or(true, |semester| group.semester == Some(semester))
    }

    pub fn section_matches(&self, group: &AllowedGroup) -> bool {
        self.section
            .as_deref()
            .map_or(true, |section| group.section == section)
    }

    pub fn group_matches(&self, group: &AllowedGroup) -> bool {
        self.department_matches(group)
            && self.year_matches(group)
            && self.semester_matches(group)
            && self.section_matches(group)
    }

    pub fn subject_matches(&self, quiz: &Quiz) -> bool {
        match self.subject.as_deref() {
            None => true,
            Some(value) => quiz
                .subject
                .as_ref()
                .is_some_and(|subject| subject.matches(value)),
        }
    }

    pub fn cohort_matches(&self, quiz: &Quiz, mode: CohortMatch) -> bool {
        if !self.has_cohort_facets() {
            return true;
        }

        let groups = &quiz.allowed_groups;
        match mode {
            CohortMatch::SameGroup => groups.iter().any(|group| self.group_matches(group)),
            CohortMatch::AnyGroup => {
                groups.iter().any(|group| self.department_matches(group))
                    && groups.iter().any(|group| self.year_matches(group))
                    && groups.iter().any(|group| self.semester_matches(group))
                    && groups.iter().any(|group| self.section_matches(group))
            }
        }
    }

    pub fn matches(&self, quiz: &Quiz, mode: CohortMatch) -> bool {
        self.subject_matches(quiz) && self.cohort_matches(quiz, mode)
    }
}

/// Filters applied to faculty and admin quiz listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementFilters {
    pub facets: QuizFacets,
    /// Display status label, compared case-insensitively.
    pub status: Option<String>,
}

/// Raw query-string facets. Empty values and `all` are wildcards.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetQuery {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FacetError {
    #[error("{facet} filter must be a whole number (got '{value}')")]
    InvalidNumber { facet: &'static str, value: String },
}

impl FacetQuery {
    pub fn into_filters(self) -> Result<ManagementFilters, FacetError> {
        let facets = QuizFacets {
            department: wildcard(self.department),
            year: numeric("year", self.year)?,
            semester: numeric("semester", self.semester)?,
            section: wildcard(self.section),
            subject: wildcard(self.subject),
        };

        Ok(ManagementFilters {
            facets,
            status: wildcard(self.status),
        })
    }
}

fn wildcard(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}

fn numeric(facet: &'static str, value: Option<String>) -> Result<Option<u8>, FacetError> {
    wildcard(value)
        .map(|value| {
            value
                .parse::<u8>()
                .map_err(|_| FacetError::InvalidNumber { facet, value })
        })
        .transpose()
}
