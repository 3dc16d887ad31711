use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use super::domain::{validate_admission_number, AdmissionError, AdmissionOutcome, AdmissionRange};
use super::repository::AdmissionRangeRepository;
use crate::config::AdmissionConfig;
use crate::workflows::quiz::RepositoryError;

/// Registration payload checked before a student account is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdmissionCheck {
    pub department: String,
    pub year: u8,
    pub section: String,
    pub admission_number: String,
}

/// Service resolving the cohort's active range and applying the entry rules.
pub struct AdmissionValidator<R> {
    repository: Arc<R>,
    config: AdmissionConfig,
}

impl<R> AdmissionValidator<R>
where
    R: AdmissionRangeRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: AdmissionConfig) -> Self {
        Self { repository, config }
    }

    pub fn range_for(
        &self,
        department: &str,
        year: u8,
        section: &str,
    ) -> Result<AdmissionRange, AdmissionServiceError> {
        let range = self
            .repository
            .active_range(department, year, section)?
            .ok_or_else(|| AdmissionError::NoRangeDefined {
                department: department.to_string(),
                year,
                section: section.to_string(),
            })?;
        Ok(range)
    }

    pub fn validate(
        &self,
        check: &AdmissionCheck,
    ) -> Result<AdmissionOutcome, AdmissionServiceError> {
        let result = self
            .range_for(&check.department, check.year, &check.section)
            .and_then(|range| {
                validate_admission_number(
                    &check.admission_number,
                    &range,
                    &self.config.regular_prefix,
                )
                .map_err(AdmissionServiceError::from)
            });

        if let Err(AdmissionServiceError::Admission(error)) = &result {
            warn!(
                department = %check.department,
                year = check.year,
                section = %check.section,
                admission_number = %check.admission_number,
                reason = error.code(),
                "admission number rejected"
            );
        }

        result
    }
}

/// Error raised by the admission validator.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionServiceError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
