use super::domain::{ordinal, AdmissionError, AdmissionRange, EntryKind};
use crate::workflows::quiz::RepositoryError;
use std::io::Read;
use std::path::Path;

/// Lookup of the active registration range for a cohort.
pub trait AdmissionRangeRepository: Send + Sync {
    fn active_range(
        &self,
        department: &str,
        year: u8,
        section: &str,
    ) -> Result<Option<AdmissionRange>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RangeLoadError {
    #[error("failed to read admission ranges: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid admission ranges JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("admission range {id} has a malformed {} bound: {source}", kind.label())]
    MalformedBound {
        id: String,
        kind: EntryKind,
        #[source]
        source: AdmissionError,
    },
    #[error("admission range {id} {} entry starts at {start} after it ends at {end}", kind.label())]
    InvertedEntry {
        id: String,
        kind: EntryKind,
        start: String,
        end: String,
    },
}

/// Fixed list of ranges. The first active range covering a cohort wins.
#[derive(Debug, Clone, Default)]
pub struct StaticAdmissionRanges {
    ranges: Vec<AdmissionRange>,
}

impl StaticAdmissionRanges {
    pub fn new(ranges: Vec<AdmissionRange>) -> Self {
        Self { ranges }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RangeLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a JSON array of ranges and rejects active ones with unusable bounds.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RangeLoadError> {
        let ranges: Self = Self::new(serde_json::from_reader(reader)?);
        ranges.validate()?;
        Ok(ranges)
    }

    /// Every active range needs parseable bounds with start at or below end.
    /// Inactive ranges are never consulted and are left alone.
    pub fn validate(&self) -> Result<(), RangeLoadError> {
        for range in self.ranges.iter().filter(|range| range.is_active) {
            for kind in [EntryKind::Regular, EntryKind::Lateral] {
                let bounds = range.entry(kind);
                let malformed = |source| RangeLoadError::MalformedBound {
                    id: range.id.clone(),
                    kind,
                    source,
                };
                let start = ordinal(&bounds.start).map_err(malformed)?;
                let end = ordinal(&bounds.end).map_err(malformed)?;
                if start > end {
                    return Err(RangeLoadError::InvertedEntry {
                        id: range.id.clone(),
                        kind,
                        start: bounds.start.clone(),
                        end: bounds.end.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl AdmissionRangeRepository for StaticAdmissionRanges {
    fn active_range(
        &self,
        department: &str,
        year: u8,
        section: &str,
    ) -> Result<Option<AdmissionRange>, RepositoryError> {
        Ok(self
            .ranges
            .iter()
            .find(|range| range.covers(department, year, section))
            .cloned())
    }
}
