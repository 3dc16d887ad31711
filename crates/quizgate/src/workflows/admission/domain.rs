use serde::{Deserialize, Serialize};

/// Inclusive admission-number bounds for one entry kind. Only the final
/// three characters of each bound carry the ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRange {
    pub start: String,
    pub end: String,
}

/// Registration window for one (department, year, section) cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionRange {
    #[serde(alias = "_id")]
    pub id: String,
    pub department: String,
    pub year: u8,
    pub section: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    pub regular_entry: EntryRange,
    pub lateral_entry: EntryRange,
}

fn active_by_default() -> bool {
    true
}

impl AdmissionRange {
    pub fn covers(&self, department: &str, year: u8, section: &str) -> bool {
        self.is_active
            && self.department == department
            && self.year == year
            && self.section == section
    }

    pub fn entry(&self, kind: EntryKind) -> &EntryRange {
        match kind {
            EntryKind::Regular => &self.regular_entry,
            EntryKind::Lateral => &self.lateral_entry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Regular,
    Lateral,
}

impl EntryKind {
    /// Admission numbers carrying the regular prefix are regular entries;
    /// everything else is lateral.
    pub fn for_admission(admission_number: &str, regular_prefix: &str) -> Self {
        if admission_number.starts_with(regular_prefix) {
            Self::Regular
        } else {
            Self::Lateral
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Lateral => "lateral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("no admission range defined for {department} year {year} section {section}")]
    NoRangeDefined {
        department: String,
        year: u8,
        section: String,
    },
    #[error("invalid admission number, must be between {start} and {end}")]
    OutOfRange {
        kind: EntryKind,
        start: String,
        end: String,
    },
    #[error("'{value}' does not end in a three digit ordinal")]
    InvalidFormat { value: String },
}

impl AdmissionError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoRangeDefined { .. } => "no_range_defined",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvalidFormat { .. } => "invalid_format",
        }
    }
}

/// Accepted admission number with the entry rules it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdmissionOutcome {
    pub admission_number: String,
    pub entry: EntryKind,
    pub ordinal: u16,
    pub bounds: EntryRange,
}

/// Ordinal encoded by the final three characters.
pub fn ordinal(value: &str) -> Result<u16, AdmissionError> {
    let invalid = || AdmissionError::InvalidFormat {
        value: value.to_string(),
    };

    let digits: Vec<char> = value.chars().rev().take(3).collect();
    if digits.len() != 3 || !digits.iter().all(char::is_ascii_digit) {
        return Err(invalid());
    }

    digits
        .iter()
        .rev()
        .collect::<String>()
        .parse()
        .map_err(|_| invalid())
}

/// Checks `admission_number` against the entry range selected by its prefix.
pub fn validate_admission_number(
    admission_number: &str,
    range: &AdmissionRange,
    regular_prefix: &str,
) -> Result<AdmissionOutcome, AdmissionError> {
    let admission_number = admission_number.trim();
    let kind = EntryKind::for_admission(admission_number, regular_prefix);
    let bounds = range.entry(kind);

    let value = ordinal(admission_number)?;
    let start = ordinal(&bounds.start)?;
    let end = ordinal(&bounds.end)?;

    if value < start || value > end {
        return Err(AdmissionError::OutOfRange {
            kind,
            start: bounds.start.clone(),
            end: bounds.end.clone(),
        });
    }

    Ok(AdmissionOutcome {
        admission_number: admission_number.to_string(),
        entry: kind,
        ordinal: value,
        bounds: bounds.clone(),
    })
}
