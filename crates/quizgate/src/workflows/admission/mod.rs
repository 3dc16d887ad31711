//! Student registration check: an admission number must fall inside the
//! active range of its cohort.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    ordinal, validate_admission_number, AdmissionError, AdmissionOutcome, AdmissionRange,
    EntryKind, EntryRange,
};
pub use repository::{AdmissionRangeRepository, RangeLoadError, StaticAdmissionRanges};
pub use router::admission_router;
pub use service::{AdmissionCheck, AdmissionServiceError, AdmissionValidator};
