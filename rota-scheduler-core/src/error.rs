use chrono::NaiveDate;
use thiserror::Error;

/// Configuration errors raised while building a roster model.
///
/// These denote inputs referencing identifiers the catalog or calendar does
/// not know; they are surfaced immediately rather than salvaged. Lookups of
/// variables that simply do not exist for a given day are not errors and are
/// skipped by the constraint posting code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown worker `{0}`")]
    UnknownWorker(Box<str>),
    #[error("unknown slot `{0}`")]
    UnknownSlot(Box<str>),
    #[error("unknown shift `{0}`")]
    UnknownShift(Box<str>),
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(Box<str>),
    #[error("unknown period `{0}`")]
    UnknownPeriod(Box<str>),
    #[error("transition rule has an empty step sequence")]
    EmptyTransitionSequence,
    #[error("planning period starts {start} after it ends {end}")]
    EmptyPlanningPeriod { start: NaiveDate, end: NaiveDate },
}
