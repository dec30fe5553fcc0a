use crate::error::ModelError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What a slot reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Duty,
    Leave,
    Shift,
}

/// AFFIRM marks an assignment as preferred, NEGATE forbids it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStrategy {
    Affirm,
    Negate,
}

impl FromStr for RequestStrategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AFFIRM" => Ok(RequestStrategy::Affirm),
            "NEGATE" => Ok(RequestStrategy::Negate),
            other => Err(ModelError::UnknownStrategy(other.into())),
        }
    }
}

/// A pending user request for one (worker, date, slot) assignment.
///
/// Shift-kind requests reference a shift id and expand to its member duties
/// when applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<Box<str>>,
    pub worker: Box<str>,
    pub date: NaiveDate,
    pub slot: Box<str>,
    #[serde(rename = "type")]
    pub kind: SlotKind,
    pub strategy: RequestStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStrategy {
    Always,
    Never,
    Min,
    Max,
}

impl FromStr for TransitionStrategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(TransitionStrategy::Always),
            "never" => Ok(TransitionStrategy::Never),
            "min" => Ok(TransitionStrategy::Min),
            "max" => Ok(TransitionStrategy::Max),
            other => Err(ModelError::UnknownStrategy(other.into())),
        }
    }
}

/// One typed slot reference of a transition sequence, with its day offset
/// relative to the reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStep {
    #[serde(rename = "type")]
    pub kind: SlotKind,
    pub id: Box<str>,
    pub day: i64,
}

/// A pairwise day-offset transition rule between two dated slots.
///
/// Only the first and the last step of `sequence` are used; interior steps
/// are carried but ignored. This is a deliberate contract of the rule
/// format, not an omission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRule {
    pub sequence: Vec<TransitionStep>,
    pub strategy: TransitionStrategy,
    pub cost: i64,
}

/// Bucketing of sum rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RulePeriod {
    Week,
    Month,
}

impl FromStr for RulePeriod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEEK" => Ok(RulePeriod::Week),
            "MONTH" => Ok(RulePeriod::Month),
            other => Err(ModelError::UnknownPeriod(other.into())),
        }
    }
}

/// Hard and soft bounds shared by sum and sequence rules.
///
/// Values outside `[hard_min, hard_max]` are forbidden; values between a
/// hard and its soft bound are penalized linearly with the matching cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoftBounds {
    pub hard_min: i64,
    pub soft_min: i64,
    pub min_cost: i64,
    pub soft_max: i64,
    pub hard_max: i64,
    pub max_cost: i64,
}

/// Bounded total of assignments of one slot (or one shift's duties) per
/// worker and period bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SumRule {
    pub slot: Box<str>,
    #[serde(rename = "slot_type")]
    pub kind: SlotKind,
    pub period: RulePeriod,
    #[serde(flatten)]
    pub bounds: SoftBounds,
}

/// Bounded length of contiguous assignment runs of one slot (or one shift's
/// duties) per worker, over the planning days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceRule {
    pub slot: Box<str>,
    #[serde(rename = "slot_type")]
    pub kind: SlotKind,
    #[serde(flatten)]
    pub bounds: SoftBounds,
}
