//! Tabular data contracts: the duty table consumed by the model builder,
//! prior-period timeslots, selected-roster overrides and the output records.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whether a table row or timeslot denotes work or absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotCategory {
    Duty,
    Leave,
}

/// One (date, slot) row of the duty table.
///
/// Duty rows carry the required role and the staffing bounds; leave rows
/// carry the leave identity and no staffing demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyRow {
    pub date: NaiveDate,
    pub slot_id: Box<str>,
    #[serde(rename = "type")]
    pub category: SlotCategory,
    #[serde(default)]
    pub duty_id: Option<Box<str>>,
    #[serde(default)]
    pub duty_name: Option<Box<str>>,
    #[serde(default)]
    pub leave_id: Option<Box<str>>,
    #[serde(default)]
    pub leave_name: Option<Box<str>>,
    #[serde(default)]
    pub role_id: Option<Box<str>>,
    #[serde(default)]
    pub role_name: Option<Box<str>>,
    #[serde(default)]
    pub min_staff: i64,
    #[serde(default)]
    pub max_staff: i64,
    #[serde(default)]
    pub shift_id: Option<Box<str>>,
}

impl DutyRow {
    pub fn duty(
        date: NaiveDate,
        id: impl Into<Box<str>>,
        name: impl Into<Box<str>>,
        role_id: impl Into<Box<str>>,
        role_name: impl Into<Box<str>>,
        min_staff: i64,
        max_staff: i64,
        shift_id: impl Into<Box<str>>,
    ) -> Self {
        let id = id.into();
        DutyRow {
            date,
            slot_id: id.clone(),
            category: SlotCategory::Duty,
            duty_id: Some(id),
            duty_name: Some(name.into()),
            leave_id: None,
            leave_name: None,
            role_id: Some(role_id.into()),
            role_name: Some(role_name.into()),
            min_staff,
            max_staff,
            shift_id: Some(shift_id.into()),
        }
    }

    pub fn leave(date: NaiveDate, id: impl Into<Box<str>>, name: impl Into<Box<str>>) -> Self {
        let id = id.into();
        DutyRow {
            date,
            slot_id: id.clone(),
            category: SlotCategory::Leave,
            duty_id: None,
            duty_name: None,
            leave_id: Some(id),
            leave_name: Some(name.into()),
            role_id: None,
            role_name: None,
            min_staff: 0,
            max_staff: 0,
            shift_id: None,
        }
    }
}

/// The duty table indexed by (date, slot id), with the per-date valid duty
/// and leave lists derived at construction. Row order within a date follows
/// the input order and is preserved in the decoded payload.
#[derive(Debug, Default)]
pub struct DutyTable {
    rows: IndexMap<NaiveDate, IndexMap<Box<str>, DutyRow>>,
    duties_by_date: IndexMap<NaiveDate, Vec<Box<str>>>,
    leaves_by_date: IndexMap<NaiveDate, Vec<Box<str>>>,
}

impl DutyTable {
    pub fn new(rows: Vec<DutyRow>) -> Self {
        let mut table = DutyTable::default();
        for row in rows {
            let by_date = match row.category {
                SlotCategory::Duty => &mut table.duties_by_date,
                SlotCategory::Leave => &mut table.leaves_by_date,
            };
            by_date.entry(row.date).or_default().push(row.slot_id.clone());
            table
                .rows
                .entry(row.date)
                .or_default()
                .insert(row.slot_id.clone(), row);
        }
        table
    }

    pub fn duties_on(&self, date: NaiveDate) -> &[Box<str>] {
        self.duties_by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn leaves_on(&self, date: NaiveDate) -> &[Box<str>] {
        self.leaves_by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn row(&self, date: NaiveDate, slot: &str) -> Option<&DutyRow> {
        self.rows.get(&date)?.get(slot)
    }

    pub fn rows_on(&self, date: NaiveDate) -> impl Iterator<Item = &DutyRow> {
        self.rows.get(&date).into_iter().flat_map(|rows| rows.values())
    }

    /// Staffing bounds of a duty on a date.
    pub fn staffing(&self, date: NaiveDate, duty: &str) -> Option<(i64, i64)> {
        let row = self.row(date, duty)?;
        Some((row.min_staff, row.max_staff))
    }

    /// Required role id of a duty on a date, when the row carries one.
    pub fn role_on(&self, date: NaiveDate, slot: &str) -> Option<&str> {
        self.row(date, slot)?.role_id.as_deref()
    }
}

/// One assignment of the 14 days preceding the planning window; the model
/// pins the matching variable to 1 and every sibling to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorTimeslot {
    pub worker: Box<str>,
    pub date: NaiveDate,
    pub slot: Box<str>,
    #[serde(rename = "type")]
    pub category: SlotCategory,
}

/// Excludes all slots of one category for a (worker, date) pair, used to
/// keep previously accepted assignments out of a re-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterOverride {
    pub worker: Box<str>,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub category: SlotCategory,
}

/// One line of the decoded roster payload: a worker assigned to a duty or
/// leave slot on a date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRecord {
    pub id: Box<str>,
    pub start: Box<str>,
    pub end: Box<str>,
    pub duty_id: Option<Box<str>>,
    pub duty_name: Option<Box<str>>,
    pub role_id: Option<Box<str>>,
    pub role_name: Option<Box<str>>,
    #[serde(rename = "type")]
    pub category: SlotCategory,
    pub worker_id: Box<str>,
    pub requested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_id: Option<Box<str>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_name: Option<Box<str>>,
}
