use crate::model::catalog::{Catalog, OffDay, OffDayScope, Worker};
use crate::model::configuration::Configuration;
use crate::model::rules::SoftBounds;
use crate::model::tables::{DutyRow, DutyTable};
use crate::scheduler::calendar::Calendar;
use crate::scheduler::scheduling::RosterProblem;
use chrono::NaiveDate;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn mock_off_day(scope: OffDayScope, weekly_min: i64, weekly_max: i64) -> OffDay {
    OffDay {
        id: "DO".into(),
        scope,
        weekly_min,
        weekly_max,
    }
}

pub fn mock_catalog(
    workers: &[(&str, &str)],
    duties: &[&str],
    leaves: &[&str],
    shifts: &[(&str, &[&str])],
) -> Catalog {
    mock_catalog_with_off_day(
        workers,
        duties,
        leaves,
        shifts,
        mock_off_day(OffDayScope::Daily, 0, 1),
    )
}

pub fn mock_catalog_with_off_day(
    workers: &[(&str, &str)],
    duties: &[&str],
    leaves: &[&str],
    shifts: &[(&str, &[&str])],
    off_day: OffDay,
) -> Catalog {
    let config = Configuration {
        seed: 7,
        ..Configuration::default()
    };
    Catalog::new(
        workers
            .iter()
            .map(|&(id, role)| Worker::new(id, [role]))
            .collect(),
        duties.iter().map(|&s| Box::from(s)).collect(),
        leaves.iter().map(|&s| Box::from(s)).collect(),
        shifts
            .iter()
            .map(|&(id, members)| {
                (
                    Box::from(id),
                    members.iter().map(|&m| Box::from(m)).collect(),
                )
            })
            .collect(),
        off_day,
        &config,
    )
    .unwrap()
}

/// One duty row per day and entry; an entry is (id, role, min, max, shift).
pub fn mock_duty_rows(
    days: &[NaiveDate],
    duties: &[(&str, &str, i64, i64, &str)],
) -> Vec<DutyRow> {
    let mut rows = Vec::new();
    for &d in days {
        for &(id, role, min_staff, max_staff, shift) in duties {
            rows.push(DutyRow::duty(
                d,
                id,
                format!("{id} duty"),
                role,
                role,
                min_staff,
                max_staff,
                shift,
            ));
        }
    }
    rows
}

pub fn mock_problem(catalog: Catalog, calendar: Calendar, duty_table: DutyTable) -> RosterProblem {
    RosterProblem {
        catalog,
        calendar,
        duty_table,
        requests: Vec::new(),
        transition_rules: Vec::new(),
        sum_rules: Vec::new(),
        sequence_rules: Vec::new(),
        prior_timeslots: Vec::new(),
        overrides: Vec::new(),
    }
}

/// Default configuration with the excess-cover penalty disabled, so
/// objective values in tests come only from the constraint under test.
pub fn quiet_config() -> Configuration {
    Configuration {
        excess_cover_penalty: 0,
        ..Configuration::default()
    }
}

pub fn bounds(
    hard_min: i64,
    soft_min: i64,
    min_cost: i64,
    soft_max: i64,
    hard_max: i64,
    max_cost: i64,
) -> SoftBounds {
    SoftBounds {
        hard_min,
        soft_min,
        min_cost,
        soft_max,
        hard_max,
        max_cost,
    }
}
