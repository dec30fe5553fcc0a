/*
 * Copyright (c) 2025 Clément GRENNERAT
 *
 * This program is free software: you can redistribute it and/or modify it under the terms of the
 * GNU General Public License as published by the Free Software Foundation, version 3.
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
 * even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
 * See the GNU General Public License for more details.
 * You should have received a copy of the GNU General Public License along with this program.
 * If not, see https://www.gnu.org/licenses/.
 *
 */

//! Planning-period and prior-period day lists, and the week partitioning
//! helpers used by quota and sum constraints.

use crate::error::ModelError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use indexmap::IndexMap;

/// Days of history pinned before the planning window, enough to anchor every
/// transition rule reaching backwards.
pub const PRIOR_PERIOD_DAYS: i64 = 14;

#[derive(Debug, Clone)]
pub struct Calendar {
    planning: Vec<NaiveDate>,
    prior: Vec<NaiveDate>,
    /// Prior days followed by planning days, chronological.
    combined: Vec<NaiveDate>,
    off_day_dates: Vec<NaiveDate>,
}

impl Calendar {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::EmptyPlanningPeriod { start, end });
        }
        let mut planning = Vec::new();
        let mut current = start;
        while current <= end {
            planning.push(current);
            current += Duration::days(1);
        }
        let prior: Vec<NaiveDate> = (1..=PRIOR_PERIOD_DAYS)
            .rev()
            .map(|back| start - Duration::days(back))
            .collect();
        let mut combined = prior.clone();
        combined.extend(&planning);
        Ok(Calendar {
            off_day_dates: planning.clone(),
            planning,
            prior,
            combined,
        })
    }

    /// Replaces the off-day date list, which defaults to the planning days.
    pub fn with_off_day_dates(mut self, dates: Vec<NaiveDate>) -> Self {
        self.off_day_dates = dates;
        self
    }

    pub fn planning_days(&self) -> &[NaiveDate] {
        &self.planning
    }

    pub fn prior_days(&self) -> &[NaiveDate] {
        &self.prior
    }

    pub fn all_days(&self) -> &[NaiveDate] {
        &self.combined
    }

    pub fn off_day_dates(&self) -> &[NaiveDate] {
        &self.off_day_dates
    }

    pub fn is_prior(&self, date: NaiveDate) -> bool {
        self.prior.first().is_some_and(|&first| first <= date)
            && self.prior.last().is_some_and(|&last| date <= last)
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_weekday(date: NaiveDate) -> bool {
        !Self::is_weekend(date)
    }

    /// Groups the saturdays and sundays of `dates` into one bucket per ISO
    /// week, preserving date order and dropping duplicates.
    pub fn weekend_buckets(dates: &[NaiveDate]) -> Vec<Vec<NaiveDate>> {
        let mut buckets: IndexMap<(i32, u32), Vec<NaiveDate>> = IndexMap::new();
        for &date in dates {
            if !Self::is_weekend(date) {
                continue;
            }
            let week = date.iso_week();
            let bucket = buckets.entry((week.year(), week.week())).or_default();
            if !bucket.contains(&date) {
                bucket.push(date);
            }
        }
        buckets.into_values().collect()
    }
}
