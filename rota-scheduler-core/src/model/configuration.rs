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

use serde::{Deserialize, Serialize};

/// Build-and-solve options of the roster engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    // --- Model construction ---
    /// Seed of the worker-list shuffle done at catalog construction.
    pub seed: u64,
    // --- Policy toggles ---
    pub fairness: bool,
    pub objective: ObjectiveMode,
    pub excess_cover_penalty: i64,
    // --- Payload options ---
    pub include_leaves: bool,
    pub include_requests: bool,
    // --- Solver ---
    pub time_limit_ms: Option<u64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            // --- Model construction ---
            seed: 0,
            // --- Policy toggles ---
            fairness: false,
            objective: ObjectiveMode::Penalties,
            excess_cover_penalty: 5,
            // --- Payload options ---
            include_leaves: true,
            include_requests: true,
            // --- Solver ---
            time_limit_ms: None,
        }
    }
}

/// What the single minimize directive is built from.
///
/// `Penalties` installs the accumulated weighted penalty terms (soft sums and
/// sequences, transition costs, request preferences, excess cover). The
/// other modes replace that objective entirely with the named aggregate sum;
/// they are alternatives, never combined with the penalty terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveMode {
    Penalties,
    MinimizeOffDays,
    MaximizeOffDays,
    MaximizeCover,
}
