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

//! Constraint-model substrate for the roster engine.
//!
//! Provides Boolean and bounded-integer variables, Boolean-OR clauses,
//! implications, at-most-one groups, linear range constraints, min/max
//! equalities and a single minimize directive, together with an exact
//! depth-first branch-and-bound solver.

pub mod model;
pub mod solver;

pub use model::{BoolVar, IntVar, LinearExpr, Literal, Model, Operand, VarId};
pub use solver::{Solution, SolveStats, SolveStatus, Solver};
