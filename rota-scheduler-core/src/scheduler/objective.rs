//! Accumulation of weighted penalty terms into the minimize expression.

use rota_scheduler_sat::{BoolVar, IntVar, LinearExpr, VarId};

/// One flat list of weighted objective terms; Boolean terms are the 0/1
/// special case of integer terms.
#[derive(Debug, Default)]
pub struct ObjectiveSink {
    terms: Vec<(VarId, i64)>,
}

impl ObjectiveSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_bool(&mut self, var: BoolVar, coeff: i64) {
        self.terms.push((var.into(), coeff));
    }

    pub fn push_int(&mut self, var: IntVar, coeff: i64) {
        self.terms.push((var.into(), coeff));
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Reduces the accumulated terms to a single linear expression.
    pub fn to_expr(&self) -> LinearExpr {
        let mut expr = LinearExpr::new();
        for &(var, coeff) in &self.terms {
            expr.add_term(var, coeff);
        }
        expr
    }
}
