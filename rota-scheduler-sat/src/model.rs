//! Model construction: variables, constraints and the objective.

/// Opaque index of any variable in a [`Model`], Boolean or integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) u32);

/// A Boolean variable with domain {0, 1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoolVar(pub(crate) u32);

/// An integer variable with an inclusive bounded domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntVar(pub(crate) u32);

impl From<BoolVar> for VarId {
    fn from(v: BoolVar) -> Self {
        VarId(v.0)
    }
}
impl From<IntVar> for VarId {
    fn from(v: IntVar) -> Self {
        VarId(v.0)
    }
}

/// A Boolean variable or its negation, as used in clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal {
    pub(crate) var: u32,
    pub(crate) negated: bool,
}

impl BoolVar {
    /// The positive literal of this variable.
    pub fn lit(self) -> Literal {
        Literal { var: self.0, negated: false }
    }
    /// The negated literal of this variable.
    pub fn negated(self) -> Literal {
        Literal { var: self.0, negated: true }
    }
}

impl From<BoolVar> for Literal {
    fn from(v: BoolVar) -> Self {
        v.lit()
    }
}

/// Operand of a min/max equality: a variable or a constant.
#[derive(Debug, Clone, Copy)]
pub enum Operand {
    Var(VarId),
    Const(i64),
}

impl From<IntVar> for Operand {
    fn from(v: IntVar) -> Self {
        Operand::Var(v.into())
    }
}
impl From<i64> for Operand {
    fn from(k: i64) -> Self {
        Operand::Const(k)
    }
}

/// A weighted sum of variables plus a constant.
#[derive(Debug, Clone, Default)]
pub struct LinearExpr {
    pub(crate) terms: Vec<(u32, i64)>,
    pub(crate) constant: i64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables with unit coefficients.
    pub fn sum<V: Into<VarId>>(vars: impl IntoIterator<Item = V>) -> Self {
        let mut expr = Self::new();
        for v in vars {
            expr.add_term(v, 1);
        }
        expr
    }

    pub fn add_term(&mut self, var: impl Into<VarId>, coeff: i64) {
        self.terms.push((var.into().0, coeff));
    }

    pub fn term(mut self, var: impl Into<VarId>, coeff: i64) -> Self {
        self.add_term(var, coeff);
        self
    }

    pub fn constant(mut self, value: i64) -> Self {
        self.constant += value;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Constraint {
    BoolOr(Vec<Literal>),
    AtMostOne(Vec<u32>),
    /// lo <= sum(terms) <= hi, the expression constant already folded into the bounds.
    Linear { terms: Vec<(u32, i64)>, lo: i64, hi: i64 },
    MaxEq { target: u32, operands: Vec<Operand> },
    MinEq { target: u32, operands: Vec<Operand> },
}

/// A constraint model under construction.
///
/// The model uniquely owns its variables and constraints; solving never
/// mutates it, so several solves of the same model are possible.
#[derive(Debug, Default)]
pub struct Model {
    pub(crate) domains: Vec<(i64, i64)>,
    pub(crate) names: Vec<Box<str>>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Vec<(u32, i64)>,
    pub(crate) objective_constant: i64,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_bool_var(&mut self, name: impl Into<Box<str>>) -> BoolVar {
        let id = self.push_var(0, 1, name.into());
        BoolVar(id)
    }

    pub fn new_int_var(&mut self, lo: i64, hi: i64, name: impl Into<Box<str>>) -> IntVar {
        let id = self.push_var(lo, hi, name.into());
        IntVar(id)
    }

    fn push_var(&mut self, lo: i64, hi: i64, name: Box<str>) -> u32 {
        let id = self.domains.len() as u32;
        self.domains.push((lo, hi));
        self.names.push(name);
        id
    }

    pub fn var_count(&self) -> usize {
        self.domains.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn name(&self, var: impl Into<VarId>) -> &str {
        &self.names[var.into().0 as usize]
    }

    /// At least one of the literals must hold.
    pub fn add_bool_or(&mut self, literals: impl IntoIterator<Item = Literal>) {
        self.constraints.push(Constraint::BoolOr(literals.into_iter().collect()));
    }

    /// `if_var == 1` forces `then_var == 1`.
    pub fn add_implication(&mut self, if_var: BoolVar, then_var: BoolVar) {
        self.add_bool_or([if_var.negated(), then_var.lit()]);
    }

    /// At most one of the variables may be 1.
    pub fn add_at_most_one(&mut self, vars: impl IntoIterator<Item = BoolVar>) {
        self.constraints
            .push(Constraint::AtMostOne(vars.into_iter().map(|v| v.0).collect()));
    }

    /// Pins a Boolean variable to a fixed value.
    pub fn fix(&mut self, var: BoolVar, value: bool) {
        let v = value as i64;
        let (lo, hi) = self.domains[var.0 as usize];
        // An empty domain is left in place; the solver reports Infeasible.
        self.domains[var.0 as usize] = (lo.max(v), hi.min(v));
    }

    /// `lo <= expr <= hi`.
    pub fn add_linear(&mut self, expr: LinearExpr, lo: i64, hi: i64) {
        self.constraints.push(Constraint::Linear {
            lo: lo - expr.constant,
            hi: hi - expr.constant,
            terms: expr.terms,
        });
    }

    pub fn add_eq(&mut self, expr: LinearExpr, value: i64) {
        self.add_linear(expr, value, value);
    }

    pub fn add_le(&mut self, expr: LinearExpr, hi: i64) {
        let (natural_lo, _) = self.natural_bounds(&expr.terms);
        let constant = expr.constant;
        self.add_linear(expr, natural_lo + constant, hi);
    }

    pub fn add_ge(&mut self, expr: LinearExpr, lo: i64) {
        let (_, natural_hi) = self.natural_bounds(&expr.terms);
        let constant = expr.constant;
        self.add_linear(expr, lo, natural_hi + constant);
    }

    /// `target == max(operands)`.
    pub fn add_max_equality(&mut self, target: IntVar, operands: impl IntoIterator<Item = Operand>) {
        let operands: Vec<Operand> = operands.into_iter().collect();
        debug_assert!(!operands.is_empty());
        self.constraints.push(Constraint::MaxEq { target: target.0, operands });
    }

    /// `target == min(operands)`.
    pub fn add_min_equality(&mut self, target: IntVar, operands: impl IntoIterator<Item = Operand>) {
        let operands: Vec<Operand> = operands.into_iter().collect();
        debug_assert!(!operands.is_empty());
        self.constraints.push(Constraint::MinEq { target: target.0, operands });
    }

    /// Installs the objective; the solver minimizes it. Installing twice
    /// replaces the previous directive.
    pub fn minimize(&mut self, objective: LinearExpr) {
        self.objective = objective.terms;
        self.objective_constant = objective.constant;
    }

    /// The loosest bounds the expression can take under the current domains.
    fn natural_bounds(&self, terms: &[(u32, i64)]) -> (i64, i64) {
        let mut lo = 0;
        let mut hi = 0;
        for &(v, c) in terms {
            let (l, h) = self.domains[v as usize];
            if c >= 0 {
                lo += c * l;
                hi += c * h;
            } else {
                lo += c * h;
                hi += c * l;
            }
        }
        (lo, hi)
    }
}
