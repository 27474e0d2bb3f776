//! Named linear constraints

use good_lp::{constraint, Constraint, Expression, IntoAffineExpression, Variable};

/// Sum of `coefficient * variable` terms
pub fn weighted_sum<I>(terms: I) -> Expression
where
    I: IntoIterator<Item = (f64, Variable)>,
{
    let mut expression = Expression::from_other_affine(0.0);
    for (coefficient, var) in terms {
        expression += coefficient * var;
    }
    expression
}

/// Relation of a linear constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Leq,
    Geq,
}

/// A constraint tagged with a readable name for logging
pub struct NamedConstraint {
    pub name: String,
    pub relation: Relation,
    pub constraint: Constraint,
}

/// Ordered collection of the constraints of one model
#[derive(Default)]
pub struct ConstraintSet {
    constraints: Vec<NamedConstraint>,
}

impl ConstraintSet {
    /// Create an empty constraint set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `lhs == rhs`
    pub fn eq<R>(&mut self, name: impl Into<String>, lhs: Expression, rhs: R)
    where
        R: IntoAffineExpression,
    {
        self.push(name, Relation::Eq, constraint::eq(lhs - rhs.into_expression(), 0.0));
    }

    /// Add `lhs <= rhs`
    pub fn leq<R>(&mut self, name: impl Into<String>, lhs: Expression, rhs: R)
    where
        R: IntoAffineExpression,
    {
        self.push(name, Relation::Leq, constraint::leq(lhs - rhs.into_expression(), 0.0));
    }

    /// Add `lhs >= rhs`
    pub fn geq<R>(&mut self, name: impl Into<String>, lhs: Expression, rhs: R)
    where
        R: IntoAffineExpression,
    {
        // rhs - lhs <= 0
        let reversed = (lhs - rhs.into_expression()) * -1.0;
        self.push(name, Relation::Geq, constraint::leq(reversed, 0.0));
    }

    /// The indicator sum must be zero: nothing in the slice is selected
    pub fn forbid(&mut self, name: impl Into<String>, indicator: Expression) {
        self.eq(name, indicator, 0.0);
    }

    /// The indicator sum must be exactly one
    pub fn exactly_one(&mut self, name: impl Into<String>, indicator: Expression) {
        self.eq(name, indicator, 1.0);
    }

    /// "Of A and B, one has property P and the other has property Q."
    ///
    /// Each pair holds the indicator sums `(P, Q)` for one subject. Every
    /// subject has exactly one of the two properties and exactly one subject
    /// has `P`.
    pub fn split_pair(
        &mut self,
        name: &str,
        first: (Expression, Expression),
        second: (Expression, Expression),
    ) {
        let (first_p, first_q) = first;
        let (second_p, second_q) = second;

        self.exactly_one(format!("{}_first", name), first_p.clone() + first_q);
        self.exactly_one(format!("{}_second", name), second_p.clone() + second_q);
        self.exactly_one(format!("{}_exclusive", name), first_p + second_p);
    }

    /// `|difference| == magnitude`, through a signed auxiliary integer `gap`
    /// and two binary sign indicators.
    pub fn fixed_magnitude(
        &mut self,
        name: &str,
        difference: Expression,
        magnitude: f64,
        gap: Variable,
        positive: Variable,
        negative: Variable,
    ) {
        self.eq(format!("{}_definition", name), Expression::from(gap), difference);
        self.eq(
            format!("{}_magnitude", name),
            Expression::from(gap),
            magnitude * positive - magnitude * negative,
        );
        self.exactly_one(format!("{}_sign", name), positive + negative);
    }

    fn push(&mut self, name: impl Into<String>, relation: Relation, constraint: Constraint) {
        self.constraints.push(NamedConstraint {
            name: name.into(),
            relation,
            constraint,
        });
    }

    /// Number of constraints
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the set has no constraints
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|c| c.name.as_str())
    }

    /// Consume the set, yielding the named constraints in insertion order
    pub fn into_constraints(self) -> Vec<NamedConstraint> {
        self.constraints
    }

    /// Get statistics about the constraint set
    pub fn statistics(&self) -> ConstraintStatistics {
        let count = |relation| {
            self.constraints
                .iter()
                .filter(|c| c.relation == relation)
                .count()
        };

        ConstraintStatistics {
            total_constraints: self.len(),
            equalities: count(Relation::Eq),
            upper_bounds: count(Relation::Leq),
            lower_bounds: count(Relation::Geq),
        }
    }
}

/// Statistics about a constraint set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintStatistics {
    pub total_constraints: usize,
    pub equalities: usize,
    pub upper_bounds: usize,
    pub lower_bounds: usize,
}

impl std::fmt::Display for ConstraintStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Constraint Statistics:")?;
        writeln!(f, "  Total constraints: {}", self.total_constraints)?;
        writeln!(f, "  Equalities: {}", self.equalities)?;
        writeln!(f, "  <= constraints: {}", self.upper_bounds)?;
        writeln!(f, "  >= constraints: {}", self.lower_bounds)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use good_lp::{variable, ProblemVariables, Solution};
    use std::collections::HashMap;

    #[test]
    fn test_weighted_sum() {
        let mut vars = ProblemVariables::new();
        let a = vars.add(variable().min(0));
        let b = vars.add(variable().min(0));

        let values: HashMap<Variable, f64> = [(a, 1.0), (b, 10.0)].into_iter().collect();

        let expression = weighted_sum(vec![(2.0, a), (3.0, b), (1.0, a)]);
        assert_eq!(values.eval(expression), 33.0);

        let empty = weighted_sum(Vec::new());
        assert_eq!(values.eval(empty), 0.0);
    }

    #[test]
    fn test_relations_are_counted() {
        let mut vars = ProblemVariables::new();
        let a = vars.add(variable().binary());
        let b = vars.add(variable().binary());

        let mut set = ConstraintSet::new();
        set.eq("sum", a + b, 1.0);
        set.leq("a_small", Expression::from(a), 1.0);
        set.geq("b_large", Expression::from(b), 0.0);

        let stats = set.statistics();
        assert_eq!(stats.total_constraints, 3);
        assert_eq!(stats.equalities, 1);
        assert_eq!(stats.upper_bounds, 1);
        assert_eq!(stats.lower_bounds, 1);
    }

    #[test]
    fn test_right_hand_sides() {
        let mut vars = ProblemVariables::new();
        let a = vars.add(variable().min(0));
        let b = vars.add(variable().min(0));

        let mut set = ConstraintSet::new();
        set.eq("constant", Expression::from(a), 3.0);
        set.leq("variable", Expression::from(a), b);
        set.geq("expression", a + b, 2.0 * b - 1.0);

        let names: Vec<_> = set.names().collect();
        assert_eq!(names, vec!["constant", "variable", "expression"]);
    }

    #[test]
    fn test_split_pair_adds_three_equalities() {
        let mut vars = ProblemVariables::new();
        let v: Vec<Variable> = (0..4).map(|_| vars.add(variable().binary())).collect();

        let mut set = ConstraintSet::new();
        set.split_pair(
            "pair",
            (Expression::from(v[0]), Expression::from(v[1])),
            (Expression::from(v[2]), Expression::from(v[3])),
        );

        assert_eq!(set.len(), 3);
        assert_eq!(set.statistics().equalities, 3);
        let names: Vec<_> = set.names().collect();
        assert_eq!(names, vec!["pair_first", "pair_second", "pair_exclusive"]);
    }

    #[test]
    fn test_fixed_magnitude_names() {
        let mut vars = ProblemVariables::new();
        let x = vars.add(variable().integer().min(0).max(10));
        let gap = vars.add(variable().integer().min(-10).max(10));
        let pos = vars.add(variable().binary());
        let neg = vars.add(variable().binary());

        let mut set = ConstraintSet::new();
        set.fixed_magnitude("gap", x - 3.0, 4.0, gap, pos, neg);

        let names: Vec<_> = set.names().collect();
        assert_eq!(names, vec!["gap_definition", "gap_magnitude", "gap_sign"]);
    }
}
