//! Solver integration using `good_lp`

use super::constraints::{ConstraintSet, ConstraintStatistics};
use super::variables::{VariableManager, VariableStatistics};
use good_lp::{default_solver, Expression, ResolutionError, Solution, SolverModel};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Optimisation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Maximise,
    Minimise,
}

/// Linear objective of a model
#[derive(Clone)]
pub struct Objective {
    pub sense: Sense,
    pub expression: Expression,
}

impl Objective {
    pub fn maximise(expression: Expression) -> Self {
        Self { sense: Sense::Maximise, expression }
    }

    pub fn minimise(expression: Expression) -> Self {
        Self { sense: Sense::Minimise, expression }
    }

    /// Constant objective, used for pure feasibility models
    pub fn feasibility() -> Self {
        Self::minimise(Expression::from_other_affine(0.0))
    }
}

/// Final status reported by the solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Failed(String),
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

/// Variable values of an optimal solution, keyed like the model
#[derive(Debug, Clone)]
pub struct SolverSolution<K> {
    pub values: HashMap<K, f64>,
    pub objective: f64,
    pub solve_time: Duration,
}

impl<K: Eq + Hash> SolverSolution<K> {
    /// Value of a variable, if it belongs to the model
    pub fn value(&self, key: &K) -> Option<f64> {
        self.values.get(key).copied()
    }
}

/// Statistics about one solver run
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub model_name: String,
    pub variables: VariableStatistics,
    pub constraints: ConstraintStatistics,
    pub solve_time: Duration,
    pub status: SolveStatus,
}

/// Status, optional solution and statistics of one run
#[derive(Debug, Clone)]
pub struct SolveOutcome<K> {
    pub status: SolveStatus,
    pub solution: Option<SolverSolution<K>>,
    pub statistics: SolverStatistics,
}

/// A complete model ready to be handed to the solver
pub struct MilpSolver<K> {
    name: String,
    variables: VariableManager<K>,
    constraints: ConstraintSet,
    objective: Objective,
}

impl<K> MilpSolver<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(
        name: impl Into<String>,
        variables: VariableManager<K>,
        constraints: ConstraintSet,
        objective: Objective,
    ) -> Self {
        Self {
            name: name.into(),
            variables,
            constraints,
            objective,
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    /// Get the number of constraints
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Solve the model, blocking until the solver returns
    pub fn solve(self) -> SolveOutcome<K> {
        let variable_stats = self.variables.statistics();
        let constraint_stats = self.constraints.statistics();

        info!(
            model = %self.name,
            variables = variable_stats.total_variables,
            constraints = constraint_stats.total_constraints,
            "building model"
        );

        let (problem, variable_map) = self.variables.into_parts();
        let objective = self.objective.expression.clone();
        let unsolved = match self.objective.sense {
            Sense::Maximise => problem.maximise(self.objective.expression),
            Sense::Minimise => problem.minimise(self.objective.expression),
        };

        let mut model = unsolved.using(default_solver);
        for named in self.constraints.into_constraints() {
            debug!(
                model = %self.name,
                constraint = %named.name,
                relation = ?named.relation,
                "adding constraint"
            );
            model.add_constraint(named.constraint);
        }

        info!(model = %self.name, "solving");
        let start_time = Instant::now();
        let result = model.solve();
        let solve_time = start_time.elapsed();

        let (status, solution) = match result {
            Ok(solved) => {
                let values = variable_map
                    .iter()
                    .map(|(key, var)| (key.clone(), solved.value(*var)))
                    .collect();
                let solution = SolverSolution {
                    values,
                    objective: solved.eval(objective),
                    solve_time,
                };
                (SolveStatus::Optimal, Some(solution))
            }
            Err(ResolutionError::Infeasible) => (SolveStatus::Infeasible, None),
            Err(ResolutionError::Unbounded) => (SolveStatus::Unbounded, None),
            Err(other) => (SolveStatus::Failed(other.to_string()), None),
        };

        match &status {
            SolveStatus::Optimal => info!(
                model = %self.name,
                elapsed_ms = solve_time.as_millis() as u64,
                objective = solution.as_ref().map(|s| s.objective).unwrap_or_default(),
                "optimal solution found"
            ),
            other => warn!(
                model = %self.name,
                elapsed_ms = solve_time.as_millis() as u64,
                status = ?other,
                "no optimal solution"
            ),
        }

        SolveOutcome {
            statistics: SolverStatistics {
                model_name: self.name,
                variables: variable_stats,
                constraints: constraint_stats,
                solve_time,
                status: status.clone(),
            },
            status,
            solution,
        }
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics ({}):", self.model_name)?;
        write!(f, "{}", self.variables)?;
        write!(f, "{}", self.constraints)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Status: {:?}", self.status)?;
        Ok(())
    }
}
