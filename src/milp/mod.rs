//! Modelling glue over the `good_lp` MILP solver

pub mod constraints;
pub mod solver;
pub mod variables;

pub use constraints::{weighted_sum, ConstraintSet, ConstraintStatistics, NamedConstraint, Relation};
pub use solver::{
    MilpSolver, Objective, Sense, SolveOutcome, SolveStatus, SolverSolution, SolverStatistics,
};
pub use variables::{ModelError, VariableKind, VariableManager, VariableStatistics};
