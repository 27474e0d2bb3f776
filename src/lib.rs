//! MILP Puzzle Models
//!
//! This library formulates two fixed puzzles as mixed-integer and linear
//! programs and solves them with `good_lp`: a music clue puzzle over a 4-D
//! binary assignment tensor, and a multi-year investment allocation LP.

pub mod config;
pub mod investment;
pub mod milp;
pub mod music;
pub mod utils;
pub mod validation;

pub use config::Settings;
pub use investment::{InvestmentPlan, InvestmentProblem};
pub use music::{Assignment, MusicProblem};

use anyhow::Result;

/// Solve the music puzzle with the configured extra clues
pub fn solve_music(settings: &Settings) -> Result<Option<Assignment>> {
    let mut problem = MusicProblem::new(&settings.music);
    problem.solve()
}

/// Solve the investment model for the configured portfolio
pub fn solve_investment(settings: &Settings) -> Result<Option<InvestmentPlan>> {
    let mut problem =
        InvestmentProblem::new(settings.investment.clone(), settings.solver.tolerance);
    problem.solve()
}
