//! Music puzzle driver: build, solve, extract, validate

use super::assignment::Assignment;
use super::encoder::MusicEncoder;
use super::slice::ExtraClue;
use super::validator::ClueValidator;
use crate::config::MusicConfig;
use crate::milp::{SolveStatus, SolverStatistics};
use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

/// Result of a uniqueness check
#[derive(Debug, Clone, PartialEq)]
pub enum Uniqueness {
    NoSolution,
    Unique(Assignment),
    /// The first two assignments found
    Multiple(Vec<Assignment>),
}

/// The music clue puzzle, optionally with extra clues
pub struct MusicProblem {
    extra_clues: Vec<ExtraClue>,
    validator: ClueValidator,
    last_statistics: Option<SolverStatistics>,
}

impl MusicProblem {
    /// Create the problem from the music section of the settings
    pub fn new(config: &MusicConfig) -> Self {
        Self::with_extra_clues(config.extra_clues.clone())
    }

    pub fn with_extra_clues(extra_clues: Vec<ExtraClue>) -> Self {
        Self {
            validator: ClueValidator::with_extra_clues(extra_clues.clone()),
            extra_clues,
            last_statistics: None,
        }
    }

    fn build_encoder(&self, blocked: &[Assignment]) -> Result<MusicEncoder> {
        let mut encoder = MusicEncoder::standard().context("Failed to encode the clues")?;
        for clue in &self.extra_clues {
            encoder
                .apply(clue)
                .with_context(|| format!("Failed to encode extra clue {}", clue))?;
        }
        for assignment in blocked {
            encoder.block(assignment).context("Failed to block a previous assignment")?;
        }
        debug!(
            variables = encoder.variable_count(),
            constraints = encoder.constraint_count(),
            extra_clues = self.extra_clues.len(),
            blocked = blocked.len(),
            "music model encoded"
        );
        Ok(encoder)
    }

    /// Find one assignment satisfying every clue
    pub fn solve(&mut self) -> Result<Option<Assignment>> {
        self.solve_excluding(&[])
    }

    /// Find one assignment satisfying every clue that differs from each of `blocked`
    pub fn solve_excluding(&mut self, blocked: &[Assignment]) -> Result<Option<Assignment>> {
        let outcome = self.build_encoder(blocked)?.into_solver().solve();
        self.last_statistics = Some(outcome.statistics);

        let solution = match (outcome.status, outcome.solution) {
            (SolveStatus::Optimal, Some(solution)) => solution,
            (status, _) => {
                info!(status = ?status, "music puzzle has no solution");
                return Ok(None);
            }
        };

        let assignment = Assignment::from_values(&solution.values)
            .context("Solver returned a malformed assignment")?;

        let report = self.validator.validate(&assignment);
        if !report.is_valid() {
            bail!("Solver assignment fails validation:\n{}", report);
        }
        debug!(checks = report.checks_run, "assignment validated");

        Ok(Some(assignment))
    }

    /// Collect up to `max` distinct assignments by blocking each one found
    pub fn solve_all(&mut self, max: usize) -> Result<Vec<Assignment>> {
        let mut found = Vec::new();

        while found.len() < max {
            match self.solve_excluding(&found)? {
                Some(assignment) => {
                    info!(index = found.len() + 1, "assignment found");
                    found.push(assignment);
                }
                None => break,
            }
        }

        Ok(found)
    }

    /// Whether exactly one assignment satisfies the clues
    pub fn check_uniqueness(&mut self) -> Result<Uniqueness> {
        let mut found = self.solve_all(2)?;
        let uniqueness = match found.len() {
            0 => Uniqueness::NoSolution,
            1 => Uniqueness::Unique(found.remove(0)),
            _ => Uniqueness::Multiple(found),
        };

        if let Uniqueness::Multiple(_) = uniqueness {
            warn!("clue set admits more than one assignment");
        }
        Ok(uniqueness)
    }

    /// Statistics of the most recent solver run
    pub fn last_statistics(&self) -> Option<&SolverStatistics> {
        self.last_statistics.as_ref()
    }

    pub fn extra_clues(&self) -> &[ExtraClue] {
        &self.extra_clues
    }
}
