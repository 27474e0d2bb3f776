//! Investment model driver: build, solve, extract, validate

use super::encoder::InvestmentEncoder;
use super::plan::InvestmentPlan;
use super::portfolio::Portfolio;
use super::validator::PlanValidator;
use crate::milp::{SolveStatus, SolverStatistics};
use anyhow::{bail, Context, Result};
use tracing::{debug, info};

/// The allocation LP over one portfolio
pub struct InvestmentProblem {
    portfolio: Portfolio,
    validator: PlanValidator,
    last_statistics: Option<SolverStatistics>,
}

impl InvestmentProblem {
    pub fn new(portfolio: Portfolio, tolerance: f64) -> Self {
        Self {
            portfolio,
            validator: PlanValidator::new(tolerance),
            last_statistics: None,
        }
    }

    /// Solve for the allocation maximising final capital plus the weighted tops
    pub fn solve(&mut self) -> Result<Option<InvestmentPlan>> {
        let encoder = InvestmentEncoder::new(&self.portfolio)?;
        debug!(
            variables = encoder.variable_count(),
            constraints = encoder.constraint_count(),
            "investment model encoded"
        );

        let outcome = encoder.into_solver().solve();
        self.last_statistics = Some(outcome.statistics);

        let solution = match (outcome.status, outcome.solution) {
            (SolveStatus::Optimal, Some(solution)) => solution,
            (status, _) => {
                info!(status = ?status, "investment model has no optimal solution");
                return Ok(None);
            }
        };

        let plan = InvestmentPlan::from_solution(&self.portfolio, &solution)
            .context("Failed to read the allocation plan")?;

        let report = self.validator.validate(&self.portfolio, &plan);
        if !report.is_valid() {
            bail!("Solver plan fails validation:\n{}", report);
        }
        for (option, year, amount) in plan.positions() {
            debug!(
                option = option + 1,
                year = self.portfolio.year_label(year),
                amount,
                "allocation"
            );
        }
        info!(
            final_capital = plan.final_capital(),
            objective = plan.objective,
            "investment plan validated"
        );

        Ok(Some(plan))
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Statistics of the most recent solver run
    pub fn last_statistics(&self) -> Option<&SolverStatistics> {
        self.last_statistics.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::portfolio::{InvestmentOption, RateIndexing};

    const TOLERANCE: f64 = 1e-6;

    fn solve_default() -> InvestmentPlan {
        let mut problem = InvestmentProblem::new(Portfolio::default(), TOLERANCE);
        problem.solve().unwrap().unwrap()
    }

    #[test]
    fn test_initial_funds_invested() {
        let plan = solve_default();
        assert!((plan.year_total(0) - 14000.0).abs() < 1e-4);
        assert!(plan.allocations.iter().flatten().all(|v| *v >= -1e-7));
    }

    #[test]
    fn test_cash_flow_recurrence() {
        let portfolio = Portfolio::default();
        let plan = solve_default();

        for year in 1..portfolio.years {
            let matured: f64 = (0..6)
                .flat_map(|option| (0..year).map(move |start| (option, start)))
                .map(|(option, start)| {
                    portfolio.maturity_coefficient(option, start, year).unwrap()
                        * plan.allocation(option, start)
                })
                .sum();
            assert!((plan.year_total(year) - matured).abs() < 1e-3, "year {}", year);
        }
    }

    #[test]
    fn test_tops_are_ordered_and_bounded() {
        let plan = solve_default();
        let tops = &plan.tops;
        assert_eq!(tops.len(), 3);
        assert!(tops[0] >= tops[1] - 1e-6 && tops[1] >= tops[2] - 1e-6 && tops[2] >= -1e-6);

        for option in 0..6 {
            assert!(tops[0] >= plan.option_total(option) - 1e-3);
        }
        assert!(tops[0] <= plan.final_capital() + 1e-3);
    }

    #[test]
    fn test_optimal_objective() {
        let plan = solve_default();
        assert!((plan.objective - 32514.1576).abs() < 1e-2, "objective {}", plan.objective);
        assert!((plan.final_capital() - 20976.8759).abs() < 1e-2);
    }

    #[test]
    fn test_start_year_indexing_optimum() {
        // 14000 in option 1 for 2021, the 17640 it returns in option 6 for 2023
        let portfolio = Portfolio {
            rate_indexing: RateIndexing::StartYear,
            ..Portfolio::default()
        };
        let mut problem = InvestmentProblem::new(portfolio, TOLERANCE);
        let plan = problem.solve().unwrap().unwrap();

        assert!((plan.objective - 34997.76).abs() < 1e-2, "objective {}", plan.objective);
        assert!((plan.final_capital() - 22579.2).abs() < 1e-2);
    }

    #[test]
    fn test_infeasible_variant() {
        // Nothing matures within two years, yet the top must cover the first allocation
        let portfolio = Portfolio {
            years: 2,
            options: vec![InvestmentOption::new(3, vec![0.5])],
            ..Portfolio::default()
        };
        let mut problem = InvestmentProblem::new(portfolio, TOLERANCE);

        assert!(problem.solve().unwrap().is_none());
        assert_eq!(
            problem.last_statistics().unwrap().status,
            SolveStatus::Infeasible
        );
    }

    #[test]
    fn test_invalid_portfolio_is_an_error() {
        let portfolio = Portfolio {
            initial_funds: f64::INFINITY,
            ..Portfolio::default()
        };
        let mut problem = InvestmentProblem::new(portfolio, TOLERANCE);
        assert!(problem.solve().is_err());
    }
}
