//! Optimal allocation read back from the solver

use super::encoder::InvestmentVar;
use super::portfolio::Portfolio;
use crate::milp::SolverSolution;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::fmt;

/// Solver noise below this magnitude is reported as zero
const ZERO_THRESHOLD: f64 = 1e-9;

fn clean(value: f64) -> f64 {
    if value.abs() < ZERO_THRESHOLD {
        0.0
    } else {
        value
    }
}

/// Allocation matrix, tops and objective of a solved model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentPlan {
    pub first_year: i32,
    /// `allocations[option][year]`
    pub allocations: Vec<Vec<f64>>,
    pub tops: Vec<f64>,
    pub objective: f64,
}

impl InvestmentPlan {
    /// Read every allocation and top out of a solver solution
    pub fn from_solution(
        portfolio: &Portfolio,
        solution: &SolverSolution<InvestmentVar>,
    ) -> Result<Self> {
        let read = |key: InvestmentVar| {
            solution
                .value(&key)
                .map(clean)
                .ok_or_else(|| anyhow!("solution has no value for {:?}", key))
        };

        let allocations = (0..portfolio.option_count())
            .map(|option| {
                (0..portfolio.years)
                    .map(|year| read(InvestmentVar::Allocation { option, year }))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let tops = (0..portfolio.top_weights.len())
            .map(|rank| read(InvestmentVar::Top(rank)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            first_year: portfolio.first_year,
            allocations,
            tops,
            objective: solution.objective,
        })
    }

    pub fn option_count(&self) -> usize {
        self.allocations.len()
    }

    pub fn year_count(&self) -> usize {
        self.allocations.first().map_or(0, Vec::len)
    }

    /// Dollars placed in `option` starting in `year`
    pub fn allocation(&self, option: usize, year: usize) -> f64 {
        self.allocations
            .get(option)
            .and_then(|row| row.get(year))
            .copied()
            .unwrap_or(0.0)
    }

    /// Total placed across options in `year`
    pub fn year_total(&self, year: usize) -> f64 {
        (0..self.option_count())
            .map(|option| self.allocation(option, year))
            .sum()
    }

    /// Total placed in `option` across the horizon
    pub fn option_total(&self, option: usize) -> f64 {
        self.allocations.get(option).map_or(0.0, |row| row.iter().sum())
    }

    /// Capital invested in the last year
    pub fn final_capital(&self) -> f64 {
        match self.year_count() {
            0 => 0.0,
            years => self.year_total(years - 1),
        }
    }

    /// Options with a non-zero allocation, as (option, year, amount), 0-based
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.allocations.iter().enumerate().flat_map(|(option, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, amount)| **amount > 0.0)
                .map(move |(year, amount)| (option, year, *amount))
        })
    }
}

impl fmt::Display for InvestmentPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimal solution:")?;
        for (option, row) in self.allocations.iter().enumerate() {
            for (year, amount) in row.iter().enumerate() {
                writeln!(f, "x[{},{}] = {}", option + 1, year + 1, amount)?;
            }
        }
        writeln!(f, "Maximized value of P4: {}", self.objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn plan() -> InvestmentPlan {
        let mut allocations = vec![vec![0.0; 3]; 2];
        allocations[0][0] = 100.0;
        allocations[1][1] = 112.0;
        allocations[0][2] = 125.44;
        InvestmentPlan {
            first_year: 2021,
            allocations,
            tops: vec![225.44],
            objective: 215.616,
        }
    }

    #[test]
    fn test_totals() {
        let plan = plan();
        assert_eq!(plan.year_total(0), 100.0);
        assert_eq!(plan.year_total(1), 112.0);
        assert!((plan.option_total(0) - 225.44).abs() < 1e-9);
        assert!((plan.final_capital() - 125.44).abs() < 1e-9);
        assert_eq!(plan.positions().count(), 3);
    }

    #[test]
    fn test_display() {
        let text = plan().to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Optimal solution:");
        assert_eq!(lines[1], "x[1,1] = 100");
        assert_eq!(lines[3], "x[1,3] = 125.44");
        assert_eq!(lines[5], "x[2,2] = 112");
        assert_eq!(lines.len(), 1 + 6 + 1);
        assert_eq!(lines[7], "Maximized value of P4: 215.616");
    }

    #[test]
    fn test_from_solution_cleans_noise() {
        let portfolio = Portfolio {
            years: 1,
            top_weights: vec![0.5],
            ..Portfolio::default()
        };

        let mut values: HashMap<InvestmentVar, f64> = (0..6)
            .map(|option| (InvestmentVar::Allocation { option, year: 0 }, -1e-12))
            .collect();
        values.insert(InvestmentVar::Allocation { option: 2, year: 0 }, 14000.0);
        values.insert(InvestmentVar::Top(0), 14000.0);

        let solution = SolverSolution {
            values,
            objective: 21000.0,
            solve_time: Duration::ZERO,
        };

        let plan = InvestmentPlan::from_solution(&portfolio, &solution).unwrap();
        assert_eq!(plan.allocation(0, 0), 0.0);
        assert!(plan.allocation(0, 0).is_sign_positive());
        assert_eq!(plan.final_capital(), 14000.0);
        assert_eq!(plan.tops, vec![14000.0]);
    }

    #[test]
    fn test_from_solution_missing_value() {
        let solution = SolverSolution {
            values: HashMap::new(),
            objective: 0.0,
            solve_time: Duration::ZERO,
        };
        assert!(InvestmentPlan::from_solution(&Portfolio::default(), &solution).is_err());
    }
}
