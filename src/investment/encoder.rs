//! LP encoder for the investment allocation model

use super::portfolio::Portfolio;
use crate::milp::{
    weighted_sum, ConstraintSet, MilpSolver, Objective, VariableKind, VariableManager,
};
use anyhow::{Context, Result};
use good_lp::{Expression, Variable};

/// Keys of the model variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvestmentVar {
    /// Dollars placed in `option` starting in `year` (0-based indices)
    Allocation { option: usize, year: usize },
    /// The `rank`-th largest per-option total, 0 being the largest
    Top(usize),
}

/// Builds the allocation LP for a portfolio
pub struct InvestmentEncoder {
    portfolio: Portfolio,
    variables: VariableManager<InvestmentVar>,
    constraints: ConstraintSet,
    objective: Expression,
}

impl InvestmentEncoder {
    /// Declare the variables and encode every constraint and the objective
    pub fn new(portfolio: &Portfolio) -> Result<Self> {
        portfolio.validate().context("Invalid investment data")?;

        let mut encoder = Self {
            portfolio: portfolio.clone(),
            variables: VariableManager::new(),
            constraints: ConstraintSet::new(),
            objective: Expression::from_other_affine(0.0),
        };

        encoder.declare_variables()?;
        encoder.encode_cash_flow()?;
        encoder.encode_tops()?;
        encoder.objective = encoder.build_objective()?;
        Ok(encoder)
    }

    fn declare_variables(&mut self) -> Result<()> {
        for option in 0..self.portfolio.option_count() {
            for year in 0..self.portfolio.years {
                self.variables.add(
                    InvestmentVar::Allocation { option, year },
                    VariableKind::non_negative(),
                )?;
            }
        }
        for rank in 0..self.portfolio.top_weights.len() {
            self.variables
                .add(InvestmentVar::Top(rank), VariableKind::non_negative())?;
        }
        Ok(())
    }

    fn allocation(&self, option: usize, year: usize) -> Result<Variable> {
        Ok(self.variables.get(&InvestmentVar::Allocation { option, year })?)
    }

    fn top(&self, rank: usize) -> Result<Variable> {
        Ok(self.variables.get(&InvestmentVar::Top(rank))?)
    }

    /// Sum over options of the allocations made in `year`
    pub fn year_total(&self, year: usize) -> Result<Expression> {
        let terms = (0..self.portfolio.option_count())
            .map(|option| Ok((1.0, self.allocation(option, year)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(weighted_sum(terms))
    }

    /// Sum over years of the allocations made in `option`
    pub fn option_total(&self, option: usize) -> Result<Expression> {
        let terms = (0..self.portfolio.years)
            .map(|year| Ok((1.0, self.allocation(option, year)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(weighted_sum(terms))
    }

    /// Principal plus interest of every allocation maturing in `year`
    pub fn matured(&self, year: usize) -> Result<Expression> {
        let mut terms = Vec::new();
        for option in 0..self.portfolio.option_count() {
            for start in 0..year {
                let coefficient = self.portfolio.maturity_coefficient(option, start, year)?;
                if coefficient != 0.0 {
                    terms.push((coefficient, self.allocation(option, start)?));
                }
            }
        }
        Ok(weighted_sum(terms))
    }

    /// First year invests the initial funds, later years reinvest what matured
    fn encode_cash_flow(&mut self) -> Result<()> {
        let initial = self.year_total(0)?;
        let name = format!("funds_{}", self.portfolio.year_label(0));
        self.constraints.eq(name, initial, self.portfolio.initial_funds);

        for year in 1..self.portfolio.years {
            let invested = self.year_total(year)?;
            let matured = self.matured(year)?;
            let name = format!("reinvest_{}", self.portfolio.year_label(year));
            self.constraints.eq(name, invested, matured);
        }
        Ok(())
    }

    /// Largest option total bounded by the final-year total, ranks ordered
    fn encode_tops(&mut self) -> Result<()> {
        if self.portfolio.top_weights.is_empty() {
            return Ok(());
        }

        let largest = Expression::from(self.top(0)?);
        for option in 0..self.portfolio.option_count() {
            let total = self.option_total(option)?;
            self.constraints
                .geq(format!("top_covers_option_{}", option + 1), largest.clone(), total);
        }

        let last = self.year_total(self.portfolio.last_year())?;
        self.constraints.leq("top_within_final_year", largest, last);

        for rank in 1..self.portfolio.top_weights.len() {
            let higher = self.top(rank - 1)?;
            let lower = Expression::from(self.top(rank)?);
            self.constraints
                .leq(format!("top_{}_ordered", rank + 1), lower, Expression::from(higher));
        }
        Ok(())
    }

    /// Final-year capital plus the weighted tops
    fn build_objective(&self) -> Result<Expression> {
        let mut objective = self.year_total(self.portfolio.last_year())?;
        for (rank, &weight) in self.portfolio.top_weights.iter().enumerate() {
            objective += weight * self.top(rank)?;
        }
        Ok(objective)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraint names in insertion order
    pub fn constraint_names(&self) -> Vec<String> {
        self.constraints.names().map(str::to_string).collect()
    }

    /// Hand the model to the solver, maximising the objective
    pub fn into_solver(self) -> MilpSolver<InvestmentVar> {
        MilpSolver::new(
            "investment",
            self.variables,
            self.constraints,
            Objective::maximise(self.objective),
        )
    }
}
