//! Re-checks an investment plan against the cash-flow rules

use super::plan::InvestmentPlan;
use super::portfolio::Portfolio;
use crate::validation::ValidationReport;

/// Checks a plan within an absolute tolerance scaled by the initial funds
#[derive(Debug, Clone)]
pub struct PlanValidator {
    tolerance: f64,
}

impl Default for PlanValidator {
    fn default() -> Self {
        Self { tolerance: 1e-6 }
    }
}

impl PlanValidator {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    fn close(&self, scale: f64, left: f64, right: f64) -> bool {
        (left - right).abs() <= self.tolerance * scale.max(1.0)
    }

    fn at_most(&self, scale: f64, left: f64, right: f64) -> bool {
        left <= right + self.tolerance * scale.max(1.0)
    }

    /// Validate a plan
    pub fn validate(&self, portfolio: &Portfolio, plan: &InvestmentPlan) -> ValidationReport {
        let mut report = ValidationReport::new("investment");
        let scale = portfolio.initial_funds;

        report.check(
            "shape",
            plan.option_count() == portfolio.option_count() && plan.year_count() == portfolio.years,
            || {
                format!(
                    "plan is {}x{}, expected {}x{}",
                    plan.option_count(),
                    plan.year_count(),
                    portfolio.option_count(),
                    portfolio.years
                )
            },
        );

        let negative = plan.allocations.iter().flatten().filter(|v| **v < -self.tolerance).count();
        report.check("non_negative", negative == 0, || {
            format!("{} allocations are negative", negative)
        });

        let first = plan.year_total(0);
        report.check(
            "initial_funds",
            self.close(scale, first, portfolio.initial_funds),
            || format!("first year invests {:.4}, expected {:.4}", first, portfolio.initial_funds),
        );

        for year in 1..portfolio.years {
            let invested = plan.year_total(year);
            let mut matured = 0.0;
            for option in 0..portfolio.option_count() {
                for start in 0..year {
                    let coefficient = portfolio
                        .maturity_coefficient(option, start, year)
                        .unwrap_or(0.0);
                    matured += coefficient * plan.allocation(option, start);
                }
            }

            let label = portfolio.year_label(year);
            report.check(format!("reinvest_{}", label), self.close(scale, invested, matured), || {
                format!("{} invests {:.4} but {:.4} matured", label, invested, matured)
            });
        }

        if let Some(&largest) = plan.tops.first() {
            for option in 0..plan.option_count() {
                let total = plan.option_total(option);
                report.check(
                    format!("top_covers_option_{}", option + 1),
                    self.at_most(scale, total, largest),
                    || {
                        format!(
                            "option {} totals {:.4} above top {:.4}",
                            option + 1,
                            total,
                            largest
                        )
                    },
                );
            }

            let last = plan.final_capital();
            report.check("top_within_final_year", self.at_most(scale, largest, last), || {
                format!("top {:.4} exceeds final-year capital {:.4}", largest, last)
            });
        }

        for (rank, pair) in plan.tops.windows(2).enumerate() {
            report.check(
                format!("top_{}_ordered", rank + 2),
                self.at_most(scale, pair[1], pair[0]),
                || format!("top {} is {:.4}, above {:.4}", rank + 2, pair[1], pair[0]),
            );
        }

        let negative_tops = plan.tops.iter().any(|t| *t < -self.tolerance);
        report.check("tops_non_negative", !negative_tops, || {
            "a top is negative".to_string()
        });

        let mut objective = plan.final_capital();
        for (weight, top) in portfolio.top_weights.iter().zip(&plan.tops) {
            objective += weight * top;
        }
        report.check("objective", self.close(scale, objective, plan.objective), || {
            format!("objective reported {:.4}, recomputed {:.4}", plan.objective, objective)
        });

        report
    }
}
