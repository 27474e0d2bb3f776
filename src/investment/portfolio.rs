//! Investment options, horizon and objective weights

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by invalid investment data
#[derive(Debug, Error, PartialEq)]
pub enum PortfolioError {
    #[error("portfolio has no investment options")]
    NoOptions,
    #[error("planning horizon must cover at least one year")]
    NoYears,
    #[error("initial funds must be finite and non-negative, got {0}")]
    InvalidFunds(f64),
    #[error("option {option} has a zero duration")]
    ZeroDuration { option: usize },
    #[error("option {option} needs {needed} interest rates to cover the horizon, found {found}")]
    MissingRates {
        option: usize,
        needed: usize,
        found: usize,
    },
    #[error("option {option} has an invalid interest rate {rate} at index {index}")]
    InvalidRate { option: usize, index: usize, rate: f64 },
    #[error("top weight {index} must be finite and non-negative, got {weight}")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("option {0} does not exist")]
    UnknownOption(usize),
}

/// Which entry of an option's rate vector a start year reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateIndexing {
    /// `rates[start - 1]`, with the first year wrapping to the last entry
    #[default]
    PreviousYear,
    /// `rates[start]`
    StartYear,
}

impl RateIndexing {
    /// Position in a vector of `len` rates used by an allocation made at `start`
    pub fn index(self, start: usize, len: usize) -> Option<usize> {
        let index = match self {
            RateIndexing::PreviousYear if start == 0 => len.checked_sub(1)?,
            RateIndexing::PreviousYear => start - 1,
            RateIndexing::StartYear => start,
        };
        (index < len).then_some(index)
    }

    /// Rates an option needs when `starts` start years mature inside the horizon
    fn rates_needed(self, starts: usize) -> usize {
        match self {
            RateIndexing::PreviousYear if starts == 0 => 0,
            RateIndexing::PreviousYear => (starts - 1).max(1),
            RateIndexing::StartYear => starts,
        }
    }
}

/// One investment option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOption {
    /// Years until an allocation matures
    pub duration: usize,
    /// Interest paid at maturity, read through [`RateIndexing`]
    pub interest_rates: Vec<f64>,
}

impl InvestmentOption {
    pub fn new(duration: usize, interest_rates: Vec<f64>) -> Self {
        Self { duration, interest_rates }
    }
}

/// Everything the allocation model needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    pub initial_funds: f64,
    pub first_year: i32,
    pub years: usize,
    /// Objective weights of the largest, second and third largest option totals
    pub top_weights: Vec<f64>,
    pub rate_indexing: RateIndexing,
    pub options: Vec<InvestmentOption>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self {
            initial_funds: 14000.0,
            first_year: 2021,
            years: 5,
            top_weights: vec![0.4, 0.1, 0.05],
            rate_indexing: RateIndexing::default(),
            options: vec![
                InvestmentOption::new(2, vec![0.26, 0.0, 0.26, 0.0]),
                InvestmentOption::new(1, vec![0.12, 0.12, 0.12, 0.12]),
                InvestmentOption::new(3, vec![0.19, 0.19, 0.0, 0.0]),
                InvestmentOption::new(2, vec![0.0, 0.27, 0.27, 0.0]),
                InvestmentOption::new(3, vec![0.0, 0.39, 0.0, 0.0]),
                InvestmentOption::new(2, vec![0.0, 0.0, 0.28, 0.0]),
            ],
        }
    }
}

impl Portfolio {
    /// Check the data describes a well-formed model
    pub fn validate(&self) -> Result<(), PortfolioError> {
        if self.options.is_empty() {
            return Err(PortfolioError::NoOptions);
        }
        if self.years == 0 {
            return Err(PortfolioError::NoYears);
        }
        if !self.initial_funds.is_finite() || self.initial_funds < 0.0 {
            return Err(PortfolioError::InvalidFunds(self.initial_funds));
        }

        for (index, &weight) in self.top_weights.iter().enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(PortfolioError::InvalidWeight { index, weight });
            }
        }

        for (option, investment) in self.options.iter().enumerate() {
            if investment.duration == 0 {
                return Err(PortfolioError::ZeroDuration { option });
            }

            // Starts that mature on or before the last year need a rate
            let needed = self
                .rate_indexing
                .rates_needed(self.years.saturating_sub(investment.duration));
            if investment.interest_rates.len() < needed {
                return Err(PortfolioError::MissingRates {
                    option,
                    needed,
                    found: investment.interest_rates.len(),
                });
            }

            for (index, &rate) in investment.interest_rates.iter().enumerate() {
                if !rate.is_finite() || rate <= -1.0 {
                    return Err(PortfolioError::InvalidRate { option, index, rate });
                }
            }
        }

        Ok(())
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    /// Index of the final year
    pub fn last_year(&self) -> usize {
        self.years.saturating_sub(1)
    }

    /// Calendar label of a year index
    pub fn year_label(&self, year: usize) -> i32 {
        self.first_year + year as i32
    }

    /// Amount paid out in `year` per unit invested in `option` at `start`
    ///
    /// `1 + rate` when the allocation matures exactly in `year`, otherwise 0.
    pub fn maturity_coefficient(
        &self,
        option: usize,
        start: usize,
        year: usize,
    ) -> Result<f64, PortfolioError> {
        let investment = self
            .options
            .get(option)
            .ok_or(PortfolioError::UnknownOption(option))?;

        if year <= start || year - start != investment.duration {
            return Ok(0.0);
        }

        let found = investment.interest_rates.len();
        let rate = self
            .rate_indexing
            .index(start, found)
            .and_then(|index| investment.interest_rates.get(index).copied())
            .ok_or(PortfolioError::MissingRates {
                option,
                needed: self.rate_indexing.rates_needed(start + 1),
                found,
            })?;
        Ok(1.0 + rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_portfolio_is_valid() {
        let portfolio = Portfolio::default();
        assert!(portfolio.validate().is_ok());
        assert_eq!(portfolio.option_count(), 6);
        assert_eq!(portfolio.last_year(), 4);
        assert_eq!(portfolio.year_label(4), 2025);
    }

    #[test]
    fn test_maturity_coefficient() {
        let portfolio = Portfolio::default();

        // a 2021 start reads the last rate: option 1 pays 0%, option 2 pays 12%
        assert_eq!(portfolio.maturity_coefficient(0, 0, 2).unwrap(), 1.0);
        assert!((portfolio.maturity_coefficient(1, 0, 1).unwrap() - 1.12).abs() < 1e-12);
        // option 1 started in 2022 reads the first rate and pays 26% in 2024
        assert!((portfolio.maturity_coefficient(0, 1, 3).unwrap() - 1.26).abs() < 1e-12);
        // option 4 started in 2023 pays 27% in 2025
        assert!((portfolio.maturity_coefficient(3, 2, 4).unwrap() - 1.27).abs() < 1e-12);
        // option 5 started in 2022 pays 0%
        assert_eq!(portfolio.maturity_coefficient(4, 1, 4).unwrap(), 1.0);

        assert_eq!(portfolio.maturity_coefficient(0, 0, 1).unwrap(), 0.0);
        assert_eq!(portfolio.maturity_coefficient(0, 2, 2).unwrap(), 0.0);
        assert_eq!(portfolio.maturity_coefficient(2, 3, 1).unwrap(), 0.0);
        assert_eq!(
            portfolio.maturity_coefficient(6, 0, 1),
            Err(PortfolioError::UnknownOption(6))
        );
    }

    #[test]
    fn test_start_year_indexing() {
        let portfolio = Portfolio {
            rate_indexing: RateIndexing::StartYear,
            ..Portfolio::default()
        };

        assert!((portfolio.maturity_coefficient(0, 0, 2).unwrap() - 1.26).abs() < 1e-12);
        assert_eq!(portfolio.maturity_coefficient(0, 1, 3).unwrap(), 1.0);
        assert!((portfolio.maturity_coefficient(4, 1, 4).unwrap() - 1.39).abs() < 1e-12);
    }

    #[test]
    fn test_rate_index() {
        assert_eq!(RateIndexing::PreviousYear.index(0, 4), Some(3));
        assert_eq!(RateIndexing::PreviousYear.index(1, 4), Some(0));
        assert_eq!(RateIndexing::PreviousYear.index(4, 4), Some(3));
        assert_eq!(RateIndexing::PreviousYear.index(5, 4), None);
        assert_eq!(RateIndexing::PreviousYear.index(0, 0), None);
        assert_eq!(RateIndexing::StartYear.index(3, 4), Some(3));
        assert_eq!(RateIndexing::StartYear.index(4, 4), None);
    }

    #[test]
    fn test_validation_errors() {
        let mut portfolio = Portfolio::default();
        portfolio.options.clear();
        assert_eq!(portfolio.validate(), Err(PortfolioError::NoOptions));

        let mut portfolio = Portfolio::default();
        portfolio.years = 0;
        assert_eq!(portfolio.validate(), Err(PortfolioError::NoYears));

        let mut portfolio = Portfolio::default();
        portfolio.initial_funds = -1.0;
        assert_eq!(portfolio.validate(), Err(PortfolioError::InvalidFunds(-1.0)));

        let mut portfolio = Portfolio::default();
        portfolio.options[3].duration = 0;
        assert_eq!(portfolio.validate(), Err(PortfolioError::ZeroDuration { option: 3 }));

        let mut portfolio = Portfolio::default();
        portfolio.options[1].interest_rates.truncate(2);
        assert_eq!(
            portfolio.validate(),
            Err(PortfolioError::MissingRates { option: 1, needed: 3, found: 2 })
        );

        let mut portfolio = Portfolio::default();
        portfolio.top_weights[2] = f64::NAN;
        assert!(matches!(
            portfolio.validate(),
            Err(PortfolioError::InvalidWeight { index: 2, .. })
        ));
    }

    #[test]
    fn test_short_horizon_needs_fewer_rates() {
        let portfolio = Portfolio {
            years: 2,
            options: vec![InvestmentOption::new(3, Vec::new())],
            ..Portfolio::default()
        };
        assert!(portfolio.validate().is_ok());
    }

    #[test]
    fn test_rate_indexing_from_yaml() {
        let portfolio: Portfolio = serde_yaml::from_str("rate_indexing: start_year\n").unwrap();
        assert_eq!(portfolio.rate_indexing, RateIndexing::StartYear);

        let portfolio: Portfolio = serde_yaml::from_str("years: 5\n").unwrap();
        assert_eq!(portfolio.rate_indexing, RateIndexing::PreviousYear);
    }
}
