//! The investment allocation model

pub mod encoder;
pub mod plan;
pub mod portfolio;
pub mod problem;
pub mod validator;

pub use encoder::{InvestmentEncoder, InvestmentVar};
pub use plan::InvestmentPlan;
pub use portfolio::{InvestmentOption, Portfolio, PortfolioError, RateIndexing};
pub use problem::InvestmentProblem;
pub use validator::PlanValidator;
