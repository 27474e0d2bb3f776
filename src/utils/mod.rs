//! Console output and logging helpers

pub mod display;
pub mod logging;

pub use display::{ColorOutput, SolutionFormatter, NO_INVESTMENT_SOLUTION, NO_MUSIC_SOLUTION};
pub use logging::init_logging;
