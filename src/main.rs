//! Main CLI application for the MILP puzzle models

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use milp_puzzles::{
    config::{CliOverrides, OutputFormat, Settings},
    investment::{InvestmentPlan, InvestmentProblem},
    music::{Assignment, ExtraClue, Length, MusicProblem, Slice, Song, Uniqueness},
    utils::{init_logging, ColorOutput, SolutionFormatter, NO_INVESTMENT_SOLUTION},
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "milp_puzzles")]
#[command(about = "MILP models of a music clue puzzle and an investment plan")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the music clue puzzle
    Music {
        #[command(flatten)]
        common: CommonArgs,

        /// Collect up to N distinct assignments
        #[arg(long, value_name = "N")]
        all: Option<usize>,

        /// Check that the clues admit exactly one assignment
        #[arg(long)]
        check_unique: bool,

        /// Require one selected cell in SLICE, e.g. "song=Heaven,genre=Pop"
        #[arg(long, value_name = "SLICE")]
        pin: Vec<Slice>,

        /// Rule out every cell in SLICE
        #[arg(long, value_name = "SLICE")]
        forbid: Vec<Slice>,
    },

    /// Solve the investment allocation model
    Invest {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Create the default configuration file
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
struct CommonArgs {
    /// Configuration file path (defaults to config/default.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solver log file (overrides config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not echo solver progress to the console
    #[arg(long)]
    quiet_solver: bool,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Also write the JSON result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print model and solver statistics
    #[arg(short, long)]
    verbose: bool,
}

impl CommonArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log_file: self.log_file.clone(),
            quiet_solver: self.quiet_solver,
            format: self.format,
            output_file: self.output.clone(),
            ..CliOverrides::default()
        }
    }
}

#[derive(Serialize)]
struct MusicReport {
    solutions: Vec<Assignment>,
    /// Set when uniqueness was checked
    unique: Option<bool>,
}

#[derive(Serialize)]
struct InvestmentReport {
    plan: Option<InvestmentPlan>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Music {
            common,
            all,
            check_unique,
            pin,
            forbid,
        } => {
            let extra_clues = pin
                .into_iter()
                .map(ExtraClue::pin)
                .chain(forbid.into_iter().map(ExtraClue::forbid))
                .collect();
            let overrides = CliOverrides {
                max_solutions: all,
                check_uniqueness: check_unique,
                extra_clues,
                ..common.overrides()
            };
            music_command(&common, &overrides)
        }
        Commands::Invest { common } => invest_command(&common, &common.overrides()),
        Commands::Setup { directory, force } => setup_command(&directory, force),
    }
}

/// Load, override, validate, then start logging
fn prepare_settings(common: &CommonArgs, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings =
        Settings::load(common.config.as_deref()).context("Failed to load configuration")?;
    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;

    init_logging(&settings.solver)?;
    Ok(settings)
}

fn music_command(common: &CommonArgs, overrides: &CliOverrides) -> Result<()> {
    let settings = prepare_settings(common, overrides)?;
    let mut problem = MusicProblem::new(&settings.music);

    if common.verbose {
        eprintln!("{}", ColorOutput::info("Solving the music clue puzzle..."));
        for clue in problem.extra_clues() {
            eprintln!("  Extra clue: {}", clue);
        }
    }

    let start_time = Instant::now();
    let (solutions, unique) = if settings.music.check_uniqueness {
        match problem.check_uniqueness()? {
            Uniqueness::NoSolution => (Vec::new(), None),
            Uniqueness::Unique(assignment) => (vec![assignment], Some(true)),
            Uniqueness::Multiple(found) => (found, Some(false)),
        }
    } else {
        (problem.solve_all(settings.music.max_solutions)?, None)
    };
    let total_time = start_time.elapsed();

    match unique {
        Some(true) => eprintln!(
            "{}",
            ColorOutput::success("The clues admit exactly one assignment")
        ),
        Some(false) => eprintln!(
            "{}",
            ColorOutput::warning("The clues admit more than one assignment")
        ),
        None => {}
    }

    let report = MusicReport { solutions, unique };
    match settings.output.format {
        OutputFormat::Text => {
            print!("{}", SolutionFormatter::format_assignments(&report.solutions))
        }
        OutputFormat::Json => println!("{}", SolutionFormatter::to_json(&report)?),
    }

    if common.verbose {
        if let Some(assignment) = report.solutions.first() {
            eprintln!("\n{}", SolutionFormatter::format_assignment_table(assignment));
        }
        if let Some(statistics) = problem.last_statistics() {
            eprintln!("{}", statistics);
        }
        eprintln!("Total time: {:.3}s", total_time.as_secs_f64());
    }

    save_report(&settings, &report)
}

fn invest_command(common: &CommonArgs, overrides: &CliOverrides) -> Result<()> {
    let settings = prepare_settings(common, overrides)?;
    let mut problem =
        InvestmentProblem::new(settings.investment.clone(), settings.solver.tolerance);

    if common.verbose {
        eprintln!("{}", ColorOutput::info("Solving the investment allocation model..."));
    }

    let plan = problem.solve()?;

    match settings.output.format {
        OutputFormat::Text => match &plan {
            Some(plan) => print!("{}", SolutionFormatter::format_plan(plan)),
            None => println!("{}", NO_INVESTMENT_SOLUTION),
        },
        OutputFormat::Json => {
            println!("{}", SolutionFormatter::to_json(&InvestmentReport { plan: plan.clone() })?)
        }
    }

    if common.verbose {
        if let Some(plan) = &plan {
            eprintln!("\n{}", SolutionFormatter::format_plan_matrix(plan, problem.portfolio()));
        }
        if let Some(statistics) = problem.last_statistics() {
            eprintln!("{}", statistics);
        }
    }

    save_report(&settings, &InvestmentReport { plan })
}

fn save_report<T: Serialize>(settings: &Settings, report: &T) -> Result<()> {
    if let Some(path) = &settings.output.output_file {
        SolutionFormatter::save_json(report, path)?;
        eprintln!("{}", ColorOutput::success(&format!("Result saved to {}", path.display())));
    }
    Ok(())
}

fn setup_command(directory: &Path, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up configuration..."));

    let config_dir = directory.join("config");
    let examples_dir = config_dir.join("variants");
    for dir in [&config_dir, &examples_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    write_settings(&config_path, &Settings::default(), force)?;

    // A clue contradicting "On The Edge" lasting 4:00
    let mut contradiction = Settings::default();
    contradiction.music.extra_clues.push(ExtraClue::pin(
        Slice::song(Song::OnTheEdge).with_length(Length::TwoThirtyFour),
    ));
    write_settings(&examples_dir.join("contradiction.yaml"), &contradiction, force)?;

    let mut uniqueness = Settings::default();
    uniqueness.music.check_uniqueness = true;
    uniqueness.output.format = OutputFormat::Json;
    write_settings(&examples_dir.join("uniqueness.yaml"), &uniqueness, force)?;

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit {}", config_path.display());
    println!("2. Run: cargo run -- music --config {}", config_path.display());
    println!("3. Run: cargo run -- invest --config {}", config_path.display());

    Ok(())
}

fn write_settings(path: &Path, settings: &Settings, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Skipped: {} (already exists)", path.display());
        return Ok(());
    }
    settings
        .to_file(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    println!("Created: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use milp_puzzles::music::{Artist, Genre};
    use tempfile::tempdir;

    #[test]
    fn test_music_cli_parsing() {
        let cli = Cli::try_parse_from([
            "milp_puzzles",
            "music",
            "--all",
            "3",
            "--pin",
            "song=Heaven,genre=Hip Hop",
            "--forbid",
            "artist=Toni Travis,genre=Pop",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Music { common, all, pin, forbid, check_unique } => {
                assert_eq!(all, Some(3));
                assert!(!check_unique);
                assert_eq!(pin, vec![Slice::song(Song::Heaven).with_genre(Genre::HipHop)]);
                assert_eq!(forbid, vec![Slice::artist(Artist::ToniTravis).with_genre(Genre::Pop)]);
                assert_eq!(common.format, Some(OutputFormat::Json));
            }
            _ => panic!("expected the music command"),
        }
    }

    #[test]
    fn test_invalid_slice_is_rejected() {
        let cli = Cli::try_parse_from(["milp_puzzles", "music", "--pin", "mood=happy"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_invest_cli_parsing() {
        let cli = Cli::try_parse_from([
            "milp_puzzles",
            "invest",
            "--config",
            "test.yaml",
            "--log-file",
            "run.log",
            "--quiet-solver",
        ])
        .unwrap();

        match cli.command {
            Commands::Invest { common } => {
                let overrides = common.overrides();
                assert_eq!(common.config, Some(PathBuf::from("test.yaml")));
                assert_eq!(overrides.log_file, Some(PathBuf::from("run.log")));
                assert!(overrides.quiet_solver);
                assert!(overrides.format.is_none());
            }
            _ => panic!("expected the invest command"),
        }
    }

    #[test]
    fn test_setup_command() {
        let temp_dir = tempdir().unwrap();
        setup_command(temp_dir.path(), false).unwrap();

        let config_path = temp_dir.path().join("config/default.yaml");
        assert_eq!(Settings::from_file(&config_path).unwrap(), Settings::default());

        let contradiction_path = temp_dir.path().join("config/variants/contradiction.yaml");
        let contradiction = Settings::from_file(&contradiction_path).unwrap();
        assert_eq!(contradiction.music.extra_clues.len(), 1);
    }

    #[test]
    fn test_setup_keeps_existing_files() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config/default.yaml");
        std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        std::fs::write(&config_path, "music:\n  max_solutions: 4\n").unwrap();

        setup_command(temp_dir.path(), false).unwrap();
        assert_eq!(Settings::from_file(&config_path).unwrap().music.max_solutions, 4);

        setup_command(temp_dir.path(), true).unwrap();
        assert_eq!(Settings::from_file(&config_path).unwrap().music.max_solutions, 1);
    }
}
