//! Display and output formatting utilities

use crate::investment::{InvestmentPlan, Portfolio};
use crate::music::Assignment;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Printed when the music puzzle has no feasible assignment
pub const NO_MUSIC_SOLUTION: &str = "No solution found";
/// Printed when the investment model has no optimal plan
pub const NO_INVESTMENT_SOLUTION: &str = "No solution found.";

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// One `artist | genre | song | length` line per artist
    pub fn format_assignment(assignment: &Assignment) -> String {
        assignment.to_string()
    }

    /// Several assignments, each under a numbered heading
    pub fn format_assignments(assignments: &[Assignment]) -> String {
        if assignments.is_empty() {
            return format!("{}\n", NO_MUSIC_SOLUTION);
        }
        if let [single] = assignments {
            return Self::format_assignment(single);
        }

        let mut output = String::new();
        for (i, assignment) in assignments.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&format!("=== Solution {} ===\n", i + 1));
            output.push_str(&Self::format_assignment(assignment));
        }
        output
    }

    /// Aligned table with a header row
    pub fn format_assignment_table(assignment: &Assignment) -> String {
        let header = ["Artist", "Genre", "Song", "Length"];
        let rows: Vec<[String; 4]> = assignment
            .rows()
            .iter()
            .map(|c| {
                [
                    c.artist.to_string(),
                    c.genre.to_string(),
                    c.song.to_string(),
                    c.length.to_string(),
                ]
            })
            .collect();

        let mut widths = header.map(str::len);
        for row in &rows {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(value.len());
            }
        }

        let mut output = String::new();
        output.push_str(&table_row(&header, &widths));
        output.push('\n');
        output.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-|-"),
        );
        output.push('\n');
        for row in &rows {
            let values = row.each_ref().map(String::as_str);
            output.push_str(&table_row(&values, &widths));
            output.push('\n');
        }
        output
    }

    /// `Optimal solution:`, the `x[i,j]` lines and the objective
    pub fn format_plan(plan: &InvestmentPlan) -> String {
        plan.to_string()
    }

    /// Allocation matrix with calendar years as columns and per-option totals
    pub fn format_plan_matrix(plan: &InvestmentPlan, portfolio: &Portfolio) -> String {
        let mut output = String::new();

        output.push_str("Option |");
        for year in 0..plan.year_count() {
            output.push_str(&format!(" {:>10} |", portfolio.year_label(year)));
        }
        output.push_str("      Total\n");

        for option in 0..plan.option_count() {
            output.push_str(&format!("{:>6} |", option + 1));
            for year in 0..plan.year_count() {
                output.push_str(&format!(" {:>10.2} |", plan.allocation(option, year)));
            }
            output.push_str(&format!(" {:>10.2}\n", plan.option_total(option)));
        }

        output.push_str(&format!("Final capital: {:.2}\n", plan.final_capital()));
        let tops: Vec<String> = plan.tops.iter().map(|t| format!("{:.2}", t)).collect();
        output.push_str(&format!("Tops: [{}]\n", tops.join(", ")));
        output
    }

    /// Pretty JSON rendering of any result
    pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).context("Failed to serialize result to JSON")
    }

    /// Write a result as pretty JSON
    pub fn save_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, Self::to_json(value)?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Cells padded to their column width and joined with `|`
fn table_row(values: &[&str], widths: &[usize]) -> String {
    values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:width$}", value, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && std::env::var("TERM").unwrap_or_default() != "dumb"
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
