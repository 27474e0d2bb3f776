//! Report type shared by the solution validators

use serde::Serialize;
use std::fmt;

/// A failed check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub check: String,
    pub description: String,
}

/// Outcome of re-checking a solution against its rules
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub subject: String,
    pub checks_run: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Record one check, keeping `description` only when it fails
    pub fn check(
        &mut self,
        check: impl Into<String>,
        passed: bool,
        description: impl FnOnce() -> String,
    ) {
        self.checks_run += 1;
        if !passed {
            self.violations.push(Violation {
                check: check.into(),
                description: description(),
            });
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether the named check failed
    pub fn failed(&self, check: &str) -> bool {
        self.violations.iter().any(|v| v.check == check)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Validation Result ({}): {}",
            self.subject,
            if self.is_valid() { "VALID" } else { "INVALID" }
        )?;
        writeln!(f, "  Checks run: {}", self.checks_run)?;
        writeln!(f, "  Violations: {}", self.violations.len())?;

        // Only the first few, the rest are usually consequences
        for violation in self.violations.iter().take(5) {
            writeln!(f, "    - {}: {}", violation.check, violation.description)?;
        }
        if self.violations.len() > 5 {
            writeln!(f, "    ... and {} more", self.violations.len() - 5)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tracks_failures() {
        let mut report = ValidationReport::new("demo");
        report.check("one", true, || unreachable!());
        report.check("two", false, || "broken".to_string());

        assert_eq!(report.checks_run, 2);
        assert!(!report.is_valid());
        assert!(report.failed("two"));
        assert!(!report.failed("one"));

        let text = report.to_string();
        assert!(text.starts_with("Validation Result (demo): INVALID"));
        assert!(text.contains("two: broken"));
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new("empty");
        assert!(report.is_valid());
        assert!(report.to_string().contains("VALID"));
    }
}
