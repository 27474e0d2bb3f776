//! Variable management for the MILP models

use good_lp::{variable, ProblemVariables, Variable};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Errors raised while declaring or looking up model variables
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("variable {0} declared twice")]
    DuplicateVariable(String),
    #[error("variable {0} was never declared")]
    UnknownVariable(String),
}

/// Domain of a decision variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VariableKind {
    /// 0/1 indicator
    Binary,
    /// Integer in `[min, max]`
    Integer { min: f64, max: f64 },
    /// Continuous with a lower bound and an optional upper bound
    Continuous { min: f64, max: Option<f64> },
}

impl VariableKind {
    /// Non-negative continuous variable
    pub fn non_negative() -> Self {
        VariableKind::Continuous { min: 0.0, max: None }
    }
}

/// Maps typed model keys to `good_lp` variables
pub struct VariableManager<K> {
    problem: ProblemVariables,
    variable_map: HashMap<K, Variable>,
    binary_count: usize,
    integer_count: usize,
    continuous_count: usize,
}

impl<K> VariableManager<K>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create an empty variable manager
    pub fn new() -> Self {
        Self {
            problem: ProblemVariables::new(),
            variable_map: HashMap::new(),
            binary_count: 0,
            integer_count: 0,
            continuous_count: 0,
        }
    }

    /// Declare a new variable under `key`
    pub fn add(&mut self, key: K, kind: VariableKind) -> Result<Variable, ModelError> {
        if self.variable_map.contains_key(&key) {
            return Err(ModelError::DuplicateVariable(format!("{:?}", key)));
        }

        let name = format!("{:?}", key);
        let definition = match kind {
            VariableKind::Binary => {
                self.binary_count += 1;
                variable().binary()
            }
            VariableKind::Integer { min, max } => {
                self.integer_count += 1;
                variable().integer().min(min).max(max)
            }
            VariableKind::Continuous { min, max } => {
                self.continuous_count += 1;
                match max {
                    Some(max) => variable().min(min).max(max),
                    None => variable().min(min),
                }
            }
        };

        let var = self.problem.add(definition.name(name));
        self.variable_map.insert(key, var);
        Ok(var)
    }

    /// Look up a previously declared variable
    pub fn get(&self, key: &K) -> Result<Variable, ModelError> {
        self.variable_map
            .get(key)
            .copied()
            .ok_or_else(|| ModelError::UnknownVariable(format!("{:?}", key)))
    }

    /// Get the total number of variables declared
    pub fn variable_count(&self) -> usize {
        self.variable_map.len()
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        VariableStatistics {
            total_variables: self.variable_count(),
            binary_variables: self.binary_count,
            integer_variables: self.integer_count,
            continuous_variables: self.continuous_count,
        }
    }

    /// Hand the declared variables over to the solver
    pub(crate) fn into_parts(self) -> (ProblemVariables, HashMap<K, Variable>) {
        (self.problem, self.variable_map)
    }
}

impl<K> Default for VariableManager<K>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub binary_variables: usize,
    pub integer_variables: usize,
    pub continuous_variables: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Binary: {}", self.binary_variables)?;
        writeln!(f, "  Integer: {}", self.integer_variables)?;
        writeln!(f, "  Continuous: {}", self.continuous_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    enum Key {
        Cell(usize, usize),
        Aux,
    }

    #[test]
    fn test_variable_creation() {
        let mut vm: VariableManager<Key> = VariableManager::new();

        let a = vm.add(Key::Cell(0, 0), VariableKind::Binary).unwrap();
        let b = vm.add(Key::Cell(1, 1), VariableKind::Binary).unwrap();

        assert_ne!(a, b);
        assert_eq!(vm.get(&Key::Cell(0, 0)).unwrap(), a);
        assert_eq!(vm.variable_count(), 2);
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let mut vm: VariableManager<Key> = VariableManager::new();
        vm.add(Key::Aux, VariableKind::non_negative()).unwrap();

        let err = vm.add(Key::Aux, VariableKind::Binary).unwrap_err();
        assert_eq!(err, ModelError::DuplicateVariable("Aux".to_string()));
    }

    #[test]
    fn test_unknown_variable() {
        let vm: VariableManager<Key> = VariableManager::new();
        assert!(vm.get(&Key::Cell(3, 4)).is_err());
    }

    #[test]
    fn test_statistics() {
        let mut vm: VariableManager<Key> = VariableManager::new();
        vm.add(Key::Cell(0, 0), VariableKind::Binary).unwrap();
        vm.add(Key::Cell(0, 1), VariableKind::Integer { min: -5.0, max: 5.0 }).unwrap();
        vm.add(Key::Aux, VariableKind::non_negative()).unwrap();

        let stats = vm.statistics();
        assert_eq!(stats.total_variables, 3);
        assert_eq!(stats.binary_variables, 1);
        assert_eq!(stats.integer_variables, 1);
        assert_eq!(stats.continuous_variables, 1);
    }
}
