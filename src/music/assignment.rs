//! Solved assignment of the music puzzle

use super::catalog::{Artist, Category, Genre, Length, Song};
use super::encoder::MusicVar;
use super::slice::{Cell, Slice};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Threshold above which a binary solver value counts as set
const SELECTED: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("no cell selected for artist '{0}'")]
    Unassigned(Artist),
    #[error("{count} cells selected for artist '{artist}'")]
    Ambiguous { artist: Artist, count: usize },
}

/// One row per artist, in artist order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    rows: Vec<Cell>,
}

impl Assignment {
    /// Build from rows, sorting them by artist
    pub fn from_rows(mut rows: Vec<Cell>) -> Self {
        rows.sort();
        Self { rows }
    }

    /// Read the selected cell of every artist from solver values
    pub fn from_values(values: &HashMap<MusicVar, f64>) -> Result<Self, AssignmentError> {
        let mut rows = Vec::with_capacity(Artist::ALL.len());

        for artist in Artist::ALL {
            let selected: Vec<Cell> = Slice::artist(artist)
                .cells()
                .filter(|cell| {
                    values
                        .get(&MusicVar::Cell(*cell))
                        .is_some_and(|v| *v > SELECTED)
                })
                .collect();

            match selected.as_slice() {
                [cell] => rows.push(*cell),
                [] => return Err(AssignmentError::Unassigned(artist)),
                many => {
                    return Err(AssignmentError::Ambiguous {
                        artist,
                        count: many.len(),
                    })
                }
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Cell] {
        &self.rows
    }

    pub fn by_artist(&self, artist: Artist) -> Option<&Cell> {
        self.rows.iter().find(|c| c.artist == artist)
    }

    pub fn by_genre(&self, genre: Genre) -> Option<&Cell> {
        self.rows.iter().find(|c| c.genre == genre)
    }

    pub fn by_song(&self, song: Song) -> Option<&Cell> {
        self.rows.iter().find(|c| c.song == song)
    }

    pub fn by_length(&self, length: Length) -> Option<&Cell> {
        self.rows.iter().find(|c| c.length == length)
    }

    /// Number of rows lying in the slice
    pub fn count_in(&self, slice: &Slice) -> usize {
        self.rows.iter().filter(|c| slice.contains(c)).count()
    }

    /// Whether every value of every axis appears exactly once
    pub fn is_permutation(&self) -> bool {
        fn distinct<T: Category>(values: impl Iterator<Item = T>) -> bool {
            let seen: HashSet<T> = values.collect();
            seen.len() == T::ALL.len()
        }

        self.rows.len() == Artist::ALL.len()
            && distinct(self.rows.iter().map(|c| c.artist))
            && distinct(self.rows.iter().map(|c| c.genre))
            && distinct(self.rows.iter().map(|c| c.song))
            && distinct(self.rows.iter().map(|c| c.length))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.rows {
            writeln!(f, "{}", cell)?;
        }
        Ok(())
    }
}
