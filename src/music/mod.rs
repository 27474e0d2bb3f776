//! The music clue puzzle: six artists, genres, songs and track lengths

pub mod assignment;
pub mod catalog;
pub mod encoder;
pub mod problem;
pub mod slice;
pub mod validator;

pub use assignment::{Assignment, AssignmentError};
pub use catalog::{Artist, CatalogError, Category, Genre, Length, Song};
pub use encoder::{MusicEncoder, MusicVar};
pub use problem::{MusicProblem, Uniqueness};
pub use slice::{Cell, ClueKind, ExtraClue, Slice};
pub use validator::ClueValidator;
