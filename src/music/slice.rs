//! Cells and slices of the assignment tensor

use super::catalog::{Artist, CatalogError, Category, Genre, Length, Song};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One cell of the tensor: a full (artist, genre, song, length) combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub artist: Artist,
    pub genre: Genre,
    pub song: Song,
    pub length: Length,
}

impl Cell {
    pub fn new(artist: Artist, genre: Genre, song: Song, length: Length) -> Self {
        Self { artist, genre, song, length }
    }

    /// Every cell of the tensor
    pub fn all() -> impl Iterator<Item = Cell> {
        Slice::default().cells()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {} | {}", self.artist, self.genre, self.song, self.length)
    }
}

/// Cells with some axes fixed and the others free
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<Artist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song: Option<Song>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Length>,
}

impl Slice {
    pub fn artist(artist: Artist) -> Self {
        Self { artist: Some(artist), ..Self::default() }
    }

    pub fn genre(genre: Genre) -> Self {
        Self { genre: Some(genre), ..Self::default() }
    }

    pub fn song(song: Song) -> Self {
        Self { song: Some(song), ..Self::default() }
    }

    pub fn length(length: Length) -> Self {
        Self { length: Some(length), ..Self::default() }
    }

    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn with_song(mut self, song: Song) -> Self {
        self.song = Some(song);
        self
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    /// Whether no axis is fixed
    pub fn is_unconstrained(&self) -> bool {
        self.artist.is_none()
            && self.genre.is_none()
            && self.song.is_none()
            && self.length.is_none()
    }

    /// Whether `cell` lies in this slice
    pub fn contains(&self, cell: &Cell) -> bool {
        self.artist.map_or(true, |a| a == cell.artist)
            && self.genre.map_or(true, |g| g == cell.genre)
            && self.song.map_or(true, |s| s == cell.song)
            && self.length.map_or(true, |l| l == cell.length)
    }

    /// Cells of the slice, artist-major
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        iproduct!(
            axis_values(self.artist),
            axis_values(self.genre),
            axis_values(self.song),
            axis_values(self.length)
        )
        .map(|(artist, genre, song, length)| Cell::new(artist, genre, song, length))
    }
}

fn axis_values<T: Category>(fixed: Option<T>) -> Vec<T> {
    match fixed {
        Some(value) => vec![value],
        None => T::ALL.to_vec(),
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(artist) = self.artist {
            parts.push(format!("artist={}", artist));
        }
        if let Some(genre) = self.genre {
            parts.push(format!("genre={}", genre));
        }
        if let Some(song) = self.song {
            parts.push(format!("song={}", song));
        }
        if let Some(length) = self.length {
            parts.push(format!("length={}", length));
        }
        if parts.is_empty() {
            f.write_str("*")
        } else {
            f.write_str(&parts.join(","))
        }
    }
}

/// Parses `artist=Far Eastern,song=Heaven`
impl FromStr for Slice {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut slice = Slice::default();

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| CatalogError::MalformedSlice(s.to_string()))?;

            match key.trim().to_ascii_lowercase().as_str() {
                "artist" => slice.artist = Some(value.parse()?),
                "genre" => slice.genre = Some(value.parse()?),
                "song" => slice.song = Some(value.parse()?),
                "length" => slice.length = Some(value.parse()?),
                other => return Err(CatalogError::UnknownSliceKey(other.to_string())),
            }
        }

        if slice.is_unconstrained() {
            return Err(CatalogError::EmptySlice(s.to_string()));
        }
        Ok(slice)
    }
}

/// Whether an injected clue requires or rules out its slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClueKind {
    /// Exactly one selected cell lies in the slice
    Pin,
    /// No selected cell lies in the slice
    Forbid,
}

/// A clue added on top of the fixed clue set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraClue {
    pub kind: ClueKind,
    pub slice: Slice,
}

impl ExtraClue {
    pub fn pin(slice: Slice) -> Self {
        Self { kind: ClueKind::Pin, slice }
    }

    pub fn forbid(slice: Slice) -> Self {
        Self { kind: ClueKind::Forbid, slice }
    }
}

impl fmt::Display for ExtraClue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ClueKind::Pin => write!(f, "pin[{}]", self.slice),
            ClueKind::Forbid => write!(f, "forbid[{}]", self.slice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count() {
        assert_eq!(Cell::all().count(), 1296);
        assert_eq!(Slice::artist(Artist::ToniTravis).cells().count(), 216);
        assert_eq!(
            Slice::song(Song::Heaven).with_length(Length::ThreeTwelve).cells().count(),
            36
        );
    }

    #[test]
    fn test_slice_contains() {
        let slice = Slice::artist(Artist::MarkADay).with_genre(Genre::Pop);
        let inside = Cell::new(Artist::MarkADay, Genre::Pop, Song::Heaven, Length::FourMinutes);
        let outside = Cell::new(Artist::MarkADay, Genre::Rock, Song::Heaven, Length::FourMinutes);

        assert!(slice.contains(&inside));
        assert!(!slice.contains(&outside));
        assert!(slice.cells().all(|c| slice.contains(&c)));
    }

    #[test]
    fn test_slice_parsing() {
        let slice: Slice = "song=On The Edge, length=2:34".parse().unwrap();
        assert_eq!(slice, Slice::song(Song::OnTheEdge).with_length(Length::TwoThirtyFour));
        assert_eq!(slice.to_string(), "song=On The Edge,length=2:34");
        assert_eq!(slice.to_string().parse::<Slice>().unwrap(), slice);
    }

    #[test]
    fn test_slice_parsing_errors() {
        assert!(matches!("".parse::<Slice>(), Err(CatalogError::EmptySlice(_))));
        assert!(matches!("artist".parse::<Slice>(), Err(CatalogError::MalformedSlice(_))));
        assert!(matches!("mood=happy".parse::<Slice>(), Err(CatalogError::UnknownSliceKey(_))));
        assert!(matches!(
            "genre=Jazz".parse::<Slice>(),
            Err(CatalogError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn test_extra_clue_yaml() {
        let yaml = "kind: forbid\nslice:\n  artist: Toni Travis\n  song: Seven Years\n";
        let clue: ExtraClue = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            clue,
            ExtraClue::forbid(Slice::artist(Artist::ToniTravis).with_song(Song::SevenYears))
        );
    }
}
