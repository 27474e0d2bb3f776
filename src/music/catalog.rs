//! The four labelled axes of the music puzzle

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing labels and slices
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown {axis} '{label}'")]
    UnknownLabel { axis: &'static str, label: String },
    #[error("malformed slice '{0}': expected key=value pairs separated by commas")]
    MalformedSlice(String),
    #[error("unknown slice key '{0}' (expected artist, genre, song or length)")]
    UnknownSliceKey(String),
    #[error("slice '{0}' does not fix any axis")]
    EmptySlice(String),
}

/// One axis of the assignment tensor: a fixed set of six labelled values
pub trait Category: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Axis name used in messages
    const AXIS: &'static str;
    /// Every value, in display order
    const ALL: [Self; 6];

    fn label(self) -> &'static str;

    /// Case-insensitive label lookup
    fn parse_label(label: &str) -> Result<Self, CatalogError> {
        let wanted = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|value| value.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownLabel {
                axis: Self::AXIS,
                label: wanted.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Artist {
    #[serde(rename = "Far Eastern")]
    FarEastern,
    #[serde(rename = "Higher Days")]
    HigherDays,
    #[serde(rename = "Mark A Day")]
    MarkADay,
    #[serde(rename = "Steps Away")]
    StepsAway,
    #[serde(rename = "The Filaments")]
    TheFilaments,
    #[serde(rename = "Toni Travis")]
    ToniTravis,
}

impl Category for Artist {
    const AXIS: &'static str = "artist";
    const ALL: [Self; 6] = [
        Artist::FarEastern,
        Artist::HigherDays,
        Artist::MarkADay,
        Artist::StepsAway,
        Artist::TheFilaments,
        Artist::ToniTravis,
    ];

    fn label(self) -> &'static str {
        match self {
            Artist::FarEastern => "Far Eastern",
            Artist::HigherDays => "Higher Days",
            Artist::MarkADay => "Mark A Day",
            Artist::StepsAway => "Steps Away",
            Artist::TheFilaments => "The Filaments",
            Artist::ToniTravis => "Toni Travis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Genre {
    Country,
    #[serde(rename = "EDM")]
    Edm,
    Folk,
    #[serde(rename = "Hip Hop")]
    HipHop,
    Pop,
    Rock,
}

impl Category for Genre {
    const AXIS: &'static str = "genre";
    const ALL: [Self; 6] = [
        Genre::Country,
        Genre::Edm,
        Genre::Folk,
        Genre::HipHop,
        Genre::Pop,
        Genre::Rock,
    ];

    fn label(self) -> &'static str {
        match self {
            Genre::Country => "Country",
            Genre::Edm => "EDM",
            Genre::Folk => "Folk",
            Genre::HipHop => "Hip Hop",
            Genre::Pop => "Pop",
            Genre::Rock => "Rock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Song {
    #[serde(rename = "All For Love")]
    AllForLove,
    Ceiling,
    #[serde(rename = "Dear Daisy")]
    DearDaisy,
    Heaven,
    #[serde(rename = "On The Edge")]
    OnTheEdge,
    #[serde(rename = "Seven Years")]
    SevenYears,
}

impl Category for Song {
    const AXIS: &'static str = "song";
    const ALL: [Self; 6] = [
        Song::AllForLove,
        Song::Ceiling,
        Song::DearDaisy,
        Song::Heaven,
        Song::OnTheEdge,
        Song::SevenYears,
    ];

    fn label(self) -> &'static str {
        match self {
            Song::AllForLove => "All For Love",
            Song::Ceiling => "Ceiling",
            Song::DearDaisy => "Dear Daisy",
            Song::Heaven => "Heaven",
            Song::OnTheEdge => "On The Edge",
            Song::SevenYears => "Seven Years",
        }
    }
}

/// Track length, labelled `m:ss`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Length {
    #[serde(rename = "2:34")]
    TwoThirtyFour,
    #[serde(rename = "2:58")]
    TwoFiftyEight,
    #[serde(rename = "3:12")]
    ThreeTwelve,
    #[serde(rename = "3:36")]
    ThreeThirtySix,
    #[serde(rename = "4:00")]
    FourMinutes,
    #[serde(rename = "4:14")]
    FourFourteen,
}

impl Length {
    /// Minutes and seconds of the track
    pub fn minutes_seconds(self) -> (u32, u32) {
        match self {
            Length::TwoThirtyFour => (2, 34),
            Length::TwoFiftyEight => (2, 58),
            Length::ThreeTwelve => (3, 12),
            Length::ThreeThirtySix => (3, 36),
            Length::FourMinutes => (4, 0),
            Length::FourFourteen => (4, 14),
        }
    }

    /// Duration in seconds
    pub fn seconds(self) -> u32 {
        let (minutes, seconds) = self.minutes_seconds();
        minutes * 60 + seconds
    }

    pub fn shortest() -> Self {
        Length::TwoThirtyFour
    }

    pub fn longest() -> Self {
        Length::FourFourteen
    }
}

impl Category for Length {
    const AXIS: &'static str = "length";
    const ALL: [Self; 6] = [
        Length::TwoThirtyFour,
        Length::TwoFiftyEight,
        Length::ThreeTwelve,
        Length::ThreeThirtySix,
        Length::FourMinutes,
        Length::FourFourteen,
    ];

    fn label(self) -> &'static str {
        match self {
            Length::TwoThirtyFour => "2:34",
            Length::TwoFiftyEight => "2:58",
            Length::ThreeTwelve => "3:12",
            Length::ThreeThirtySix => "3:36",
            Length::FourMinutes => "4:00",
            Length::FourFourteen => "4:14",
        }
    }
}

/// Lower-cased first letter of a label
pub fn initial(label: &str) -> Option<char> {
    label.chars().next().map(|c| c.to_ascii_lowercase())
}

macro_rules! impl_label_traits {
    ($($axis:ty),*) => {
        $(
            impl fmt::Display for $axis {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $axis {
                type Err = CatalogError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::parse_label(s)
                }
            }
        )*
    };
}

impl_label_traits!(Artist, Genre, Song, Length);
