//! Re-checks an assignment against the clues, without the solver

use super::assignment::Assignment;
use super::catalog::{initial, Artist, Category, Genre, Length, Song};
use super::slice::{Cell, ClueKind, ExtraClue};
use crate::validation::ValidationReport;
use itertools::Itertools;

/// Checks the axis permutation, the thirteen clues and any extra clues
#[derive(Debug, Clone, Default)]
pub struct ClueValidator {
    extra_clues: Vec<ExtraClue>,
}

fn seconds(cell: Option<&Cell>) -> Option<u32> {
    cell.map(|c| c.length.seconds())
}

/// `Some(true)` when both durations exist and satisfy `relation`
fn compare(left: Option<&Cell>, right: Option<&Cell>, relation: impl Fn(i64, i64) -> bool) -> bool {
    match (seconds(left), seconds(right)) {
        (Some(l), Some(r)) => relation(i64::from(l), i64::from(r)),
        _ => false,
    }
}

impl ClueValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_clues(extra_clues: Vec<ExtraClue>) -> Self {
        Self { extra_clues }
    }

    /// Validate an assignment
    pub fn validate(&self, assignment: &Assignment) -> ValidationReport {
        let mut report = ValidationReport::new("music");
        let a = assignment;

        report.check("axis_permutation", a.is_permutation(), || {
            format!("{} rows do not use every label exactly once", a.rows().len())
        });

        let tracks = [
            a.by_artist(Artist::HigherDays),
            a.by_length(Length::TwoThirtyFour),
            a.by_song(Song::Ceiling),
            a.by_song(Song::SevenYears),
            a.by_artist(Artist::MarkADay),
            a.by_genre(Genre::Edm),
        ];
        let distinct = tracks.iter().all(Option::is_some) && tracks.iter().all_unique();
        report.check("clue_1", distinct, || {
            "the six described tracks are not pairwise distinct".to_string()
        });

        let dear_daisy = a.by_song(Song::DearDaisy);
        let mark_a_day = a.by_artist(Artist::MarkADay);
        report.check(
            "clue_2",
            split_pair(dear_daisy, mark_a_day, |c| c.length == Length::ThreeThirtySix, |c| {
                c.genre == Genre::Pop
            }),
            || "Dear Daisy and Mark A Day do not split 3:36 and Pop".to_string(),
        );

        let on_the_edge = a.by_song(Song::OnTheEdge);
        report.check(
            "clue_3",
            compare(on_the_edge, a.by_artist(Artist::ToniTravis), |l, r| l >= r),
            || "On The Edge is shorter than Toni Travis's track".to_string(),
        );

        let steps_away = a.by_artist(Artist::StepsAway);
        report.check(
            "clue_4",
            compare(a.by_genre(Genre::Country), steps_away, |l, r| l <= r),
            || "the Country song is longer than Steps Away's".to_string(),
        );

        report.check(
            "clue_5",
            on_the_edge.is_some_and(|c| c.length == Length::FourMinutes),
            || "On The Edge is not 4:00".to_string(),
        );

        let shared: Vec<&Cell> = a
            .rows()
            .iter()
            .filter(|c| initial(c.artist.label()) == initial(c.song.label()))
            .collect();
        report.check("clue_6", shared.is_empty(), || {
            format!("{} shares its initial with its artist", shared[0].song)
        });

        let ceiling = a.by_song(Song::Ceiling);
        let higher_days = a.by_artist(Artist::HigherDays);
        report.check(
            "clue_7",
            split_pair(ceiling, higher_days, |c| c.length == Length::TwoFiftyEight, |c| {
                c.genre == Genre::Folk
            }),
            || "Ceiling and Higher Days do not split 2:58 and Folk".to_string(),
        );

        report.check(
            "clue_8",
            compare(a.by_genre(Genre::HipHop), a.by_artist(Artist::TheFilaments), |l, r| {
                (l - r).abs() == 62
            }),
            || "the Hip Hop song and The Filaments' song are not 1:02 apart".to_string(),
        );

        let country = a.by_genre(Genre::Country);
        report.check(
            "clue_9",
            compare(a.by_genre(Genre::Rock), country, |l, r| l == r + 14),
            || "the Rock song is not 14 seconds longer than the Country song".to_string(),
        );

        let far_eastern = a.by_artist(Artist::FarEastern);
        report.check(
            "clue_10",
            compare(far_eastern, a.by_song(Song::Heaven), |l, r| l == r + 24),
            || "Far Eastern's song is not 24 seconds longer than Heaven".to_string(),
        );

        report.check(
            "clue_11",
            dear_daisy.is_some_and(|c| !matches!(c.genre, Genre::HipHop | Genre::Folk)),
            || "Dear Daisy is Hip Hop or Folk".to_string(),
        );

        let pop = a.by_genre(Genre::Pop);
        report.check(
            "clue_12",
            far_eastern.is_some_and(|c| c.genre != Genre::Pop)
                && compare(far_eastern, pop, |l, r| l >= r)
                && compare(far_eastern, steps_away, |l, r| l <= r),
            || "Far Eastern's song is not between the Pop song and Steps Away's".to_string(),
        );

        report.check(
            "clue_13",
            a.by_song(Song::AllForLove).is_some_and(|c| {
                c.genre != Genre::HipHop
                    && !matches!(
                        c.artist,
                        Artist::TheFilaments | Artist::ToniTravis | Artist::MarkADay
                    )
            }),
            || "All For Love breaks its genre or artist exclusions".to_string(),
        );

        for clue in &self.extra_clues {
            let count = a.count_in(&clue.slice);
            let passed = match clue.kind {
                ClueKind::Pin => count == 1,
                ClueKind::Forbid => count == 0,
            };
            report.check(clue.to_string(), passed, || {
                format!("{} rows lie in {}", count, clue.slice)
            });
        }

        report
    }
}

/// "Of A and B, one has P and the other has Q", each having exactly one of them
fn split_pair(
    first: Option<&Cell>,
    second: Option<&Cell>,
    p: impl Fn(&Cell) -> bool,
    q: impl Fn(&Cell) -> bool,
) -> bool {
    match (first, second) {
        (Some(a), Some(b)) if a != b => {
            let exactly_one = |c: &Cell| p(c) != q(c);
            exactly_one(a) && exactly_one(b) && p(a) != p(b)
        }
        _ => false,
    }
}
