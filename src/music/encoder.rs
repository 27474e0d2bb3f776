//! MILP encoder for the music clue puzzle

use super::assignment::Assignment;
use super::catalog::{initial, Artist, Category, Genre, Length, Song};
use super::slice::{Cell, ClueKind, ExtraClue, Slice};
use crate::milp::{
    weighted_sum, ConstraintSet, MilpSolver, ModelError, Objective, VariableKind, VariableManager,
};
use good_lp::Expression;

/// Keys of the model variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicVar {
    /// Indicator of one tensor cell
    Cell(Cell),
    /// Signed duration difference between the Hip Hop song and The Filaments' song
    DurationGap,
    /// The Hip Hop song is the longer one
    GapPositive,
    /// The Filaments' song is the longer one
    GapNegative,
}

/// Seconds between the Hip Hop song and The Filaments' song
const HIP_HOP_FILAMENTS_GAP: f64 = 62.0;
/// Seconds the Rock song runs longer than the Country song
const ROCK_OVER_COUNTRY: f64 = 14.0;
/// Seconds Far Eastern's song runs longer than "Heaven"
const FAR_EASTERN_OVER_HEAVEN: f64 = 24.0;

/// Builds the constraint model over the Artist × Genre × Song × Length tensor
pub struct MusicEncoder {
    variables: VariableManager<MusicVar>,
    constraints: ConstraintSet,
}

impl MusicEncoder {
    /// Declare the tensor and the auxiliary variables, without constraints
    pub fn new() -> Result<Self, ModelError> {
        let mut variables = VariableManager::new();

        for cell in Cell::all() {
            variables.add(MusicVar::Cell(cell), VariableKind::Binary)?;
        }

        let spread = f64::from(Length::longest().seconds() - Length::shortest().seconds());
        variables.add(
            MusicVar::DurationGap,
            VariableKind::Integer { min: -spread, max: spread },
        )?;
        variables.add(MusicVar::GapPositive, VariableKind::Binary)?;
        variables.add(MusicVar::GapNegative, VariableKind::Binary)?;

        Ok(Self {
            variables,
            constraints: ConstraintSet::new(),
        })
    }

    /// Tensor with the permutation constraints and all thirteen clues
    pub fn standard() -> Result<Self, ModelError> {
        let mut encoder = Self::new()?;
        encoder.encode_axis_constraints()?;
        encoder.encode_clues()?;
        Ok(encoder)
    }

    /// Number of selected cells in the slice
    pub fn slice_indicator(&self, slice: &Slice) -> Result<Expression, ModelError> {
        let terms = slice
            .cells()
            .map(|cell| Ok((1.0, self.variables.get(&MusicVar::Cell(cell))?)))
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(weighted_sum(terms))
    }

    /// Total seconds of the selected cells in the slice
    pub fn slice_duration(&self, slice: &Slice) -> Result<Expression, ModelError> {
        let terms = slice
            .cells()
            .map(|cell| {
                let seconds = f64::from(cell.length.seconds());
                Ok((seconds, self.variables.get(&MusicVar::Cell(cell))?))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(weighted_sum(terms))
    }

    /// Every value of every axis is used by exactly one selected cell
    pub fn encode_axis_constraints(&mut self) -> Result<(), ModelError> {
        for artist in Artist::ALL {
            let sum = self.slice_indicator(&Slice::artist(artist))?;
            self.constraints.exactly_one(format!("artist_{}", artist), sum);
        }
        for genre in Genre::ALL {
            let sum = self.slice_indicator(&Slice::genre(genre))?;
            self.constraints.exactly_one(format!("genre_{}", genre), sum);
        }
        for song in Song::ALL {
            let sum = self.slice_indicator(&Slice::song(song))?;
            self.constraints.exactly_one(format!("song_{}", song), sum);
        }
        for length in Length::ALL {
            let sum = self.slice_indicator(&Slice::length(length))?;
            self.constraints.exactly_one(format!("length_{}", length), sum);
        }
        Ok(())
    }

    /// Encode the thirteen clues of the puzzle
    pub fn encode_clues(&mut self) -> Result<(), ModelError> {
        self.six_distinct_tracks()?;
        self.dear_daisy_and_mark_a_day()?;
        self.on_the_edge_outlasts_toni_travis()?;
        self.country_within_steps_away()?;
        self.on_the_edge_runs_four_minutes()?;
        self.no_shared_initials()?;
        self.ceiling_and_higher_days()?;
        self.hip_hop_filaments_gap()?;
        self.rock_over_country()?;
        self.far_eastern_over_heaven()?;
        self.dear_daisy_genres()?;
        self.far_eastern_between_pop_and_steps_away()?;
        self.all_for_love_exclusions()?;
        Ok(())
    }

    /// Clue 1: the Higher Days song, the 2:34 song, "Ceiling", "Seven Years",
    /// the Mark A Day song and the EDM track are six different tracks.
    fn six_distinct_tracks(&mut self) -> Result<(), ModelError> {
        let others = [
            Slice::song(Song::Ceiling),
            Slice::song(Song::SevenYears),
            Slice::length(Length::TwoThirtyFour),
            Slice::genre(Genre::Edm),
        ];

        for artist in [Artist::HigherDays, Artist::MarkADay] {
            for other in &others {
                let overlap = Slice { artist: Some(artist), ..*other };
                self.forbid_slice(&format!("distinct_{}", overlap), &overlap)?;
            }
        }

        for song in [Song::Ceiling, Song::SevenYears] {
            for overlap in [
                Slice::song(song).with_length(Length::TwoThirtyFour),
                Slice::song(song).with_genre(Genre::Edm),
            ] {
                self.forbid_slice(&format!("distinct_{}", overlap), &overlap)?;
            }
        }

        let short_edm = Slice::genre(Genre::Edm).with_length(Length::TwoThirtyFour);
        self.forbid_slice("distinct_edm_2:34", &short_edm)
    }

    /// Clue 2: of "Dear Daisy" and Mark A Day's song, one is 3:36 and the other is Pop.
    fn dear_daisy_and_mark_a_day(&mut self) -> Result<(), ModelError> {
        let dear_daisy = Slice::song(Song::DearDaisy);
        let mark_a_day = Slice::artist(Artist::MarkADay);

        let first = (
            self.slice_indicator(&dear_daisy.with_length(Length::ThreeThirtySix))?,
            self.slice_indicator(&dear_daisy.with_genre(Genre::Pop))?,
        );
        let second = (
            self.slice_indicator(&mark_a_day.with_length(Length::ThreeThirtySix))?,
            self.slice_indicator(&mark_a_day.with_genre(Genre::Pop))?,
        );
        self.constraints.split_pair("dear_daisy_mark_a_day", first, second);
        Ok(())
    }

    /// Clue 3: "On The Edge" plays for longer than Toni Travis's track.
    fn on_the_edge_outlasts_toni_travis(&mut self) -> Result<(), ModelError> {
        let on_the_edge = self.slice_duration(&Slice::song(Song::OnTheEdge))?;
        let toni_travis = self.slice_duration(&Slice::artist(Artist::ToniTravis))?;
        self.constraints.geq("on_the_edge_outlasts_toni_travis", on_the_edge, toni_travis);
        Ok(())
    }

    /// Clue 4: the Country song is shorter than Steps Away's offering.
    fn country_within_steps_away(&mut self) -> Result<(), ModelError> {
        let country = self.slice_duration(&Slice::genre(Genre::Country))?;
        let steps_away = self.slice_duration(&Slice::artist(Artist::StepsAway))?;
        self.constraints.leq("country_within_steps_away", country, steps_away);
        Ok(())
    }

    /// Clue 5: "On The Edge" is precisely four minutes long.
    fn on_the_edge_runs_four_minutes(&mut self) -> Result<(), ModelError> {
        let slice = Slice::song(Song::OnTheEdge).with_length(Length::FourMinutes);
        self.pin_slice("on_the_edge_four_minutes", &slice)
    }

    /// Clue 6: no song starts with the first letter of its artist's name.
    fn no_shared_initials(&mut self) -> Result<(), ModelError> {
        for artist in Artist::ALL {
            for song in Song::ALL {
                if initial(artist.label()) == initial(song.label()) {
                    let slice = Slice::artist(artist).with_song(song);
                    self.forbid_slice(&format!("initials_{}", slice), &slice)?;
                }
            }
        }
        Ok(())
    }

    /// Clue 7: of "Ceiling" and the Higher Days song, one is Folk and the other is 2:58.
    fn ceiling_and_higher_days(&mut self) -> Result<(), ModelError> {
        let ceiling = Slice::song(Song::Ceiling);
        let higher_days = Slice::artist(Artist::HigherDays);

        let first = (
            self.slice_indicator(&ceiling.with_length(Length::TwoFiftyEight))?,
            self.slice_indicator(&ceiling.with_genre(Genre::Folk))?,
        );
        let second = (
            self.slice_indicator(&higher_days.with_length(Length::TwoFiftyEight))?,
            self.slice_indicator(&higher_days.with_genre(Genre::Folk))?,
        );
        self.constraints.split_pair("ceiling_higher_days", first, second);
        Ok(())
    }

    /// Clue 8: the Hip Hop song and The Filaments' song differ by 1:02.
    fn hip_hop_filaments_gap(&mut self) -> Result<(), ModelError> {
        let hip_hop = self.slice_duration(&Slice::genre(Genre::HipHop))?;
        let filaments = self.slice_duration(&Slice::artist(Artist::TheFilaments))?;

        let gap = self.variables.get(&MusicVar::DurationGap)?;
        let positive = self.variables.get(&MusicVar::GapPositive)?;
        let negative = self.variables.get(&MusicVar::GapNegative)?;

        self.constraints.fixed_magnitude(
            "hip_hop_filaments_gap",
            hip_hop - filaments,
            HIP_HOP_FILAMENTS_GAP,
            gap,
            positive,
            negative,
        );
        Ok(())
    }

    /// Clue 9: the Rock song is 14 seconds longer than the Country song.
    fn rock_over_country(&mut self) -> Result<(), ModelError> {
        let rock = self.slice_duration(&Slice::genre(Genre::Rock))?;
        let country = self.slice_duration(&Slice::genre(Genre::Country))?;
        self.constraints
            .eq("rock_over_country", rock, country + ROCK_OVER_COUNTRY);
        Ok(())
    }

    /// Clue 10: Far Eastern's song is 24 seconds longer than "Heaven".
    fn far_eastern_over_heaven(&mut self) -> Result<(), ModelError> {
        let far_eastern = self.slice_duration(&Slice::artist(Artist::FarEastern))?;
        let heaven = self.slice_duration(&Slice::song(Song::Heaven))?;
        self.constraints
            .eq("far_eastern_over_heaven", far_eastern, heaven + FAR_EASTERN_OVER_HEAVEN);
        Ok(())
    }

    /// Clue 11: "Dear Daisy" is not Hip Hop nor Folk.
    fn dear_daisy_genres(&mut self) -> Result<(), ModelError> {
        for genre in [Genre::HipHop, Genre::Folk] {
            let slice = Slice::song(Song::DearDaisy).with_genre(genre);
            self.forbid_slice(&format!("dear_daisy_not_{}", genre), &slice)?;
        }
        Ok(())
    }

    /// Clue 12: Far Eastern's song is longer than the Pop song but shorter
    /// than Steps Away's.
    fn far_eastern_between_pop_and_steps_away(&mut self) -> Result<(), ModelError> {
        self.forbid_slice(
            "far_eastern_not_pop",
            &Slice::artist(Artist::FarEastern).with_genre(Genre::Pop),
        )?;

        let far_eastern = self.slice_duration(&Slice::artist(Artist::FarEastern))?;
        let pop = self.slice_duration(&Slice::genre(Genre::Pop))?;
        let steps_away = self.slice_duration(&Slice::artist(Artist::StepsAway))?;

        self.constraints
            .geq("far_eastern_outlasts_pop", far_eastern.clone(), pop);
        self.constraints
            .leq("far_eastern_within_steps_away", far_eastern, steps_away);
        Ok(())
    }

    /// Clue 13: "All For Love" is not Hip Hop and was not recorded by The
    /// Filaments, Toni Travis nor Mark A Day.
    fn all_for_love_exclusions(&mut self) -> Result<(), ModelError> {
        let all_for_love = Slice::song(Song::AllForLove);
        self.forbid_slice("all_for_love_not_hip_hop", &all_for_love.with_genre(Genre::HipHop))?;

        for artist in [Artist::TheFilaments, Artist::ToniTravis, Artist::MarkADay] {
            let slice = Slice { artist: Some(artist), ..all_for_love };
            self.forbid_slice(&format!("all_for_love_not_{}", artist), &slice)?;
        }
        Ok(())
    }

    fn forbid_slice(&mut self, name: &str, slice: &Slice) -> Result<(), ModelError> {
        let indicator = self.slice_indicator(slice)?;
        self.constraints.forbid(name, indicator);
        Ok(())
    }

    fn pin_slice(&mut self, name: &str, slice: &Slice) -> Result<(), ModelError> {
        let indicator = self.slice_indicator(slice)?;
        self.constraints.exactly_one(name, indicator);
        Ok(())
    }

    /// Extra clue: no selected cell lies in the slice
    pub fn forbid(&mut self, slice: &Slice) -> Result<(), ModelError> {
        self.apply(&ExtraClue::forbid(*slice))
    }

    /// Extra clue: exactly one selected cell lies in the slice
    pub fn pin(&mut self, slice: &Slice) -> Result<(), ModelError> {
        self.apply(&ExtraClue::pin(*slice))
    }

    /// Add an injected clue
    pub fn apply(&mut self, clue: &ExtraClue) -> Result<(), ModelError> {
        let name = format!("extra_{}", clue);
        match clue.kind {
            ClueKind::Pin => self.pin_slice(&name, &clue.slice),
            ClueKind::Forbid => self.forbid_slice(&name, &clue.slice),
        }
    }

    /// Cut off a previously found assignment: at most five of its six cells may recur
    pub fn block(&mut self, assignment: &Assignment) -> Result<(), ModelError> {
        let terms = assignment
            .rows()
            .iter()
            .map(|cell| Ok((1.0, self.variables.get(&MusicVar::Cell(*cell))?)))
            .collect::<Result<Vec<_>, ModelError>>()?;
        let limit = assignment.rows().len() as f64 - 1.0;

        self.constraints.leq(
            format!("block_{}", self.constraints.len()),
            weighted_sum(terms),
            limit,
        );
        Ok(())
    }

    pub fn variable_count(&self) -> usize {
        self.variables.variable_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraint names in insertion order
    pub fn constraint_names(&self) -> Vec<String> {
        self.constraints.names().map(str::to_string).collect()
    }

    /// Hand the model to the solver with a constant objective
    pub fn into_solver(self) -> MilpSolver<MusicVar> {
        MilpSolver::new("music", self.variables, self.constraints, Objective::feasibility())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_layout() {
        let encoder = MusicEncoder::new().unwrap();
        // 6^4 cells plus the gap and its two sign indicators
        assert_eq!(encoder.variable_count(), 1296 + 3);
        assert_eq!(encoder.constraint_count(), 0);
    }

    #[test]
    fn test_axis_constraints() {
        let mut encoder = MusicEncoder::new().unwrap();
        encoder.encode_axis_constraints().unwrap();
        assert_eq!(encoder.constraint_count(), 24);

        let names = encoder.constraint_names();
        assert!(names.contains(&"artist_Toni Travis".to_string()));
        assert!(names.contains(&"length_4:00".to_string()));
    }

    #[test]
    fn test_clue_constraints() {
        let encoder = MusicEncoder::standard().unwrap();
        let names = encoder.constraint_names();

        // clue 6 only rules out Higher Days/Heaven and Steps Away/Seven Years
        let initials: Vec<_> = names.iter().filter(|n| n.starts_with("initials_")).collect();
        assert_eq!(initials.len(), 2);

        assert!(names.contains(&"hip_hop_filaments_gap_sign".to_string()));
        assert!(names.contains(&"dear_daisy_mark_a_day_exclusive".to_string()));
        assert!(names.contains(&"ceiling_higher_days_exclusive".to_string()));
        assert!(names.contains(&"on_the_edge_four_minutes".to_string()));
    }

    #[test]
    fn test_block_adds_one_cut() {
        let mut encoder = MusicEncoder::standard().unwrap();
        let before = encoder.constraint_count();

        encoder.block(&crate::music::assignment::tests::golden()).unwrap();
        assert_eq!(encoder.constraint_count(), before + 1);
        assert!(encoder.constraint_names().last().unwrap().starts_with("block_"));
    }

    #[test]
    fn test_extra_clue_names() {
        let mut encoder = MusicEncoder::new().unwrap();
        encoder
            .pin(&Slice::song(Song::OnTheEdge).with_length(Length::TwoThirtyFour))
            .unwrap();
        encoder
            .apply(&ExtraClue::forbid(Slice::artist(Artist::ToniTravis).with_genre(Genre::Rock)))
            .unwrap();

        assert_eq!(
            encoder.constraint_names(),
            vec![
                "extra_pin[song=On The Edge,length=2:34]".to_string(),
                "extra_forbid[artist=Toni Travis,genre=Rock]".to_string(),
            ]
        );
    }
}
