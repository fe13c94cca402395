use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::config::LeagueConfig;
use crate::constants::WIN_POINTS;
use crate::error::{LeagueError, Result};
use crate::fixtures::{generate_schedule, Schedule, Venue};
use crate::resolver::{resolve_user_match_with_margin, validate_goal, UserMatch};
use crate::simulator::{simulate_match, MatchResult};
use crate::standings::Standings;

/// Where a season is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonStatus {
    NotStarted,
    InProgress { matchday: usize },
    Finished,
}

/// Everything needed to resume a season.
///
/// `matchday` is 1-based; `total_rounds() + 1` marks a finished season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonState {
    pub goal: f64,
    pub schedule: Schedule,
    pub matchday: usize,
    pub standings: Standings,
}

/// Outcome of one played matchday.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchdayReport {
    pub matchday: usize,
    /// None when the human has a bye
    pub user: Option<UserMatch>,
    pub results: Vec<MatchResult>,
    pub season_finished: bool,
}

impl MatchdayReport {
    /// Result lines, the human's match first.
    pub fn lines(&self) -> Vec<String> {
        self.user
            .iter()
            .map(ToString::to_string)
            .chain(self.results.iter().map(ToString::to_string))
            .collect()
    }

    /// Points the human earned this matchday.
    pub fn user_points(&self) -> u32 {
        self.user.as_ref().map_or(0, |m| m.result.points)
    }
}

impl fmt::Display for MatchdayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user {
            Some(m) => write!(
                f,
                "Matchday {}: vs {} — you earned {} point(s)!",
                self.matchday, m.opponent, m.result.points
            ),
            None => write!(f, "Matchday {}: you had a bye", self.matchday),
        }
    }
}

/// The human's next match, for the matchday banner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixturePreview {
    pub matchday: usize,
    /// Opponent and the human's venue; None on a bye
    pub opponent: Option<(String, Venue)>,
}

impl fmt::Display for FixturePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.opponent {
            Some((name, venue)) => write!(
                f,
                "Matchday {}: {} vs {}",
                self.matchday,
                venue.tag(),
                name
            ),
            None => write!(f, "Matchday {}: bye", self.matchday),
        }
    }
}

impl SeasonState {
    /// Fresh season: new schedule, zeroed table, matchday 1.
    pub fn new(config: &LeagueConfig, goal: f64) -> Result<Self> {
        let goal = validate_goal(goal)?;
        Ok(SeasonState {
            goal,
            schedule: generate_schedule(&config.participants),
            matchday: 1,
            standings: Standings::new(&config.participants),
        })
    }

    pub fn total_rounds(&self) -> usize {
        self.schedule.total_rounds()
    }

    pub fn is_finished(&self) -> bool {
        self.matchday > self.total_rounds()
    }

    pub fn status(&self) -> SeasonStatus {
        if self.is_finished() {
            SeasonStatus::Finished
        } else {
            SeasonStatus::InProgress {
                matchday: self.matchday,
            }
        }
    }

    /// Matchdays left to play, counting the current one.
    pub fn remaining_rounds(&self) -> usize {
        (self.total_rounds() + 1).saturating_sub(self.matchday)
    }

    pub fn next_fixture(&self, human: &str) -> Option<FixturePreview> {
        let round = self.schedule.round(self.matchday)?;
        Some(FixturePreview {
            matchday: self.matchday,
            opponent: round
                .opponent_of(human)
                .map(|(name, venue)| (name.to_string(), venue)),
        })
    }

    /// Play the current matchday.
    ///
    /// Input is checked before anything changes, so an error leaves the
    /// state as it was.
    pub fn play_matchday<R: Rng>(
        &mut self,
        calories: f64,
        config: &LeagueConfig,
        rng: &mut R,
    ) -> Result<MatchdayReport> {
        if self.is_finished() {
            return Err(LeagueError::SeasonAlreadyFinished {
                total_rounds: self.total_rounds(),
            });
        }

        let result = resolve_user_match_with_margin(calories, self.goal, config.draw_margin)?;
        let matchday = self.matchday;
        let round = self.schedule.round(matchday).ok_or_else(|| {
            LeagueError::CorruptPersistedState(format!("No round for matchday {}", matchday))
        })?;

        let mut user = None;
        let mut results = Vec::with_capacity(round.len());
        for fixture in &round.fixtures {
            match fixture.opponent_of(&config.human) {
                Some((opponent, venue)) => {
                    user = Some(UserMatch {
                        player: config.human.clone(),
                        opponent: opponent.to_string(),
                        venue,
                        result,
                    });
                }
                None => results.push(simulate_match(
                    &fixture.home,
                    &fixture.away,
                    &config.strengths,
                    &config.simulator,
                    rng,
                )),
            }
        }

        if let Some(m) = &user {
            self.credit(&m.player, m.result.points);
            self.credit(&m.opponent, m.result.opponent_points);
        }
        for r in &results {
            self.credit(&r.home, r.home_points);
            self.credit(&r.away, r.away_points);
        }
        self.matchday += 1;

        debug!(
            "Matchday {} played: {} simulated fixtures, user {:?}",
            matchday,
            results.len(),
            user.as_ref().map(|m| m.result.outcome)
        );

        Ok(MatchdayReport {
            matchday,
            user,
            results,
            season_finished: self.is_finished(),
        })
    }

    fn credit(&mut self, name: &str, points: u32) {
        if !self.standings.record(name, points) {
            warn!("No standings row for {}", name);
        }
    }

    /// Structural checks for a snapshot read back from storage.
    pub fn validate(&self) -> Result<()> {
        let corrupt = |msg: String| -> Result<()> { Err(LeagueError::CorruptPersistedState(msg)) };

        if !(self.goal.is_finite() && self.goal > 0.0) {
            return corrupt(format!("Goal {} is not a positive number", self.goal));
        }

        let total = self.total_rounds();
        if self.matchday == 0 || self.matchday > total + 1 {
            return corrupt(format!("Matchday {} outside 1..={}", self.matchday, total + 1));
        }

        let mut names = HashSet::new();
        for row in self.standings.rows() {
            if !names.insert(row.name.as_str()) {
                return corrupt(format!("Duplicate standings row for {}", row.name));
            }
            if row.played as usize > self.matchday - 1 {
                return corrupt(format!(
                    "{} has played {} matches before matchday {}",
                    row.name, row.played, self.matchday
                ));
            }
            if row.points > WIN_POINTS * row.played {
                return corrupt(format!(
                    "{} has {} points from {} matches",
                    row.name, row.points, row.played
                ));
            }
        }

        for (i, round) in self.schedule.iter().enumerate() {
            let mut playing = HashSet::new();
            for fixture in &round.fixtures {
                if fixture.home == fixture.away {
                    return corrupt(format!("{} plays itself in round {}", fixture.home, i + 1));
                }
                for name in [fixture.home.as_str(), fixture.away.as_str()] {
                    if !names.contains(name) {
                        return corrupt(format!("Unknown participant {} in round {}", name, i + 1));
                    }
                    if !playing.insert(name) {
                        return corrupt(format!("{} plays twice in round {}", name, i + 1));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: SeasonState = serde_json::from_str(json)
            .map_err(|e| LeagueError::CorruptPersistedState(e.to_string()))?;
        state.validate()?;
        Ok(state)
    }
}
