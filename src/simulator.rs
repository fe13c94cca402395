use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;
use std::fmt;

use crate::constants::{
    DRAW_BAND, DRAW_POINTS, HOME_ADVANTAGE, LOSS_POINTS, MAX_STRENGTH, RATING_STDDEV, WIN_POINTS,
};
use crate::error::{LeagueError, Result};
use crate::strength::StrengthTable;

/// How the home-win band is derived from the ratings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorMode {
    /// Home band is the home rating plus the home advantage. The away
    /// rating plays no part.
    #[default]
    Parity,
    /// Home band scales with the rating difference through a normal CDF.
    RatingAware,
}

/// Tunables for simulated fixtures.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub mode: SimulatorMode,
    pub home_advantage: u8,
    pub draw_band: u8,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            mode: SimulatorMode::Parity,
            home_advantage: HOME_ADVANTAGE,
            draw_band: DRAW_BAND,
        }
    }
}

impl SimulatorConfig {
    /// Both bands live on the 0-100 scale, and the draw band must leave
    /// room for decisive results.
    pub fn validate(&self) -> Result<()> {
        if self.home_advantage > MAX_STRENGTH {
            return Err(LeagueError::InvalidConfig(format!(
                "Home advantage {} is above {}",
                self.home_advantage, MAX_STRENGTH
            )));
        }
        if self.draw_band >= MAX_STRENGTH {
            return Err(LeagueError::InvalidConfig(format!(
                "Draw band must be below {}, got {}",
                MAX_STRENGTH, self.draw_band
            )));
        }
        Ok(())
    }
}

/// Result of a fixture from the home side's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    /// (home points, away points)
    pub fn points(self) -> (u32, u32) {
        match self {
            Outcome::HomeWin => (WIN_POINTS, LOSS_POINTS),
            Outcome::Draw => (DRAW_POINTS, DRAW_POINTS),
            Outcome::AwayWin => (LOSS_POINTS, WIN_POINTS),
        }
    }

    /// Cosmetic scoreline shown for a simulated match
    pub fn score(self) -> &'static str {
        match self {
            Outcome::HomeWin => "1–0",
            Outcome::Draw => "1–1",
            Outcome::AwayWin => "0–1",
        }
    }
}

/// A resolved fixture between two simulated participants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home: String,
    pub away: String,
    pub outcome: Outcome,
    pub home_points: u32,
    pub away_points: u32,
}

impl MatchResult {
    pub fn new(home: &str, away: &str, outcome: Outcome) -> Self {
        let (home_points, away_points) = outcome.points();
        MatchResult {
            home: home.to_string(),
            away: away.to_string(),
            outcome,
            home_points,
            away_points,
        }
    }

    pub fn score(&self) -> &'static str {
        self.outcome.score()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.home, self.score(), self.away)
    }
}

fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Upper bound of the home-win band on the 0-100 scale.
///
/// In parity mode this is `home + home_advantage` and `away` is ignored.
pub fn home_band(home: u8, away: u8, config: &SimulatorConfig) -> f64 {
    match config.mode {
        SimulatorMode::Parity => f64::from(home) + f64::from(config.home_advantage),
        SimulatorMode::RatingAware => {
            let diff = f64::from(home) + f64::from(config.home_advantage) - f64::from(away);
            let decisive = 100.0 - f64::from(config.draw_band);
            decisive * standard_normal_cdf(diff / RATING_STDDEV)
        }
    }
}

/// Probabilities of (home win, draw, away win).
pub fn outcome_probabilities(home: u8, away: u8, config: &SimulatorConfig) -> (f64, f64, f64) {
    let home_cut = home_band(home, away, config).clamp(0.0, 100.0);
    let draw_cut = (home_cut + f64::from(config.draw_band)).clamp(0.0, 100.0);
    (
        home_cut / 100.0,
        (draw_cut - home_cut) / 100.0,
        (100.0 - draw_cut) / 100.0,
    )
}

/// Map a draw in [0, 100) onto an outcome.
pub fn outcome_for_draw(roll: f64, home: u8, away: u8, config: &SimulatorConfig) -> Outcome {
    let home_cut = home_band(home, away, config);
    if roll < home_cut {
        Outcome::HomeWin
    } else if roll < home_cut + f64::from(config.draw_band) {
        Outcome::Draw
    } else {
        Outcome::AwayWin
    }
}

/// Simulate a fixture between two computer-controlled participants.
pub fn simulate_match<R: Rng>(
    home: &str,
    away: &str,
    strengths: &StrengthTable,
    config: &SimulatorConfig,
    rng: &mut R,
) -> MatchResult {
    let roll = rng.gen_range(0.0..100.0);
    let outcome = outcome_for_draw(roll, strengths.get(home), strengths.get(away), config);
    MatchResult::new(home, away, outcome)
}
