//! League configuration.
//!
//! ```
//! use calorie_league::LeagueConfig;
//!
//! let config = LeagueConfig::default();
//! assert_eq!(config.participants.len(), 20);
//!
//! let small = LeagueConfig::from_json_str(r#"{"participants": ["You", "A", "B", "C"]}"#).unwrap();
//! assert_eq!(small.human, "You");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::constants::{CANONICAL_TEAMS, DEFAULT_GOAL, DRAW_MARGIN, HUMAN_PARTICIPANT};
use crate::error::{LeagueError, Result};
use crate::simulator::SimulatorConfig;
use crate::strength::StrengthTable;

/// Everything a season needs besides the player's input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    /// Participants in schedule order; the first one is the rotation anchor
    pub participants: Vec<String>,
    /// Participant whose matches come from calorie entries
    pub human: String,
    pub strengths: StrengthTable,
    /// Goal offered when the player does not choose one
    pub default_goal: f64,
    /// Calories above the goal that still draw
    pub draw_margin: f64,
    pub simulator: SimulatorConfig,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            participants: CANONICAL_TEAMS.iter().map(|t| t.to_string()).collect(),
            human: HUMAN_PARTICIPANT.to_string(),
            strengths: StrengthTable::canonical(),
            default_goal: DEFAULT_GOAL,
            draw_margin: DRAW_MARGIN,
            simulator: SimulatorConfig::default(),
        }
    }
}

impl LeagueConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LeagueConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Small league for quick seasons and tests.
    pub fn with_participants<S: AsRef<str>>(participants: &[S]) -> Self {
        LeagueConfig {
            participants: participants.iter().map(|p| p.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.participants.len() < 2 {
            return Err(LeagueError::InvalidConfig(format!(
                "A league needs at least 2 participants, got {}",
                self.participants.len()
            )));
        }

        let mut seen = HashSet::new();
        for name in &self.participants {
            if name.trim().is_empty() {
                return Err(LeagueError::InvalidConfig(
                    "Participant names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(LeagueError::InvalidConfig(format!("Duplicate participant: {}", name)));
            }
        }

        if !seen.contains(self.human.as_str()) {
            return Err(LeagueError::InvalidConfig(format!(
                "Human participant {} is not in the league",
                self.human
            )));
        }

        if !(self.default_goal.is_finite() && self.default_goal > 0.0) {
            return Err(LeagueError::InvalidConfig(format!(
                "Default goal must be positive, got {}",
                self.default_goal
            )));
        }

        if !(self.draw_margin.is_finite() && self.draw_margin >= 0.0) {
            return Err(LeagueError::InvalidConfig(format!(
                "Draw margin cannot be negative, got {}",
                self.draw_margin
            )));
        }

        self.simulator.validate()?;
        self.strengths.validate()
    }
}
