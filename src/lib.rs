//! Calorie League - a football season driven by daily calorie goals.
//!
//! Each matchday the player enters what they ate. Staying under the goal wins
//! their fixture, going a little over draws, going well over loses. Every other
//! fixture is simulated from team strength ratings, and a league table is kept
//! across a double round-robin season.
//!
//! Python bindings are available behind the `python` feature.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod persistence;
pub mod projection;
pub mod resolver;
pub mod season;
pub mod simulator;
pub mod standings;
pub mod strength;

#[cfg(feature = "python")]
mod python;

pub use config::LeagueConfig;
pub use constants::{total_rounds, CANONICAL_TEAMS, DEFAULT_GOAL, DRAW_MARGIN, HUMAN_PARTICIPANT};
pub use engine::SeasonEngine;
pub use error::{LeagueError, Result};
pub use fixtures::{generate_schedule, Fixture, Round, Schedule, Venue};
pub use persistence::{JsonFileStore, MemoryStore, SeasonStore};
pub use projection::{project_season, ProjectedRow, SeasonProjection};
pub use resolver::{
    parse_entry, resolve_user_match, resolve_user_match_with_margin, UserMatch, UserOutcome,
    UserResult,
};
pub use season::{FixturePreview, MatchdayReport, SeasonState, SeasonStatus};
pub use simulator::{simulate_match, MatchResult, Outcome, SimulatorConfig, SimulatorMode};
pub use standings::{RankedRow, Standings, StandingsRow};
pub use strength::StrengthTable;
