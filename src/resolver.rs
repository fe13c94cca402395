use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DRAW_POINTS, LOSS_POINTS, WIN_POINTS};
use crate::error::{LeagueError, Result};
use crate::fixtures::Venue;

/// How the human's day went, as a match result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserOutcome {
    Win,
    Draw,
    Loss,
}

impl UserOutcome {
    pub fn points(self) -> u32 {
        match self {
            UserOutcome::Win => WIN_POINTS,
            UserOutcome::Draw => DRAW_POINTS,
            UserOutcome::Loss => LOSS_POINTS,
        }
    }

    /// Points the opponent takes from the same match
    pub fn opponent_points(self) -> u32 {
        match self {
            UserOutcome::Win => LOSS_POINTS,
            UserOutcome::Draw => DRAW_POINTS,
            UserOutcome::Loss => WIN_POINTS,
        }
    }

    /// Cosmetic scoreline, human side first
    pub fn score(self) -> &'static str {
        match self {
            UserOutcome::Win => "2–1",
            UserOutcome::Draw => "1–1",
            UserOutcome::Loss => "0–2",
        }
    }
}

/// Points and scoreline for the human's match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserResult {
    pub outcome: UserOutcome,
    pub points: u32,
    pub opponent_points: u32,
}

impl UserResult {
    pub fn score(&self) -> &'static str {
        self.outcome.score()
    }
}

impl From<UserOutcome> for UserResult {
    fn from(outcome: UserOutcome) -> Self {
        UserResult {
            outcome,
            points: outcome.points(),
            opponent_points: outcome.opponent_points(),
        }
    }
}

/// The human's resolved match against a named opponent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserMatch {
    pub player: String,
    pub opponent: String,
    pub venue: Venue,
    pub result: UserResult,
}

impl fmt::Display for UserMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.player, self.result.score(), self.opponent)
    }
}

fn ensure_positive(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LeagueError::InvalidInput(format!(
            "{} must be a positive number, got {}",
            what, value
        )))
    }
}

/// Parse a raw calorie or goal entry.
pub fn parse_entry(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LeagueError::InvalidInput("Entry is empty".to_string()));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| LeagueError::InvalidInput(format!("'{}' is not a number", trimmed)))?;
    ensure_positive(value, "Entry")
}

pub(crate) fn validate_goal(goal: f64) -> Result<f64> {
    ensure_positive(goal, "Calorie goal")
}

/// Resolve the human's match from calories eaten against the goal.
///
/// Under the goal wins. Up to `draw_margin` over draws. Anything
/// beyond that loses.
pub fn resolve_user_match_with_margin(
    calories: f64,
    goal: f64,
    draw_margin: f64,
) -> Result<UserResult> {
    let calories = ensure_positive(calories, "Calories consumed")?;
    let goal = validate_goal(goal)?;

    let outcome = if calories < goal {
        UserOutcome::Win
    } else if calories <= goal + draw_margin {
        UserOutcome::Draw
    } else {
        UserOutcome::Loss
    };

    Ok(outcome.into())
}

/// Resolve with the standard 500 kcal draw margin.
pub fn resolve_user_match(calories: f64, goal: f64) -> Result<UserResult> {
    resolve_user_match_with_margin(calories, goal, crate::constants::DRAW_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        let goal = 2000.0;
        assert_eq!(resolve_user_match(goal - 1.0, goal).unwrap().outcome, UserOutcome::Win);
        assert_eq!(resolve_user_match(goal, goal).unwrap().outcome, UserOutcome::Draw);
        assert_eq!(resolve_user_match(goal + 500.0, goal).unwrap().outcome, UserOutcome::Draw);
        assert_eq!(resolve_user_match(goal + 501.0, goal).unwrap().outcome, UserOutcome::Loss);
    }

    #[test]
    fn test_points_and_scores() {
        let win = resolve_user_match(1800.0, 2000.0).unwrap();
        assert_eq!((win.points, win.opponent_points, win.score()), (3, 0, "2–1"));

        let draw = resolve_user_match(2200.0, 2000.0).unwrap();
        assert_eq!((draw.points, draw.opponent_points, draw.score()), (1, 1, "1–1"));

        let loss = resolve_user_match(3000.0, 2000.0).unwrap();
        assert_eq!((loss.points, loss.opponent_points, loss.score()), (0, 3, "0–2"));
    }

    #[test]
    fn test_rejects_invalid_calories() {
        for bad in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let err = resolve_user_match(bad, 2000.0).unwrap_err();
            assert!(matches!(err, LeagueError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_custom_margin() {
        let result = resolve_user_match_with_margin(2300.0, 2000.0, 200.0).unwrap();
        assert_eq!(result.outcome, UserOutcome::Loss);
    }

    #[test]
    fn test_parse_entry() {
        assert_eq!(parse_entry(" 1850 ").unwrap(), 1850.0);
        assert_eq!(parse_entry("2320.5").unwrap(), 2320.5);
        assert!(parse_entry("").is_err());
        assert!(parse_entry("lots").is_err());
        assert!(parse_entry("0").is_err());
        assert!(parse_entry("-5").is_err());
        assert!(parse_entry("NaN").is_err());
        assert!(parse_entry("inf").is_err());
    }

    #[test]
    fn test_user_match_display() {
        let m = UserMatch {
            player: "You".to_string(),
            opponent: "Arsenal".to_string(),
            venue: Venue::Away,
            result: UserOutcome::Win.into(),
        };
        assert_eq!(m.to_string(), "You 2–1 Arsenal");
    }

    proptest! {
        #[test]
        fn prop_monotonic(goal in 1.0f64..5000.0, a in 1.0f64..8000.0, b in 1.0f64..8000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low_pts = resolve_user_match(low, goal).unwrap().points;
            let high_pts = resolve_user_match(high, goal).unwrap().points;
            prop_assert!(low_pts >= high_pts);
        }

        #[test]
        fn prop_points_sum_to_three_or_two(goal in 1.0f64..5000.0, calories in 1.0f64..8000.0) {
            let result = resolve_user_match(calories, goal).unwrap();
            let pair = (result.points, result.opponent_points);
            prop_assert!(matches!(pair, (3, 0) | (0, 3) | (1, 1)));
        }
    }
}
