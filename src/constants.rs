/// Points for a win
pub const WIN_POINTS: u32 = 3;

/// Points for a draw
pub const DRAW_POINTS: u32 = 1;

/// Points for a loss
pub const LOSS_POINTS: u32 = 0;

/// Rating used for any participant missing from the strength table
pub const DEFAULT_STRENGTH: u8 = 50;

/// Highest allowed strength rating
pub const MAX_STRENGTH: u8 = 100;

/// Bonus added to the home side's rating when simulating
pub const HOME_ADVANTAGE: u8 = 5;

/// Width of the draw band on the 0-100 simulator scale
pub const DRAW_BAND: u8 = 15;

/// Rating difference that moves the rating-aware simulator by one standard deviation
pub const RATING_STDDEV: f64 = 20.0;

/// Calories above the goal that still count as a draw
pub const DRAW_MARGIN: f64 = 500.0;

/// Daily calorie goal used when none is given
pub const DEFAULT_GOAL: f64 = 2320.0;

/// Name of the participant driven by calorie input
pub const HUMAN_PARTICIPANT: &str = "You";

/// The canonical 20-team league, in schedule order
pub const CANONICAL_TEAMS: [&str; 20] = [
    "You",
    "Man City",
    "Arsenal",
    "Liverpool",
    "Chelsea",
    "Man United",
    "Tottenham",
    "Newcastle",
    "Aston Villa",
    "Brighton",
    "West Ham",
    "Brentford",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Wolves",
    "Nottingham Forest",
    "Bournemouth",
    "Burnley",
    "Leeds",
];

/// Strength ratings for the canonical league
pub const CANONICAL_STRENGTHS: [(&str, u8); 20] = [
    ("Man City", 60),
    ("Liverpool", 60),
    ("Arsenal", 60),
    ("Chelsea", 50),
    ("Man United", 50),
    ("Tottenham", 50),
    ("Newcastle", 40),
    ("Aston Villa", 40),
    ("Brighton", 40),
    ("West Ham", 40),
    ("Brentford", 40),
    ("Crystal Palace", 40),
    ("Everton", 30),
    ("Fulham", 30),
    ("Wolves", 30),
    ("Nottingham Forest", 40),
    ("Bournemouth", 40),
    ("Burnley", 20),
    ("Leeds", 20),
    ("You", 65),
];

/// Number of matchdays in a double round-robin for `participants` teams.
///
/// Odd counts are padded with a bye slot, so 19 teams still play 38 matchdays.
pub fn total_rounds(participants: usize) -> usize {
    if participants <= 1 {
        return 0;
    }
    let padded = participants + participants % 2;
    2 * (padded - 1)
}
