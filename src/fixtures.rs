use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a fixture a participant is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    /// Short banner tag, "(H)" or "(A)".
    pub fn tag(self) -> &'static str {
        match self {
            Venue::Home => "(H)",
            Venue::Away => "(A)",
        }
    }
}

/// A single match: home side against away side.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    /// Fixture with `home` hosting `away`.
    pub fn new(home: &str, away: &str) -> Self {
        Fixture {
            home: home.to_string(),
            away: away.to_string(),
        }
    }

    /// Same pairing with home and away swapped
    pub fn reversed(&self) -> Self {
        Fixture {
            home: self.away.clone(),
            away: self.home.clone(),
        }
    }

    /// True if `name` plays on either side.
    pub fn involves(&self, name: &str) -> bool {
        self.home == name || self.away == name
    }

    /// The other side of the fixture and the venue `name` plays at.
    pub fn opponent_of(&self, name: &str) -> Option<(&str, Venue)> {
        if self.home == name {
            Some((&self.away, Venue::Home))
        } else if self.away == name {
            Some((&self.home, Venue::Away))
        } else {
            None
        }
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.home, self.away)
    }
}

/// Fixtures played on the same matchday.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Round {
    pub fixtures: Vec<Fixture>,
}

impl Round {
    /// The fixture `name` plays in, if any.
    pub fn fixture_for(&self, name: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.involves(name))
    }

    /// Opponent and venue for `name`; `None` on a bye.
    pub fn opponent_of(&self, name: &str) -> Option<(&str, Venue)> {
        self.fixtures.iter().find_map(|f| f.opponent_of(name))
    }

    /// Every fixture with home and away swapped.
    pub fn reversed(&self) -> Self {
        Round {
            fixtures: self.fixtures.iter().map(Fixture::reversed).collect(),
        }
    }

    /// Everyone playing in this round, in fixture order.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.fixtures
            .iter()
            .flat_map(|f| [f.home.as_str(), f.away.as_str()])
    }

    /// Entries of `all` that have no fixture this round.
    pub fn sitting_out<'a, S: AsRef<str>>(&self, all: &'a [S]) -> Vec<&'a str> {
        all.iter()
            .map(|s| s.as_ref())
            .filter(|name| self.fixture_for(name).is_none())
            .collect()
    }

    /// Number of fixtures in the round.
    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

/// Ordered sequence of rounds making up a season.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    pub rounds: Vec<Round>,
}

impl Schedule {
    /// Number of matchdays.
    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Round for a 1-based matchday.
    pub fn round(&self, matchday: usize) -> Option<&Round> {
        matchday.checked_sub(1).and_then(|i| self.rounds.get(i))
    }

    /// The single round-robin and its mirror.
    pub fn halves(&self) -> (&[Round], &[Round]) {
        self.rounds.split_at(self.rounds.len() / 2)
    }

    /// Rounds in matchday order.
    pub fn iter(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter()
    }
}

/// Build a double round-robin with the circle method.
///
/// `participants[0]` stays fixed while the rest rotate one place per round.
/// Home and away alternate with round parity. Odd counts get a bye slot
/// that never appears in a fixture. The second half repeats the first with
/// every fixture reversed. Fewer than two participants yields no rounds.
pub fn generate_schedule<S: AsRef<str>>(participants: &[S]) -> Schedule {
    if participants.len() <= 1 {
        return Schedule::default();
    }

    // None is the bye slot
    let mut slots: Vec<Option<&str>> = participants.iter().map(|p| Some(p.as_ref())).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }

    let padded = slots.len();
    let half = padded / 2;
    let anchor = slots[0];
    let mut rotating = slots[1..].to_vec();
    let mut first_half = Vec::with_capacity(padded - 1);

    for r in 0..padded - 1 {
        let left = std::iter::once(anchor).chain(rotating[..half - 1].iter().copied());
        let right = rotating[half - 1..].iter().rev().copied();

        let fixtures = left
            .zip(right)
            .filter_map(|(l, r_side)| {
                let (home, away) = if r % 2 == 0 { (l, r_side) } else { (r_side, l) };
                Some(Fixture::new(home?, away?))
            })
            .collect();

        first_half.push(Round { fixtures });
        rotating.rotate_right(1);
    }

    let second_half: Vec<Round> = first_half.iter().map(Round::reversed).collect();
    let mut rounds = first_half;
    rounds.extend(second_half);

    Schedule { rounds }
}
