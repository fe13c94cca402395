use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::constants::{CANONICAL_STRENGTHS, DEFAULT_STRENGTH, MAX_STRENGTH};
use crate::error::{LeagueError, Result};

/// Strength ratings for simulated participants.
///
/// Ratings live on a 0-100 scale. Anyone missing from the table is
/// rated `DEFAULT_STRENGTH`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrengthTable {
    ratings: HashMap<String, u8>,
}

impl StrengthTable {
    pub fn new() -> Self {
        StrengthTable {
            ratings: HashMap::new(),
        }
    }

    /// Ratings for the built-in 20-team league.
    pub fn canonical() -> Self {
        let mut table = StrengthTable::new();
        for (name, rating) in CANONICAL_STRENGTHS {
            table.set(name, rating);
        }
        table
    }

    /// Read ratings from a CSV file.
    /// Format: name,rating
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let mut table = StrengthTable::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Names may contain commas, the rating never does.
            let Some((name, rating)) = line.rsplit_once(',') else {
                continue;
            };
            let rating: u8 = rating.trim().parse().map_err(|e| {
                LeagueError::InvalidConfig(format!("Invalid rating for {}: {}", name.trim(), e))
            })?;
            table.set(name.trim(), rating);
        }

        table.validate()?;
        Ok(table)
    }

    /// Add or update a rating.
    pub fn set(&mut self, name: &str, rating: u8) {
        self.ratings.insert(name.to_string(), rating);
    }

    /// Rating for a participant, falling back to the default.
    pub fn get(&self, name: &str) -> u8 {
        self.ratings.get(name).copied().unwrap_or(DEFAULT_STRENGTH)
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((name, rating)) = self.ratings.iter().find(|&(_, &r)| r > MAX_STRENGTH) {
            return Err(LeagueError::InvalidConfig(format!(
                "Rating {} for {} is above {}",
                rating, name, MAX_STRENGTH
            )));
        }
        Ok(())
    }
}
