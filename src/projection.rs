use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{LeagueError, Result};
use crate::season::SeasonState;
use crate::simulator::{simulate_match, SimulatorConfig};
use crate::standings::Standings;
use crate::strength::StrengthTable;

/// Forecast for one participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRow {
    pub name: String,
    pub current_points: u32,
    pub expected_points: f64,
    pub expected_position: f64,
    pub title_probability: f64,
}

/// Monte Carlo forecast of the final table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonProjection {
    pub simulations: usize,
    /// Sorted by expected points, highest first
    pub rows: Vec<ProjectedRow>,
}

impl SeasonProjection {
    pub fn row(&self, name: &str) -> Option<&ProjectedRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

/// Play out the remaining matchdays once.
///
/// Every fixture is simulated, the human's included, using their rating.
fn simulate_remaining<R: Rng>(
    state: &SeasonState,
    strengths: &StrengthTable,
    simulator: &SimulatorConfig,
    rng: &mut R,
) -> Standings {
    let mut standings = state.standings.clone();
    for round in state.schedule.rounds.iter().skip(state.matchday.saturating_sub(1)) {
        for fixture in &round.fixtures {
            let result = simulate_match(&fixture.home, &fixture.away, strengths, simulator, rng);
            standings.record(&result.home, result.home_points);
            standings.record(&result.away, result.away_points);
        }
    }
    standings
}

/// Forecast the final table by simulating the rest of the season.
///
/// Each simulation draws its own seed from a master generator, so a fixed
/// `seed` gives the same projection regardless of thread scheduling.
pub fn project_season(
    state: &SeasonState,
    strengths: &StrengthTable,
    simulator: &SimulatorConfig,
    n_simulations: usize,
    seed: Option<u64>,
) -> Result<SeasonProjection> {
    if n_simulations == 0 {
        return Err(LeagueError::InvalidInput(
            "Projection needs at least one simulation".to_string(),
        ));
    }

    let mut master = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let seeds: Vec<u64> = (0..n_simulations).map(|_| master.gen::<u64>()).collect();

    let n_rows = state.standings.len();

    // Per simulation: final points and final position for each row
    let outcomes: Vec<(Vec<u32>, Vec<usize>)> = seeds
        .par_iter()
        .map(|&sim_seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(sim_seed);
            let final_table = simulate_remaining(state, strengths, simulator, &mut rng);
            let points = final_table.rows().iter().map(|r| r.points).collect();
            let mut positions = vec![0; n_rows];
            for (pos, idx) in final_table.order().into_iter().enumerate() {
                positions[idx] = pos + 1;
            }
            (points, positions)
        })
        .collect();

    let mut total_points = vec![0.0; n_rows];
    let mut total_positions = vec![0.0; n_rows];
    let mut titles = vec![0usize; n_rows];
    for (points, positions) in &outcomes {
        for i in 0..n_rows {
            total_points[i] += f64::from(points[i]);
            total_positions[i] += positions[i] as f64;
            if positions[i] == 1 {
                titles[i] += 1;
            }
        }
    }

    let n = n_simulations as f64;
    let mut rows: Vec<ProjectedRow> = state
        .standings
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| ProjectedRow {
            name: row.name.clone(),
            current_points: row.points,
            expected_points: total_points[i] / n,
            expected_position: total_positions[i] / n,
            title_probability: titles[i] as f64 / n,
        })
        .collect();
    rows.sort_by(|a, b| b.expected_points.total_cmp(&a.expected_points));

    Ok(SeasonProjection {
        simulations: n_simulations,
        rows,
    })
}
