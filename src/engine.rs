use log::{error, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::LeagueConfig;
use crate::error::{LeagueError, Result};
use crate::persistence::SeasonStore;
use crate::projection::{project_season, SeasonProjection};
use crate::resolver::parse_entry;
use crate::season::{FixturePreview, MatchdayReport, SeasonState, SeasonStatus};
use crate::standings::RankedRow;

/// A single player's session: configuration, current season and its store.
///
/// The store is read once, when the engine is built. Every transition
/// saves before it commits, so a failed save leaves the engine unchanged.
pub struct SeasonEngine<S: SeasonStore> {
    config: LeagueConfig,
    store: S,
    state: Option<SeasonState>,
    rng: ChaCha8Rng,
}

impl<S: SeasonStore> SeasonEngine<S> {
    /// Build an engine, resuming any valid saved season.
    pub fn new(config: LeagueConfig, store: S) -> Result<Self> {
        Self::build(config, store, None)
    }

    /// Same as `new` with a fixed random seed.
    pub fn with_seed(config: LeagueConfig, store: S, seed: u64) -> Result<Self> {
        Self::build(config, store, Some(seed))
    }

    fn build(config: LeagueConfig, store: S, seed: Option<u64>) -> Result<Self> {
        config.validate()?;

        let state = match store.load() {
            Ok(Some(state)) => match Self::check_resumable(&state, &config) {
                Ok(()) => {
                    info!(
                        "Resuming season at matchday {} of {}",
                        state.matchday,
                        state.total_rounds()
                    );
                    Some(state)
                }
                Err(e) => {
                    warn!("Discarding saved season: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e @ LeagueError::CorruptPersistedState(_)) => {
                warn!("Discarding saved season: {}", e);
                None
            }
            Err(e) => return Err(e),
        };

        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(SeasonEngine {
            config,
            store,
            state,
            rng,
        })
    }

    fn check_resumable(state: &SeasonState, config: &LeagueConfig) -> Result<()> {
        state.validate()?;
        if state.standings.row(&config.human).is_none() {
            return Err(LeagueError::CorruptPersistedState(format!(
                "Saved season has no row for {}",
                config.human
            )));
        }
        Ok(())
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> Option<&SeasonState> {
        self.state.as_ref()
    }

    pub fn status(&self) -> SeasonStatus {
        self.state
            .as_ref()
            .map_or(SeasonStatus::NotStarted, SeasonState::status)
    }

    /// Start a new season with the given daily goal.
    ///
    /// Allowed when no season is running or the last one has finished.
    pub fn start(&mut self, goal: f64) -> Result<&SeasonState> {
        if let SeasonStatus::InProgress { matchday } = self.status() {
            return Err(LeagueError::SeasonInProgress { matchday });
        }

        let state = SeasonState::new(&self.config, goal)?;
        self.persist(&state)?;
        info!(
            "New season: {} participants, {} matchdays, goal {}",
            self.config.participants.len(),
            state.total_rounds(),
            goal
        );
        let state: &SeasonState = self.state.insert(state);
        Ok(state)
    }

    /// Start with the configured default goal.
    pub fn start_default(&mut self) -> Result<&SeasonState> {
        self.start(self.config.default_goal)
    }

    /// Start from a raw goal entry.
    pub fn start_entry(&mut self, raw: &str) -> Result<&SeasonState> {
        let goal = parse_entry(raw)?;
        self.start(goal)
    }

    /// Play the current matchday with today's calorie count.
    pub fn play_matchday(&mut self, calories: f64) -> Result<MatchdayReport> {
        let mut next = self.state.clone().ok_or(LeagueError::NoActiveSeason)?;

        let report = next
            .play_matchday(calories, &self.config, &mut self.rng)
            .inspect_err(|e| {
                if matches!(e, LeagueError::SeasonAlreadyFinished { .. }) {
                    info!("{}", e);
                }
            })?;

        self.persist(&next)?;
        if report.season_finished {
            info!("Season finished after {} matchdays", next.total_rounds());
        }
        self.state = Some(next);
        Ok(report)
    }

    /// Play from a raw calorie entry.
    pub fn play_matchday_entry(&mut self, raw: &str) -> Result<MatchdayReport> {
        let calories = parse_entry(raw)?;
        self.play_matchday(calories)
    }

    /// Drop the season and its saved snapshot.
    pub fn reset(&mut self) -> Result<()> {
        self.store
            .clear()
            .inspect_err(|e| error!("Failed to clear saved season: {}", e))?;
        if self.state.take().is_some() {
            info!("Season discarded");
        }
        Ok(())
    }

    /// Table in display order; empty before a season starts.
    pub fn standings(&self) -> Vec<RankedRow<'_>> {
        self.state
            .as_ref()
            .map(|s| s.standings.sorted())
            .unwrap_or_default()
    }

    /// The human's upcoming match.
    pub fn next_fixture(&self) -> Option<FixturePreview> {
        self.state.as_ref()?.next_fixture(&self.config.human)
    }

    /// Forecast the final table from the current position.
    pub fn project(&self, n_simulations: usize, seed: Option<u64>) -> Result<SeasonProjection> {
        let state = self.state.as_ref().ok_or(LeagueError::NoActiveSeason)?;
        project_season(
            state,
            &self.config.strengths,
            &self.config.simulator,
            n_simulations,
            seed,
        )
    }

    fn persist(&mut self, state: &SeasonState) -> Result<()> {
        self.store
            .save(state)
            .inspect_err(|e| error!("Failed to save season: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{JsonFileStore, MemoryStore};

    fn small_config() -> LeagueConfig {
        LeagueConfig::with_participants(&["You", "A", "B", "C"])
    }

    fn engine() -> SeasonEngine<MemoryStore> {
        SeasonEngine::with_seed(small_config(), MemoryStore::new(), 42).unwrap()
    }

    /// Store whose saves always fail.
    struct BrokenStore;

    impl SeasonStore for BrokenStore {
        fn load(&self) -> Result<Option<SeasonState>> {
            Ok(None)
        }

        fn save(&mut self, _state: &SeasonState) -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut engine = engine();
        assert_eq!(engine.status(), SeasonStatus::NotStarted);
        assert!(engine.standings().is_empty());
        assert!(matches!(engine.play_matchday(1800.0), Err(LeagueError::NoActiveSeason)));

        engine.start(2000.0).unwrap();
        assert_eq!(engine.status(), SeasonStatus::InProgress { matchday: 1 });
        assert!(matches!(
            engine.start(2000.0),
            Err(LeagueError::SeasonInProgress { matchday: 1 })
        ));

        for _ in 0..6 {
            engine.play_matchday(1800.0).unwrap();
        }
        assert_eq!(engine.status(), SeasonStatus::Finished);
        assert!(engine.next_fixture().is_none());

        // A finished season can be replaced
        engine.start(1500.0).unwrap();
        assert_eq!(engine.state().unwrap().goal, 1500.0);
        assert!(engine.standings().iter().all(|r| r.row.points == 0));

        engine.reset().unwrap();
        assert_eq!(engine.status(), SeasonStatus::NotStarted);
        assert!(engine.store().snapshot().is_none());
    }

    #[test]
    fn test_end_to_end_first_matchday() {
        let mut engine = engine();
        engine.start(2000.0).unwrap();
        let report = engine.play_matchday(1800.0).unwrap();

        let user = report.user.unwrap();
        assert_eq!(user.result.points, 3);

        let state = engine.state().unwrap();
        let you = state.standings.row("You").unwrap();
        assert_eq!((you.points, you.played), (3, 1));
        let opp = state.standings.row(&user.opponent).unwrap();
        assert_eq!((opp.points, opp.played), (0, 1));

        let others: Vec<_> = state
            .standings
            .rows()
            .iter()
            .filter(|r| r.name != "You" && r.name != user.opponent)
            .collect();
        assert_eq!(others.len(), 2);
        assert!(others.iter().all(|r| r.played == 1));
        let sum = others[0].points + others[1].points;
        assert!(sum == 3 || sum == 2);
    }

    #[test]
    fn test_finished_season_is_not_mutated() {
        let mut engine = engine();
        engine.start(2000.0).unwrap();
        for _ in 0..6 {
            engine.play_matchday(2200.0).unwrap();
        }
        let before = engine.state().cloned();
        let saves = engine.store().saves();

        let err = engine.play_matchday(1800.0).unwrap_err();
        assert!(matches!(err, LeagueError::SeasonAlreadyFinished { total_rounds: 6 }));
        assert_eq!(engine.state().cloned(), before);
        assert_eq!(engine.store().saves(), saves);
    }

    #[test]
    fn test_saves_after_every_transition() {
        let mut engine = engine();
        engine.start(2000.0).unwrap();
        assert_eq!(engine.store().saves(), 1);
        engine.play_matchday(1800.0).unwrap();
        engine.play_matchday(1800.0).unwrap();
        assert_eq!(engine.store().saves(), 3);

        assert!(engine.play_matchday_entry("abc").is_err());
        assert_eq!(engine.store().saves(), 3);
        assert_eq!(engine.state().unwrap().matchday, 3);
    }

    #[test]
    fn test_failed_save_leaves_state_alone() {
        let mut engine = SeasonEngine::with_seed(small_config(), BrokenStore, 1).unwrap();
        assert!(matches!(engine.start(2000.0), Err(LeagueError::Io(_))));
        assert_eq!(engine.status(), SeasonStatus::NotStarted);
    }

    #[test]
    fn test_failed_save_keeps_matchday() {
        struct FailAfterStart {
            inner: MemoryStore,
        }

        impl SeasonStore for FailAfterStart {
            fn load(&self) -> Result<Option<SeasonState>> {
                self.inner.load()
            }

            fn save(&mut self, state: &SeasonState) -> Result<()> {
                if self.inner.saves() > 0 {
                    return Err(std::io::Error::new(std::io::ErrorKind::Other, "read-only").into());
                }
                self.inner.save(state)
            }

            fn clear(&mut self) -> Result<()> {
                self.inner.clear()
            }
        }

        let store = FailAfterStart { inner: MemoryStore::new() };
        let mut engine = SeasonEngine::with_seed(small_config(), store, 2).unwrap();
        engine.start(2000.0).unwrap();
        let before = engine.state().cloned();

        assert!(matches!(engine.play_matchday(1800.0), Err(LeagueError::Io(_))));
        assert_eq!(engine.state().cloned(), before);
    }

    #[test]
    fn test_resume_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("season.json");

        let saved = {
            let mut engine =
                SeasonEngine::with_seed(small_config(), JsonFileStore::new(&path), 5).unwrap();
            engine.start_entry("2000").unwrap();
            engine.play_matchday_entry(" 1800 ").unwrap();
            engine.play_matchday(2600.0).unwrap();
            engine.state().cloned().unwrap()
        };

        let engine = SeasonEngine::new(small_config(), JsonFileStore::new(&path)).unwrap();
        assert_eq!(engine.status(), SeasonStatus::InProgress { matchday: 3 });
        assert_eq!(engine.state(), Some(&saved));
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_not_started() {
        let engine = SeasonEngine::new(small_config(), MemoryStore::with_json("{oops")).unwrap();
        assert_eq!(engine.status(), SeasonStatus::NotStarted);

        let mut state = SeasonState::new(&small_config(), 2000.0).unwrap();
        state.matchday = 99;
        let json = serde_json::to_string(&state).unwrap();
        let engine = SeasonEngine::new(small_config(), MemoryStore::with_json(&json)).unwrap();
        assert_eq!(engine.status(), SeasonStatus::NotStarted);
    }

    #[test]
    fn test_snapshot_without_human_is_discarded() {
        let other = LeagueConfig {
            participants: vec!["Me".to_string(), "A".to_string()],
            human: "Me".to_string(),
            ..LeagueConfig::default()
        };
        let json = SeasonState::new(&other, 2000.0).unwrap().to_json().unwrap();

        let engine = SeasonEngine::new(small_config(), MemoryStore::with_json(&json)).unwrap();
        assert_eq!(engine.status(), SeasonStatus::NotStarted);
    }

    #[test]
    fn test_invalid_goal_entries() {
        let mut engine = engine();
        for raw in ["", "abc", "0", "-2000"] {
            assert!(matches!(engine.start_entry(raw), Err(LeagueError::InvalidInput(_))));
        }
        assert_eq!(engine.status(), SeasonStatus::NotStarted);
        assert_eq!(engine.store().saves(), 0);
    }

    #[test]
    fn test_default_goal_and_canonical_league() {
        let mut engine =
            SeasonEngine::with_seed(LeagueConfig::default(), MemoryStore::new(), 3).unwrap();
        let state = engine.start_default().unwrap();
        assert_eq!(state.goal, 2320.0);
        assert_eq!(state.total_rounds(), 38);
        assert_eq!(engine.next_fixture().unwrap().to_string(), "Matchday 1: (H) vs Leeds");

        for _ in 0..38 {
            engine.play_matchday(2000.0).unwrap();
        }
        let table = engine.standings();
        assert_eq!(table[0].row.name, "You");
        assert_eq!(table[0].row.points, 114);
        assert!(table.iter().all(|r| r.row.played == 38));
    }

    #[test]
    fn test_project_requires_season() {
        let mut engine = engine();
        assert!(matches!(engine.project(10, Some(1)), Err(LeagueError::NoActiveSeason)));
        engine.start(2000.0).unwrap();
        let projection = engine.project(50, Some(1)).unwrap();
        assert_eq!(projection.rows.len(), 4);
        assert_eq!(projection.simulations, 50);
    }
}
