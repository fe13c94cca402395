use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Season already finished after {total_rounds} matchdays")]
    SeasonAlreadyFinished { total_rounds: usize },

    #[error("No season in progress")]
    NoActiveSeason,

    #[error("A season is already in progress (matchday {matchday})")]
    SeasonInProgress { matchday: usize },

    #[error("Corrupt persisted state: {0}")]
    CorruptPersistedState(String),

    #[error("Invalid league configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LeagueError {
    /// Whether the caller should simply re-prompt the user.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LeagueError::InvalidInput(_)
                | LeagueError::SeasonAlreadyFinished { .. }
                | LeagueError::NoActiveSeason
                | LeagueError::SeasonInProgress { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;
