use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Result type not supported: {0}")]
    UnsupportedResult(String),

    #[error("Team {0} not found in ladder!")]
    UnknownTeam(String),

    #[error("Team {0} appears more than once")]
    DuplicateTeam(String),

    #[error("Team {team} has no {attribute} attribute")]
    MissingAttribute { team: String, attribute: String },

    #[error("Attribute {attribute} of team {team} is not a number: {value}")]
    NotNumeric { team: String, attribute: String, value: String },

    #[error("Attribute {attribute} of team {team} is out of range")]
    Overflow { team: String, attribute: String },

    #[error("Elimination needs a power of two teams, got {0}")]
    BracketSize(usize),

    #[error("Team {team} already has {rounds} results recorded")]
    TooManyResults { team: String, rounds: usize },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Team table is empty")]
    EmptyTable,
}

pub type Result<T> = std::result::Result<T, LeagueError>;
