use serde::Deserialize;
use std::fs;
use std::path::Path;
use crate::error::Result;
use crate::sports::{CricketSettings, FootballSettings};

// Points handed out for each outcome on the ladder.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PointTable {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl Default for PointTable {
    fn default() -> Self {
        Self { win: 2, draw: 1, loss: 0 }
    }
}

/*
    Everything that tunes a season lives here. Every field has a default, so a config
    file only needs the values it wants to change.
*/
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LeagueContext {
    pub revolutions: usize,     // How many times every team meets every other team
    pub finals_teams: usize,    // Top n of the ladder that go through to the finals

    pub points: PointTable,

    pub seed: Option<u64>,
    pub output_path: String,

    pub cricket: CricketSettings,
    pub football: FootballSettings,
}

impl Default for LeagueContext {
    fn default() -> Self {
        Self {
            revolutions: 2,
            finals_teams: 4,

            points: PointTable::default(),

            seed: None,
            output_path: "out.csv".to_string(),

            cricket: CricketSettings::default(),
            football: FootballSettings::default(),
        }
    }
}

impl LeagueContext {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let context: LeagueContext = serde_json::from_str(&data)?;
        context.cricket.validate()?;
        context.football.validate()?;
        Ok(context)
    }
}
