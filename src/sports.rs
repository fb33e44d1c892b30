// A library of sport implementations.

use clap::ValueEnum;
use rand::{Rng, RngCore};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::cmp::Ordering;
use crate::data_loader::{Team, NAME_FIELD, STRENGTH_FIELD};
use crate::error::{LeagueError, Result};
use crate::fixture::Knockout;
use crate::league_context::LeagueContext;
use crate::util::Value;

pub const WINNING_SCORE: &str = "Winning Score";
pub const LOSING_SCORE: &str = "Losing Score";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Win { winner: String, loser: String },
    // Order carries no meaning for a draw, but both sides are always filled
    Draw { home: String, away: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub outcome: Outcome,
    pub stats: Vec<(String, Value)>,
}

impl MatchResult {
    // Names in the (winner, loser) slots. For a draw that is simply (home, away).
    pub fn slots(&self) -> (&str, &str) {
        match &self.outcome {
            Outcome::Win { winner, loser } => (winner, loser),
            Outcome::Draw { home, away } => (home, away),
        }
    }

    // In a knockout the second slot always goes home, so a drawn final goes to the home side.
    pub fn knockout(&self) -> Knockout {
        let (first, second) = self.slots();
        Knockout {
            advances: first.to_string(),
            eliminated: second.to_string(),
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self.outcome, Outcome::Draw { .. })
    }
}

/*
    Every sport takes two teams and a source of randomness and reports who won, plus any
    statistics worth writing to the results file. A sport is free to change the team records,
    for example to make a beaten cricket side stronger.
*/
pub trait Game {
    fn name(&self) -> &'static str;

    // Columns a team table needs for this sport
    fn parameters(&self) -> &'static [&'static str];

    fn play(&self, home: &mut Team, away: &mut Team, rng: &mut dyn RngCore) -> Result<MatchResult>;
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportKind {
    Cricket,
    Football,
}

impl SportKind {
    // Settings are checked here, once, so play() can rely on non-empty ranges.
    pub fn game(&self, context: &LeagueContext) -> Result<Box<dyn Game>> {
        Ok(match self {
            SportKind::Cricket => Box::new(Cricket::new(context.cricket)?),
            SportKind::Football => Box::new(Football::new(context.football)?),
        })
    }
}

// Every team in an editor table needs the columns the sport plays with.
pub fn check_parameters(game: &dyn Game, teams: &[Team]) -> Result<()> {
    for t in teams {
        for param in game.parameters().iter().filter(|p| **p != NAME_FIELD) {
            if t.attribute(param).is_none() {
                return Err(LeagueError::MissingAttribute {
                    team: t.name.clone(),
                    attribute: param.to_string(),
                });
            }
        }
    }
    Ok(())
}

// Stronger side wins, equal strength is a draw. Returns (first slot, second slot, drawn).
fn by_strength<'a>(home: &'a Team, away: &'a Team) -> Result<(&'a Team, &'a Team, bool)> {
    Ok(match home.strength()?.cmp(&away.strength()?) {
        Ordering::Equal => (home, away, true),
        Ordering::Greater => (home, away, false),
        Ordering::Less => (away, home, false),
    })
}

fn outcome(first: &Team, second: &Team, drawn: bool) -> Outcome {
    if drawn {
        Outcome::Draw { home: first.name.clone(), away: second.name.clone() }
    } else {
        Outcome::Win { winner: first.name.clone(), loser: second.name.clone() }
    }
}

fn check_range(what: &str, min: u32, max: u32) -> Result<()> {
    if min > max {
        return Err(LeagueError::InvalidSettings(format!("min_{what} {min} is above max_{what} {max}")));
    }
    Ok(())
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct CricketSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub min_runs: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_runs: u32,
}

impl Default for CricketSettings {
    fn default() -> Self {
        Self { min_runs: 120, max_runs: 180 }
    }
}

impl CricketSettings {
    pub fn validate(&self) -> Result<()> {
        check_range("runs", self.min_runs, self.max_runs)
    }
}

pub struct Cricket {
    settings: CricketSettings,
}

impl Cricket {
    const LOSING_RUNS_FLOOR: u32 = 80;

    pub fn new(settings: CricketSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }
}

impl Game for Cricket {
    fn name(&self) -> &'static str { "Cricket" }

    fn parameters(&self) -> &'static [&'static str] { &["Name", "Strength"] }

    fn play(&self, home: &mut Team, away: &mut Team, rng: &mut dyn RngCore) -> Result<MatchResult> {
        let (first, second, drawn) = by_strength(home, away)?;
        let outcome = outcome(first, second, drawn);
        let home_lost = !drawn && first.name != home.name;

        // The beaten side learns from it
        if !drawn {
            let loser = if home_lost { &mut *home } else { &mut *away };
            loser.adjust(STRENGTH_FIELD, 1)?;
        }

        let winning_runs = rng.random_range(self.settings.min_runs..=self.settings.max_runs);
        let winning_wickets: u32 = rng.random_range(5..=10);

        let losing_runs = if drawn {
            winning_runs
        } else {
            rng.random_range(Self::LOSING_RUNS_FLOOR.min(winning_runs)..=winning_runs)
        };
        let losing_wickets: u32 = rng.random_range(5..=10);

        Ok(MatchResult {
            outcome,
            stats: vec![
                (WINNING_SCORE.to_string(), Value::Text(format!("{winning_wickets}/{winning_runs}"))),
                (LOSING_SCORE.to_string(), Value::Text(format!("{losing_wickets}/{losing_runs}"))),
            ],
        })
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FootballSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub min_goals: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_goals: u32,
}

impl Default for FootballSettings {
    fn default() -> Self {
        Self { min_goals: 1, max_goals: 3 }
    }
}

impl FootballSettings {
    pub fn validate(&self) -> Result<()> {
        check_range("goals", self.min_goals, self.max_goals)?;
        // A winner needs at least one goal to beat the loser's tally
        if self.max_goals == 0 {
            return Err(LeagueError::InvalidSettings("max_goals must be at least 1".to_string()));
        }
        Ok(())
    }
}

pub struct Football {
    settings: FootballSettings,
}

impl Football {
    pub fn new(settings: FootballSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }
}

impl Game for Football {
    fn name(&self) -> &'static str { "Football (soccer)" }

    fn parameters(&self) -> &'static [&'static str] { &["Name", "Strength", "Goals"] }

    fn play(&self, home: &mut Team, away: &mut Team, rng: &mut dyn RngCore) -> Result<MatchResult> {
        let (first, second, drawn) = by_strength(home, away)?;
        let outcome = outcome(first, second, drawn);

        let (winning_goals, losing_goals) = if drawn {
            let goals = rng.random_range(self.settings.min_goals..=self.settings.max_goals);
            (goals, goals)
        } else {
            let winning = rng.random_range(self.settings.min_goals.max(1)..=self.settings.max_goals);
            (winning, rng.random_range(0..winning))
        };

        Ok(MatchResult {
            outcome,
            stats: vec![
                (WINNING_SCORE.to_string(), Value::Int(winning_goals as i64)),
                (LOSING_SCORE.to_string(), Value::Int(losing_goals as i64)),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng { StdRng::seed_from_u64(7) }

    fn runs(stat: &Value) -> u32 {
        stat.to_string().split('/').nth(1).unwrap().parse().unwrap()
    }

    #[test]
    fn stronger_cricket_side_wins_and_loser_improves() {
        let cricket = Cricket::new(CricketSettings::default()).unwrap();
        let mut home = Team::new("A").with("Strength", 3);
        let mut away = Team::new("B").with("Strength", 5);

        let result = cricket.play(&mut home, &mut away, &mut rng()).unwrap();

        assert_eq!(result.outcome, Outcome::Win { winner: "B".to_string(), loser: "A".to_string() });
        assert_eq!(home.strength().unwrap(), 4);
        assert_eq!(away.strength().unwrap(), 5);

        let winning = runs(&result.stats[0].1);
        let losing = runs(&result.stats[1].1);
        assert!((120..=180).contains(&winning));
        assert!((80..=winning).contains(&losing));
    }

    #[test]
    fn equal_cricket_sides_draw_on_level_runs() {
        let cricket = Cricket::new(CricketSettings::default()).unwrap();
        let mut home = Team::new("A").with("Strength", 4);
        let mut away = Team::new("B").with("Strength", 4);

        for _ in 0..20 {
            let result = cricket.play(&mut home, &mut away, &mut rng()).unwrap();
            assert!(result.is_draw());
            assert_eq!(runs(&result.stats[0].1), runs(&result.stats[1].1));
        }
        assert_eq!(home.strength().unwrap(), 4);
    }

    #[test]
    fn football_scores_stay_in_range() {
        let football = Football::new(FootballSettings::default()).unwrap();
        let mut home = Team::new("A").with("Strength", 9);
        let mut away = Team::new("B").with("Strength", 2);
        let mut rng = rng();

        for _ in 0..50 {
            let result = football.play(&mut home, &mut away, &mut rng).unwrap();
            assert_eq!(result.slots(), ("A", "B"));

            let winning = result.stats[0].1.as_int().unwrap();
            let losing = result.stats[1].1.as_int().unwrap();
            assert!((1..=3).contains(&winning));
            assert!(losing < winning);
        }
        // Football never touches strength
        assert_eq!(away.strength().unwrap(), 2);
    }

    #[test]
    fn missing_strength_is_reported() {
        let football = Football::new(FootballSettings::default()).unwrap();
        let mut home = Team::new("A");
        let mut away = Team::new("B").with("Strength", 2);

        let err = football.play(&mut home, &mut away, &mut rng()).unwrap_err();
        assert!(matches!(err, LeagueError::MissingAttribute { team, .. } if team == "A"));
    }

    #[test]
    fn knockout_eliminates_second_slot() {
        let result = MatchResult {
            outcome: Outcome::Draw { home: "A".to_string(), away: "B".to_string() },
            stats: Vec::new(),
        };
        assert_eq!(result.knockout(), Knockout { advances: "A".to_string(), eliminated: "B".to_string() });
    }

    #[test]
    fn settings_accept_numeric_strings() {
        let settings: CricketSettings = serde_json::from_str(r#"{"max_runs": "180", "min_runs": "120"}"#).unwrap();
        assert_eq!(settings, CricketSettings::default());

        let bad = FootballSettings { min_goals: 3, max_goals: 1 };
        assert!(matches!(bad.validate(), Err(LeagueError::InvalidSettings(_))));
    }

    #[test]
    fn editor_tables_need_sport_columns() {
        let football = Football::new(FootballSettings::default()).unwrap();
        let ready = vec![Team::new("A").with("Strength", 1).with("Goals", 0)];
        assert!(check_parameters(&football, &ready).is_ok());

        let short = vec![Team::new("B").with("Strength", 1)];
        let err = check_parameters(&football, &short).unwrap_err();
        assert!(matches!(err, LeagueError::MissingAttribute { attribute, .. } if attribute == "Goals"));
    }

    #[test]
    fn sport_kind_builds_named_games() {
        let context = LeagueContext::default();
        assert_eq!(SportKind::Cricket.game(&context).unwrap().name(), "Cricket");
        assert_eq!(SportKind::Football.game(&context).unwrap().parameters(), &["Name", "Strength", "Goals"]);
    }

    #[test]
    fn games_are_not_built_from_bad_settings() {
        let mut context = LeagueContext::default();
        context.cricket = CricketSettings { min_runs: 200, max_runs: 100 };

        assert!(matches!(SportKind::Cricket.game(&context), Err(LeagueError::InvalidSettings(_))));
        assert!(SportKind::Football.game(&context).is_ok());
        assert!(Football::new(FootballSettings { min_goals: 0, max_goals: 0 }).is_err());
    }
}
