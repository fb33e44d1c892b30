use std::collections::HashSet;
use std::io;
use std::path::Path;
use crate::data_loader::Team;
use crate::error::{LeagueError, Result};
use crate::ladder::Ladder;
use crate::league_context::PointTable;
use crate::sports::{MatchResult, Outcome};
use crate::util::*;

pub const ROUND_FIELD: &str = "Round";
pub const WINNER_FIELD: &str = "Winner";
pub const LOSER_FIELD: &str = "Loser";
pub const FINALS_PREFIX: &str = "Finals";
const NO_LOSER: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub round: String,
    pub winner: String,
    pub loser: String,
    pub stats: Vec<(String, Value)>,
}

// Output buffer for every match played in a season, flushed to CSV at the end.
#[derive(Debug, Default)]
pub struct ResultLog {
    rows: Vec<ResultRow>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn store(&mut self, result: &MatchResult, round: &str) {
        let (winner, loser) = match &result.outcome {
            Outcome::Win { winner, loser } => (winner.clone(), loser.clone()),
            Outcome::Draw { home, away } => (format!("{home}, {away}"), NO_LOSER.to_string()),
        };

        self.rows.push(ResultRow {
            round: round.to_string(),
            winner,
            loser,
            stats: result.stats.clone(),
        });
    }

    // Round, Winner and Loser come first, then every statistic in the order it was first seen.
    pub fn fieldnames(&self) -> Vec<String> {
        let mut fields = vec![ROUND_FIELD.to_string(), WINNER_FIELD.to_string(), LOSER_FIELD.to_string()];
        for row in &self.rows {
            for (stat, _) in &row.stats {
                if !fields.contains(stat) { fields.push(stat.clone()); }
            }
        }
        fields
    }

    pub fn write_to<W: io::Write>(&self, out: W) -> Result<()> {
        let fields = self.fieldnames();
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(&fields)?;

        for row in &self.rows {
            let mut record = vec![row.round.clone(), row.winner.clone(), row.loser.clone()];
            for field in &fields[3..] {
                let cell = row.stats.iter()
                    .find(|(k, _)| k == field)
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_default();
                record.push(cell);
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_csv(&self, file_path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(file_path)?;
        self.write_to(file)
    }
}

// Turns a stored row back into an outcome. Draws were written as "A, B" against a "-".
fn row_outcome(winner: &str, loser: &str) -> Result<Outcome> {
    let unsupported = || LeagueError::UnsupportedResult(format!("{winner} / {loser}"));

    if winner.is_empty() || loser.is_empty() {
        return Err(unsupported());
    }

    if loser == NO_LOSER {
        let (home, away) = winner.split_once(", ").ok_or_else(unsupported)?;
        if home.is_empty() || away.is_empty() {
            return Err(unsupported());
        }
        return Ok(Outcome::Draw { home: home.to_string(), away: away.to_string() });
    }

    Ok(Outcome::Win { winner: winner.to_string(), loser: loser.to_string() })
}

/*
    Rebuilds the ladder from a results file written by ResultLog. Finals rows are skipped since
    they never counted towards the ladder. The ladder gets one round per distinct league round.
*/
pub fn replay_results(file_path: impl AsRef<Path>, teams: &[Team], points: PointTable) -> Result<Ladder> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &str| {
        headers.iter().position(|h| h == name).ok_or_else(|| LeagueError::MissingAttribute {
            team: "results header".to_string(),
            attribute: name.to_string(),
        })
    };
    let (round_col, winner_col, loser_col) = (column(ROUND_FIELD)?, column(WINNER_FIELD)?, column(LOSER_FIELD)?);

    let mut results = Vec::new();
    let mut rounds = HashSet::new();

    for record in reader.records() {
        let record = record?;
        let round = record.get(round_col).unwrap_or_default();
        if round.starts_with(FINALS_PREFIX) { continue; }

        let outcome = row_outcome(
            record.get(winner_col).unwrap_or_default(),
            record.get(loser_col).unwrap_or_default(),
        )?;

        rounds.insert(round.to_string());
        results.push(MatchResult { outcome, stats: Vec::new() });
    }

    let mut ladder = Ladder::new(rounds.len(), teams, points);
    for result in &results {
        ladder.record_result(result)?;
    }

    Ok(ladder)
}

pub fn format_ladder(ladder: &Ladder) -> String {
    let mut s = format!("{0:<4} {1:<20} {2:>4} {3:>4} {4:>4} {5:>6}", "", "Name", "Win", "Loss", "Draw", "Points");
    for (i, e) in ladder.sorted().iter().enumerate() {
        s += &format!("\n{0:<4} {1:<20} {2:>4} {3:>4} {4:>4} {5:>6}",
            format!("{}.", i + 1),
            e.name,
            e.wins,
            e.losses,
            e.draws,
            e.points,
        );
    }
    s
}

pub fn ladder_json(ladder: &Ladder) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ladder.sorted())?)
}
