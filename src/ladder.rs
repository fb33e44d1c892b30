use serde::*;
use crate::data_loader::Team;
use crate::error::{LeagueError, Result};
use crate::league_context::PointTable;
use crate::sports::{MatchResult, Outcome};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct LadderEntry {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: u32,
}

impl LadderEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            wins: 0,
            losses: 0,
            draws: 0,
            points: 0,
        }
    }

    pub fn played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }
}

// Entries stay in insertion order. Sorting only ever happens on copies handed out by sorted() and top().
#[derive(Debug, Clone)]
pub struct Ladder {
    pub rounds: usize,
    pub points: PointTable,
    entries: Vec<LadderEntry>,
}

impl Ladder {
    pub fn new(rounds: usize, teams: &[Team], points: PointTable) -> Self {
        let mut ladder = Self { rounds, points, entries: Vec::new() };
        ladder.initialize(teams.iter().map(|t| t.name.as_str()));
        ladder
    }

    // Blank ladder with an entry for each team
    pub fn initialize<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.entries = names.into_iter().map(LadderEntry::new).collect();
    }

    pub fn entries(&self) -> &[LadderEntry] {
        &self.entries
    }

    pub fn record_result(&mut self, result: &MatchResult) -> Result<()> {
        let (first, second) = result.slots();
        if first == second {
            return Err(LeagueError::DuplicateTeam(first.to_string()));
        }

        match &result.outcome {
            Outcome::Win { winner, loser } => {
                // Look both up first so a bad name leaves the ladder untouched
                let w = self.checked_index(winner)?;
                let l = self.checked_index(loser)?;
                self.record_win(w);
                self.record_loss(l);
            }
            Outcome::Draw { home, away } => {
                let h = self.checked_index(home)?;
                let a = self.checked_index(away)?;
                self.record_draw(h);
                self.record_draw(a);
            }
        }
        Ok(())
    }

    pub fn team_index(&self, name: &str) -> Result<usize> {
        self.entries.iter()
            .position(|e| e.name == name)
            .ok_or_else(|| LeagueError::UnknownTeam(name.to_string()))
    }

    pub fn entry(&self, name: &str) -> Result<&LadderEntry> {
        Ok(&self.entries[self.team_index(name)?])
    }

    // A team can't have more results than there are rounds in the season.
    fn checked_index(&self, name: &str) -> Result<usize> {
        let idx = self.team_index(name)?;
        if self.entries[idx].played() as usize >= self.rounds {
            return Err(LeagueError::TooManyResults { team: name.to_string(), rounds: self.rounds });
        }
        Ok(idx)
    }

    fn record_win(&mut self, idx: usize) {
        self.entries[idx].wins += 1;
        self.entries[idx].points += self.points.win;
    }

    fn record_loss(&mut self, idx: usize) {
        self.entries[idx].losses += 1;
        self.entries[idx].points += self.points.loss;
    }

    fn record_draw(&mut self, idx: usize) {
        self.entries[idx].draws += 1;
        self.entries[idx].points += self.points.draw;
    }

    // Points descending. sort_by is stable, so level teams keep their insertion order.
    pub fn sorted(&self) -> Vec<LadderEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.points.cmp(&a.points));
        sorted
    }

    pub fn top(&self, n: usize) -> Vec<LadderEntry> {
        let mut sorted = self.sorted();
        sorted.truncate(n);
        sorted
    }

    pub fn matches_recorded(&self) -> u32 {
        let appearances: u32 = self.entries.iter().map(LadderEntry::played).sum();
        appearances / 2
    }
}
