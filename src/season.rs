use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use crate::data_loader::Team;
use crate::error::{LeagueError, Result};
use crate::fixture::*;
use crate::ladder::Ladder;
use crate::league_context::LeagueContext;
use crate::report::{ResultLog, FINALS_PREFIX};
use crate::sports::{Game, MatchResult};

/*
    Owns everything a season touches: the team table, the ladder, the results buffer, the game
    being played and the random source. Nothing is global, so two seasons can run side by side.
*/
pub struct Season {
    pub teams: Vec<Team>,
    pub fixture: Fixture,
    pub ladder: Ladder,
    pub log: ResultLog,
    game: Box<dyn Game>,
    rng: StdRng,
    context: LeagueContext,
}

impl Season {
    pub fn new(teams: Vec<Team>, game: Box<dyn Game>, context: LeagueContext) -> Result<Self> {
        if teams.is_empty() {
            return Err(LeagueError::EmptyTable);
        }

        // Checked up front so a bad bracket never throws away a played league
        if context.finals_teams != 0 && !context.finals_teams.is_power_of_two() {
            return Err(LeagueError::BracketSize(context.finals_teams));
        }

        let mut seen = HashSet::new();
        for t in &teams {
            if !seen.insert(t.name.as_str()) {
                return Err(LeagueError::DuplicateTeam(t.name.clone()));
            }
        }

        let names: Vec<String> = teams.iter().map(|t| t.name.clone()).collect();
        let fixture = round_robin(&names, context.revolutions);
        let ladder = Ladder::new(fixture.len(), &teams, context.points);

        let rng = match context.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            teams,
            fixture,
            ladder,
            log: ResultLog::new(),
            game,
            rng,
            context,
        })
    }

    pub fn team(&self, name: &str) -> Result<&Team> {
        self.teams.iter()
            .find(|t| t.name == name)
            .ok_or_else(|| LeagueError::UnknownTeam(name.to_string()))
    }

    fn team_index(&self, name: &str) -> Result<usize> {
        self.teams.iter()
            .position(|t| t.name == name)
            .ok_or_else(|| LeagueError::UnknownTeam(name.to_string()))
    }

    // Plays one match under the season's game. League matches also go on the ladder.
    pub fn play(&mut self, home: &str, away: &str, on_ladder: bool) -> Result<MatchResult> {
        let h = self.team_index(home)?;
        let a = self.team_index(away)?;
        if h == a {
            return Err(LeagueError::DuplicateTeam(home.to_string()));
        }

        let (home_team, away_team) = if h < a {
            let (left, right) = self.teams.split_at_mut(a);
            (&mut left[h], &mut right[0])
        } else {
            let (left, right) = self.teams.split_at_mut(h);
            (&mut right[0], &mut left[a])
        };

        let result = self.game.play(home_team, away_team, &mut self.rng)?;
        if result.is_draw() {
            debug!("{home} vs {away}: draw");
        } else {
            debug!("{home} vs {away}: {} wins", result.slots().0);
        }

        if on_ladder {
            self.ladder.record_result(&result)?;
        }

        Ok(result)
    }

    // Plays every round in order. Rounds are numbered from 1 in the results file.
    pub fn play_fixture(&mut self) -> Result<()> {
        let fixture = self.fixture.clone();

        for (round_idx, round) in fixture.iter().enumerate() {
            let round_label = (round_idx + 1).to_string();

            for (home, away) in round {
                let (Slot::Team(home), Slot::Team(away)) = (home, away) else {
                    debug!("Round {round_label}: bye for {}", if *home == Slot::Bye { away } else { home });
                    continue;
                };

                let result = self.play(home, away, true)?;
                self.log.store(&result, &round_label);
            }
        }

        info!("League finished after {} rounds, {} matches", fixture.len(), self.ladder.matches_recorded());
        Ok(())
    }

    /*
        Top of the ladder, put back into the order the teams were listed in. A short table gets
        the biggest bracket it can fill rather than the configured one.
    */
    pub fn finalists(&self) -> Vec<String> {
        let wanted = self.context.finals_teams;
        let available = self.ladder.entries().len();

        let count = if wanted > available {
            let fitted = 1usize << (usize::BITS - 1 - available.leading_zeros());
            warn!("Only {available} teams for {wanted} finals places, playing finals with {fitted}");
            fitted
        } else {
            wanted
        };

        let top: Vec<String> = self.ladder.top(count).into_iter().map(|e| e.name).collect();
        self.teams.iter()
            .filter(|t| top.contains(&t.name))
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn play_finals(&mut self) -> Result<String> {
        if self.context.finals_teams == 0 {
            return self.ladder.top(1).pop().map(|e| e.name).ok_or(LeagueError::EmptyTable);
        }

        let finalists = self.finalists();
        let (champion, _) = elimination(&finalists, |round, home, away| {
            let result = self.play(home, away, false)?;
            self.log.store(&result, &format!("{FINALS_PREFIX} {round}"));

            let knockout = result.knockout();
            info!("{home} vs {away}, winner: {}", knockout.advances);
            Ok(knockout)
        })?;

        Ok(champion)
    }

    pub fn simulate(&mut self) -> Result<String> {
        info!("Simulating {} with {} teams over {} revolutions", self.game.name(), self.teams.len(), self.context.revolutions);

        self.play_fixture()?;
        let champion = self.play_finals()?;

        info!("Champion: {champion}");
        Ok(champion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ladder::LadderEntry;
    use crate::sports::SportKind;

    fn seeded() -> LeagueContext {
        LeagueContext { seed: Some(11), ..LeagueContext::default() }
    }

    // Team i has strength i, so results are fully decided by strength
    fn ranked_teams(n: usize) -> Vec<Team> {
        (0..n).map(|i| Team::new(&format!("T{i}")).with("Strength", i as i64)).collect()
    }

    #[test]
    fn strongest_football_side_wins_everything() {
        let context = seeded();
        let game = SportKind::Football.game(&context).unwrap();
        let mut season = Season::new(ranked_teams(6), game, context).unwrap();

        let champion = season.simulate().unwrap();

        assert_eq!(champion, "T5");
        let leader = season.ladder.top(1).remove(0);
        assert_eq!(leader.name, "T5");
        assert_eq!(leader.wins, 10);
        assert_eq!(season.ladder.entry("T0").unwrap().points, 0);

        // 2 revolutions of 5 rounds with 3 matches each, plus 3 finals
        assert_eq!(season.ladder.matches_recorded(), 30);
        assert_eq!(season.log.rows().len(), 33);
        assert_eq!(season.log.rows().last().unwrap().round, "Finals 2");
    }

    #[test]
    fn byes_are_skipped() {
        let context = LeagueContext { finals_teams: 2, ..seeded() };
        let game = SportKind::Football.game(&context).unwrap();
        let mut season = Season::new(ranked_teams(5), game, context).unwrap();

        season.play_fixture().unwrap();

        assert_eq!(season.fixture.len(), 10);
        assert_eq!(season.ladder.matches_recorded(), 20);
        assert!(season.ladder.entries().iter().all(|e: &LadderEntry| e.played() == 8));
        assert!(season.log.rows().iter().all(|r| r.winner != BYE && r.loser != BYE));
    }

    #[test]
    fn cricket_strengthens_losers() {
        let context = seeded();
        let game = SportKind::Cricket.game(&context).unwrap();
        let mut season = Season::new(ranked_teams(4), game, context).unwrap();

        let result = season.play("T0", "T3", true).unwrap();
        assert_eq!(result.slots(), ("T3", "T0"));
        assert_eq!(season.team("T0").unwrap().strength().unwrap(), 1);
        assert_eq!(season.ladder.entry("T3").unwrap().wins, 1);
    }

    #[test]
    fn finals_need_power_of_two() {
        let context = LeagueContext { finals_teams: 3, ..seeded() };
        let game = SportKind::Football.game(&context).unwrap();

        assert!(matches!(Season::new(ranked_teams(4), game, context), Err(LeagueError::BracketSize(3))));
    }

    #[test]
    fn short_table_plays_smaller_finals() {
        let context = seeded();
        let game = SportKind::Football.game(&context).unwrap();
        let mut season = Season::new(ranked_teams(3), game, context).unwrap();

        assert_eq!(season.simulate().unwrap(), "T2");
        // 6 league matches with byes skipped, then a single final between the top two
        assert_eq!(season.log.rows().len(), 7);
        let last = season.log.rows().last().unwrap();
        assert_eq!((last.round.as_str(), last.winner.as_str(), last.loser.as_str()), ("Finals 1", "T2", "T1"));
    }

    #[test]
    fn finalists_keep_input_order() {
        let context = seeded();
        let game = SportKind::Football.game(&context).unwrap();
        let mut season = Season::new(ranked_teams(4), game, context).unwrap();
        season.play_fixture().unwrap();

        let ladder: Vec<String> = season.ladder.top(4).into_iter().map(|e| e.name).collect();
        assert_eq!(ladder, vec!["T3", "T2", "T1", "T0"]);
        assert_eq!(season.finalists(), vec!["T0", "T1", "T2", "T3"]);

        season.context.finals_teams = 2;
        assert_eq!(season.finalists(), vec!["T2", "T3"]);
    }

    #[test]
    fn no_finals_crowns_ladder_leader() {
        let context = LeagueContext { finals_teams: 0, ..seeded() };
        let game = SportKind::Football.game(&context).unwrap();
        let mut season = Season::new(ranked_teams(4), game, context).unwrap();

        assert_eq!(season.simulate().unwrap(), "T3");
    }

    #[test]
    fn bad_team_lists_are_rejected() {
        let context = seeded();
        assert!(matches!(
            Season::new(Vec::new(), SportKind::Football.game(&context).unwrap(), context.clone()),
            Err(LeagueError::EmptyTable)
        ));

        let twins = vec![Team::new("A"), Team::new("A")];
        assert!(matches!(
            Season::new(twins, SportKind::Football.game(&context).unwrap(), context.clone()),
            Err(LeagueError::DuplicateTeam(_))
        ));

        let mut season = Season::new(ranked_teams(2), SportKind::Football.game(&context).unwrap(), context).unwrap();
        assert!(matches!(season.play("T0", "T9", false), Err(LeagueError::UnknownTeam(_))));
    }
}
