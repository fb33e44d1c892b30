use std::fmt;
use crate::error::{LeagueError, Result};

pub const BYE: &str = "BYE";

// One side of a pairing. A Bye pads out leagues with an odd number of teams.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    Team(String),
    Bye,
}

impl Slot {
    pub fn name(&self) -> &str {
        match self {
            Slot::Team(name) => name,
            Slot::Bye => BYE,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub type Pairing = (Slot, Slot);
pub type Round = Vec<Pairing>;
pub type Fixture = Vec<Round>;

// Splits the list into two halves and zips the first with the reversed second.
// 1 2 3
// 6 5 4  =>  (1, 6), (2, 5), (3, 4)
pub fn loop_matches<T: Clone>(list: &[T]) -> Vec<(T, T)> {
    let half = list.len() / 2;
    list[..half].iter()
        .cloned()
        .zip(list[half..].iter().rev().cloned())
        .collect()
}

// Rotates everything but the first entry by one.
// 1 2 3 4 5 6 => 1 6 2 3 4 5
pub fn rotate_except_first<T>(list: &mut [T]) {
    if list.len() > 2 {
        list[1..].rotate_right(1);
    }
}

/*
    Circle method round robin. Team 0 stays put, the rest rotate around it, so each revolution
    of n - 1 rounds has every team meet every other team exactly once. Odd leagues get a BYE
    so that one team sits out each round.
*/
pub fn round_robin(teams: &[String], revolutions: usize) -> Fixture {
    let mut slots: Vec<Slot> = teams.iter().cloned().map(Slot::Team).collect();

    if slots.len() < 2 {
        return Vec::new();
    }

    if slots.len() % 2 != 0 {
        slots.push(Slot::Bye);
    }

    let rounds_per_revolution = slots.len() - 1;
    let mut rounds = Vec::with_capacity(rounds_per_revolution * revolutions);

    for _ in 0..revolutions {
        for _ in 0..rounds_per_revolution {
            rounds.push(loop_matches(&slots));
            rotate_except_first(&mut slots);
        }
    }

    rounds
}

pub fn elimination_rounds(team_count: usize) -> Result<usize> {
    if !team_count.is_power_of_two() {
        return Err(LeagueError::BracketSize(team_count));
    }
    Ok(team_count.trailing_zeros() as usize)
}

// What a knockout match hands back: who goes through and who goes home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Knockout {
    pub advances: String,
    pub eliminated: String,
}

/*
    Single elimination. First seed plays last seed, second plays second last and so on. Losers
    are dropped and the survivors keep their seeding order for the next round. The play closure
    receives the 1-based round number along with both team names.
    Returns the champion and the pairings of every round that was played.
*/
pub fn elimination<F>(teams: &[String], mut play: F) -> Result<(String, Vec<Vec<(String, String)>>)>
where
    F: FnMut(usize, &str, &str) -> Result<Knockout>,
{
    let number_of_rounds = elimination_rounds(teams.len())?;
    let mut remaining = teams.to_vec();
    let mut played = Vec::with_capacity(number_of_rounds);

    for round_idx in 0..number_of_rounds {
        let matches = loop_matches(&remaining);

        for (home, away) in &matches {
            let knockout = play(round_idx + 1, home.as_str(), away.as_str())?;
            if knockout.eliminated != *home && knockout.eliminated != *away {
                return Err(LeagueError::UnknownTeam(knockout.eliminated));
            }
            remaining.retain(|t| *t != knockout.eliminated);
        }

        played.push(matches);
    }

    // Guaranteed by the power-of-two check, one team is left after log2(n) halvings
    let champion = remaining.swap_remove(0);
    Ok((champion, played))
}
