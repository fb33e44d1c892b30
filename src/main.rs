mod data_loader;
mod error;
mod fixture;
mod ladder;
mod league_context;
mod report;
mod season;
mod sports;
mod util;

use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use data_loader::*;
use error::Result;
use fixture::*;
use league_context::*;
use report::*;
use season::*;
use sports::*;

/*
    Runs a league season from a team table: round robin for the ladder, then a knockout between
    the top of the ladder. Settings come from an optional JSON file, and flags win over the file.
*/
#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Sports league simulator: fixtures, ladder and finals", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a full season and write the results file
    Season {
        /// Team CSV with a Name column
        teams: PathBuf,
        #[arg(long, value_enum, default_value = "football")]
        sport: SportKind,
        /// JSON settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Times each team meets every other team
        #[arg(long)]
        revolutions: Option<usize>,
        /// Teams that go through to the finals
        #[arg(long)]
        finals: Option<usize>,
        /// Seed for reproducible seasons
        #[arg(long)]
        seed: Option<u64>,
        /// Results CSV path
        #[arg(short, long)]
        out: Option<String>,
        /// Print the ladder as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the round robin fixture for a team table
    Fixture {
        teams: PathBuf,
        #[arg(long, default_value = "1")]
        revolutions: usize,
    },
    /// Build a team table from rows, first row being the header, and save it
    Teams {
        /// Comma separated row, repeat for each team
        #[arg(long = "row", required = true)]
        rows: Vec<String>,
        #[arg(long, value_enum, default_value = "football")]
        sport: SportKind,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Rebuild the ladder from a results file
    Ladder {
        results: PathBuf,
        teams: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_context(path: Option<&Path>) -> Result<LeagueContext> {
    match path {
        Some(p) => LeagueContext::load(p),
        None => Ok(LeagueContext::default()),
    }
}

fn run_season(
    teams_path: &Path,
    sport: SportKind,
    context: LeagueContext,
    json: bool,
) -> Result<()> {
    let teams = load_teams(teams_path)?;
    info!("Loaded {} teams from {}", teams.len(), teams_path.display());

    let game = sport.game(&context)?;
    let output_path = context.output_path.clone();

    let mut season = Season::new(teams, game, context)?;
    let outcome = season.simulate();

    // Whatever got played is kept, even when the finals fall over
    season.log.write_csv(&output_path)?;
    info!("Wrote {} results to {}", season.log.rows().len(), output_path);
    let champion = outcome?;

    if json {
        println!("{}", ladder_json(&season.ladder)?);
    } else {
        println!("{}", format_ladder(&season.ladder));
    }
    println!("\nChampion: {champion}");

    Ok(())
}

fn print_fixture(teams_path: &Path, revolutions: usize) -> Result<()> {
    let names: Vec<String> = load_teams(teams_path)?.into_iter().map(|t| t.name).collect();

    for (i, round) in round_robin(&names, revolutions).iter().enumerate() {
        let matches: Vec<String> = round.iter().map(|(a, b)| format!("{a} vs {b}")).collect();
        println!("Round {0:3} | {1}", i + 1, matches.join(" | "));
    }

    Ok(())
}

fn build_team_table(rows: &[String], sport: SportKind, out: &Path) -> Result<()> {
    let table: Vec<Vec<String>> = rows.iter()
        .map(|r| r.split(',').map(|c| c.trim().to_string()).collect())
        .collect();

    let teams = teams_from_table(table)?;
    let game = sport.game(&LeagueContext::default())?;
    check_parameters(game.as_ref(), &teams)?;

    save_teams(out, &teams)?;
    info!("Saved {} {} teams to {}", teams.len(), game.name(), out.display());
    Ok(())
}

fn show_ladder(results: &Path, teams_path: &Path, context: &LeagueContext) -> Result<()> {
    let teams = load_teams(teams_path)?;
    let ladder = replay_results(results, &teams, context.points)?;
    println!("{}", format_ladder(&ladder));
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Season { teams, sport, config, revolutions, finals, seed, out, json } => {
            load_context(config.as_deref()).and_then(|mut context| {
                if let Some(r) = revolutions { context.revolutions = r; }
                if let Some(f) = finals { context.finals_teams = f; }
                if seed.is_some() { context.seed = seed; }
                if let Some(o) = out { context.output_path = o; }
                run_season(&teams, sport, context, json)
            })
        }
        Commands::Fixture { teams, revolutions } => print_fixture(&teams, revolutions),
        Commands::Teams { rows, sport, out } => build_team_table(&rows, sport, &out),
        Commands::Ladder { results, teams, config } => {
            load_context(config.as_deref()).and_then(|context| show_ladder(&results, &teams, &context))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
