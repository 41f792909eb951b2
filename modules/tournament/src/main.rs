use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use tournament::{
    Match, Opponent, PairingOperator, ParticipantId, Roster, Standing, SwissConfig, Tournament,
    TournamentError,
};

/// Simulate a tournament with random results and print each round.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Participant names
    names: Vec<String>,

    /// File with one participant name per line
    #[arg(long)]
    names_file: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for pairing and simulated results
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of rounds
    #[arg(long)]
    rounds: Option<u32>,
}

/// Fallback operator: one bracket with everyone still unplaced, in
/// standings order.
struct WholeFieldOperator;

impl PairingOperator for WholeFieldOperator {
    fn next_member(&mut self, roster: &Roster, unplaced: &[ParticipantId]) -> Option<String> {
        unplaced.first().map(|id| roster.name_of(*id).to_string())
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), TournamentError> {
    let mut config = match &args.config {
        Some(path) => SwissConfig::from_json_file(path)?,
        None => SwissConfig::default(),
    };
    if args.rounds.is_some() {
        config.total_rounds = args.rounds;
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut names = args.names.clone();
    if let Some(path) = &args.names_file {
        let contents = std::fs::read_to_string(path)?;
        names.extend(contents.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from));
    }

    let mut tournament = Tournament::new(config);
    for name in &names {
        tournament.add_participant(name)?;
    }
    tournament.shuffle_seating(&mut rng);
    println!("Number of rounds: {}", tournament.total_rounds());

    while !tournament.is_finished() {
        let number = tournament.start_round(&mut rng, &mut WholeFieldOperator)?.number;
        let open: Vec<String> = tournament
            .current_round()
            .map(|round| {
                round
                    .matches
                    .iter()
                    .filter(|m| !m.is_completed())
                    .map(|m| tournament.roster().name_of(m.player1).to_string())
                    .collect()
            })
            .unwrap_or_default();

        for name in open {
            let (games, other, draws) = random_score(&mut rng);
            tournament.report(&name, games, other, draws)?;
        }

        println!("Round {}:", number);
        if let Some(round) = tournament.current_round() {
            for m in &round.matches {
                println!("  {}", format_match(tournament.roster(), m));
            }
        }
    }

    println!("Final standings:");
    for standing in tournament.standings() {
        println!("  {}", format_standing(&standing));
    }
    println!("Tournament complete!");
    Ok(())
}

fn random_score<R: Rng + ?Sized>(rng: &mut R) -> (u32, u32, u32) {
    match rng.gen_range(0..6) {
        0 => (2, 0, 0),
        1 => (2, 1, 0),
        2 => (1, 2, 0),
        3 => (0, 2, 0),
        4 => (1, 1, 1),
        _ => (1, 0, 1),
    }
}

fn format_match(roster: &Roster, m: &Match) -> String {
    let player2 = match m.player2 {
        Opponent::Player(id) => roster.name_of(id),
        Opponent::Bye => "bye",
    };
    format!(
        "{} {} vs. {} {}, {} draws",
        roster.name_of(m.player1),
        m.p1_wins(),
        player2,
        m.p2_wins(),
        m.draws()
    )
}

fn format_standing(s: &Standing) -> String {
    format!(
        "{}: {}-{}-{}{}; OMW: {:.2}, GWP: {:.2}, OGWP: {:.2}",
        s.name,
        s.wins,
        s.losses,
        s.draws,
        if s.dropped { " drop" } else { "" },
        s.opponent_match_win,
        s.game_win_percentage,
        s.opponent_game_win
    )
}
