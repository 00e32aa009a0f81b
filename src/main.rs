use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Stdin, Write};
use std::path::PathBuf;

use connect4_minimax::{
    arena::{self, ArenaConfig},
    board::Token,
    game::{Game, GameState},
    history, persist,
    player::{self, Player, SearchConfig, TokenRegistry, AI_NAME},
    DEFAULT_DEPTH,
};

mod display;

#[derive(Parser)]
#[command(name = "connect4_minimax")]
#[command(about = "Connect 4 against a minimax opponent")]
struct Cli {
    /// Search depth of the AI player
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// File a game in progress is saved to and resumed from
    #[arg(long, default_value = persist::SAVE_PATH)]
    save: PathBuf,

    /// File holding the tally of past winners
    #[arg(long, default_value = history::HISTORY_PATH)]
    history: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play an interactive game (the default)
    Play,
    /// Pit two search depths against each other
    Arena {
        #[arg(long, default_value_t = 3)]
        first_depth: u32,
        #[arg(long, default_value_t = 6)]
        second_depth: u32,
        #[arg(long, default_value_t = 20)]
        games: usize,
        /// Random plies played before the engines take over
        #[arg(long, default_value_t = 2)]
        opening_moves: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        &Some(Command::Arena {
            first_depth,
            second_depth,
            games,
            opening_moves,
            seed,
        }) => run_arena(ArenaConfig {
            first_depth,
            second_depth,
            games,
            opening_moves,
            seed,
        }),
        Some(Command::Play) | None => play(&cli),
    }
}

fn prompt(stdin: &Stdin, message: &str) -> Result<String> {
    print!("{}", message);
    stdout().flush()?;

    let mut buffer = String::new();
    if stdin.read_line(&mut buffer)? == 0 {
        return Err(anyhow!("input closed"));
    }
    Ok(buffer.trim().to_string())
}

fn ask_yes_no(stdin: &Stdin, question: &str) -> Result<bool> {
    loop {
        let answer = prompt(stdin, &format!("{} y/n: ", question))?;
        match answer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn ask_name(stdin: &Stdin, message: &str) -> Result<String> {
    loop {
        let name = prompt(stdin, message)?;
        match player::check_name(&name) {
            Ok(()) => return Ok(name),
            Err(err) => println!("{}", err),
        }
    }
}

fn ask_token(stdin: &Stdin, registry: &mut TokenRegistry, name: &str) -> Result<Token> {
    loop {
        let answer = prompt(stdin, &format!("Token for {} (a non-zero number): ", name))?;
        match answer.parse::<i32>() {
            Err(_) => println!("Invalid number: {}", answer),
            Ok(value) => match registry.claim(value) {
                Ok(token) => return Ok(token),
                Err(err) => println!("{}", err),
            },
        }
    }
}

fn setup(stdin: &Stdin, ai: SearchConfig) -> Result<Game> {
    // the registry lives only as long as this setup
    let mut registry = TokenRegistry::new();

    let name = ask_name(stdin, "Player 1 name: ")?;
    let token = ask_token(stdin, &mut registry, &name)?;
    let first = Player::human(name, token);

    let second = if ask_yes_no(stdin, "Is player 2 AI controlled?")? {
        let token = ask_token(stdin, &mut registry, AI_NAME)?;
        Player::scripted(token, ai)
    } else {
        let name = ask_name(stdin, "Player 2 name: ")?;
        let token = ask_token(stdin, &mut registry, &name)?;
        Player::human(name, token)
    };

    let players = if ask_yes_no(stdin, &format!("Does {} move first?", first.name))? {
        [first, second]
    } else {
        [second, first]
    };
    Ok(Game::new(players)?)
}

fn play(cli: &Cli) -> Result<()> {
    let stdin = stdin();
    let ai = SearchConfig::with_depth(cli.depth);

    println!("Welcome to Connect 4\n");

    let mut game = match persist::load(&cli.save, ai)? {
        Some(saved) if ask_yes_no(&stdin, "A saved game was found, resume it?")? => {
            Game::from_saved(saved)?
        }
        _ => setup(&stdin, ai)?,
    };
    let first = game.players()[0].token;

    // game loop
    loop {
        display::draw(game.board(), first)?;

        match game.state() {
            GameState::Playing => {
                let player = game.current().clone();
                let column = if player.is_scripted() {
                    println!("AI is thinking...");
                    stdout().flush()?;

                    let (position, value) = game
                        .engine_move()
                        .ok_or_else(|| anyhow!("no legal move left for the AI"))?;
                    println!("Best move: {} (value {})", position.column + 1, value);
                    position.column
                } else {
                    let input = prompt(
                        &stdin,
                        &format!("{} ({}) move input, 's' to save and quit > ", player.name, player.token),
                    )?;
                    if input.eq_ignore_ascii_case("s") {
                        persist::save(&cli.save, &game.to_saved())?;
                        println!("Game saved to {}", cli.save.display());
                        return Ok(());
                    }
                    match input.parse::<usize>() {
                        Ok(column) if column >= 1 => column - 1,
                        _ => {
                            println!("Invalid number: {}", input);
                            continue;
                        }
                    }
                };

                if let Err(err) = game.play_checked(column) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::Won(_) => {
                let name = game
                    .winner()
                    .map(|player| player.name.clone())
                    .ok_or_else(|| anyhow!("the winning token belongs to no player"))?;
                println!("{} wins!", name);
                record_result(cli, Some(name.as_str()))?;
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                record_result(cli, None)?;
                break;
            }
        }
    }

    // a finished game is not resumed
    persist::remove(&cli.save)?;
    Ok(())
}

/// Adds a finished game to the history file, `None` records a draw
fn record_result(cli: &Cli, winner: Option<&str>) -> Result<()> {
    let mut history = history::load(&cli.history)?;
    match winner {
        Some(name) => {
            history.record(name);
            println!("{} has now won {} game(s)", name, history.wins(name));
        }
        None => {
            history.record_draw();
            println!("{} game(s) drawn so far", history.draws());
        }
    }
    history::save(&cli.history, &history)?;

    println!("\nResults so far:");
    for (name, wins) in history.entries() {
        println!("  {} : {}", name, wins);
    }
    Ok(())
}

fn run_arena(config: ArenaConfig) -> Result<()> {
    let progress = ProgressBar::new(config.games as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let results = arena::run(&config, &progress)?;

    println!(
        "Depth {} (first) vs depth {} (second) over {} games",
        config.first_depth,
        config.second_depth,
        results.total()
    );
    println!("  depth {} wins: {}", config.first_depth, results.first_wins);
    println!("  depth {} wins: {}", config.second_depth, results.second_wins);
    println!("  draws: {}", results.draws);
    Ok(())
}
