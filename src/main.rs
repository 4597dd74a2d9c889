use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use othello_engine::arena::Arena;
use othello_engine::console::*;
use othello_engine::*;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "othello", version, about = "Othello in the terminal, against people or the computer")]
struct Cli {
    /// Only print what is necessary
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play one game. Each side is human, random or greedy.
    Play {
        #[arg(long, default_value = "human")]
        one: PlayerKind,
        #[arg(long, default_value = "greedy")]
        two: PlayerKind,
        /// Seed for random players; picked at random if absent
        #[arg(long)]
        seed: Option<u64>,
        /// Start from a saved game
        #[arg(long)]
        load: Option<PathBuf>,
    },
    /// Let two computer players play many games against each other.
    Compare {
        first: PlayerKind,
        second: PlayerKind,
        #[arg(long, default_value_t = 100)]
        games: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Round robin between the computer players, with Elo ratings.
    Tournament {
        #[arg(long, default_value_t = 50)]
        games: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

const HELP: &str = "Enter a square such as d3 (column letter, row number) or a row and a \
column as two digits counted from zero, e.g. 2 3. Other commands: moves lists the legal \
squares, undo and redo step through the game, reset starts over, save <file> and load \
<file> store and restore the position, help shows this text and quit leaves.";

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Move(Coord),
    Moves,
    Undo,
    Redo,
    Reset,
    Save(PathBuf),
    Load(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
enum CommandError {
    #[error("nothing entered")]
    Empty,
    #[error("{0} needs a file name")]
    MissingPath(&'static str),
    #[error("'{0}' is not a square or a command, type help for a list")]
    Unknown(String),
}

impl FromStr for Input {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(first) = words.next() else {
            return Err(CommandError::Empty);
        };
        let rest: Vec<_> = words.collect();

        let path = |command| match rest.as_slice() {
            [] => Err(CommandError::MissingPath(command)),
            words => Ok(PathBuf::from(words.join(" "))),
        };

        match first.to_lowercase().as_str() {
            "moves" => Ok(Input::Moves),
            "undo" | "u" => Ok(Input::Undo),
            "redo" | "r" => Ok(Input::Redo),
            "reset" | "restart" => Ok(Input::Reset),
            "save" => Ok(Input::Save(path("save")?)),
            "load" => Ok(Input::Load(path("load")?)),
            "help" | "?" => Ok(Input::Help),
            "quit" | "exit" | "q" => Ok(Input::Quit),
            _ => {
                if let Ok(mv) = first.parse::<Coord>() {
                    if rest.is_empty() {
                        return Ok(Input::Move(mv));
                    }
                }

                match (first.parse::<isize>(), rest.as_slice()) {
                    (Ok(row), [col]) => match col.parse::<isize>() {
                        Ok(col) => Ok(Input::Move(Coord::new(row, col))),
                        Err(_) => Err(CommandError::Unknown(s.trim().to_owned())),
                    },
                    _ => Err(CommandError::Unknown(s.trim().to_owned())),
                }
            }
        }
    }
}

fn status(game: &Game) -> String {
    let score = format!(
        "X: {}  O: {}",
        game.count_tokens(Tile::X),
        game.count_tokens(Tile::O)
    );

    let turn = if game.is_game_over() {
        match game.winner() {
            Tile::Empty => "Game over, it's a tie".to_owned(),
            winner => format!("Game over, {winner} wins"),
        }
    } else {
        format!("{} to move", game.whos_turn())
    };

    format!("{score}  |  {turn}  |  move {}", game.moves())
}

fn render(game: &Game) -> String {
    let mut out = game.board().to_string();

    if let Some(last) = game.last_move() {
        let previous = game.previous_board();
        let changed = Coord::board_iter()
            .filter(|&place| game.board().get(place) != previous.get(place))
            .count();

        out.push_str(&format!("last move {last}, {} flipped\n", changed.saturating_sub(1)));
    }

    out.push_str(&status(game));
    out
}

fn play(kinds: [PlayerKind; 2], seed: u64, load: Option<PathBuf>, console: &Console) -> anyhow::Result<()> {
    let mut game = Match::from_kinds(0, kinds, seed);

    if let Some(path) = load {
        let snapshot = save::load(&path).with_context(|| format!("loading {}", path.display()))?;
        game.load(snapshot, console)?;
    }

    console.info(&format!("X: {}, O: {}, seed {seed}", kinds[0], kinds[1]));

    if !game.has_human() {
        if game.run(console) == Progress::Stuck {
            bail!("a computer player offered no move");
        }
        console.print(&render(&game.game));
        return Ok(());
    }

    console.print_wrapped(HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if game.run(console) == Progress::Stuck {
            bail!("a computer player offered no move");
        }

        console.print(&render(&game.game));

        let Some(line) = lines.next() else {
            return Ok(());
        };

        let input = match line?.parse::<Input>() {
            Ok(input) => input,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                console.warn(&err.to_string());
                continue;
            }
        };

        match input {
            Input::Move(mv) => {
                if !game.submit(mv) {
                    console.warn("It is not a human's turn");
                }
            }
            Input::Moves => {
                let moves: Vec<_> = game.game.valid_moves().iter().map(Coord::move_string).collect();
                console.print(&format!("Legal squares: {}", moves.join(" ")));
            }
            Input::Undo => {
                if !game.undo_to_human(console) {
                    console.warn("Nothing to undo");
                }
            }
            Input::Redo => {
                if !game.redo(console) {
                    console.warn("Nothing to redo");
                }
            }
            Input::Reset => game.reset(console),
            Input::Save(path) => match save::save(&path, &game.game) {
                Ok(()) => console.info(&format!("Saved to {}", path.display())),
                Err(err) => console.warn(&err.to_string()),
            },
            Input::Load(path) => match save::load(&path) {
                Ok(snapshot) => {
                    if let Err(err) = game.load(snapshot, console) {
                        console.warn(&err.to_string());
                    }
                }
                Err(err) => console.warn(&err.to_string()),
            },
            Input::Help => console.print_wrapped(HELP),
            Input::Quit => return Ok(()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let level = if cli.quiet { Level::Necessary } else { Level::Info };
    let console = Console::new(level);

    match cli.command.unwrap_or(Mode::Play {
        one: PlayerKind::Human,
        two: PlayerKind::Greedy,
        seed: None,
        load: None,
    }) {
        Mode::Play { one, two, seed, load } => {
            play([one, two], seed.unwrap_or_else(rand::random), load, &console)?;
        }
        Mode::Compare {
            first,
            second,
            games,
            seed,
        } => {
            let mut arena = Arena::compare([first, second], games, seed, console)?;
            let standings = arena.run()?;
            arena.print_standings(&standings);
        }
        Mode::Tournament { games, seed } => {
            let kinds: Vec<_> = PlayerKind::ALL
                .into_iter()
                .filter(|kind| kind.is_automated())
                .collect();
            let mut arena = Arena::tournament(&kinds, games, seed, console)?;
            let standings = arena.run()?;
            arena.print_standings(&standings);
        }
    }

    Ok(())
}
