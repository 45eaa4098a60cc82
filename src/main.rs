use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use agent_2048::engine::{BoardSnapshot, Grid};
use agent_2048::expectimax::{Expectimax, ExpectimaxConfig, Tiering, DEFAULT_DEPTH};
use agent_2048::simulator::Simulator;
use anyhow::Context;
use clap::{Parser, Subcommand};
use flexi_logger::{opt_format, Logger, LoggerHandle};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};

#[derive(Parser, Debug)]
#[command(name = "agent-2048", version, about = "Play or advise 2048 with an Expectimax agent")]
struct Cli {
    /// Search depth in plies
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH)]
    depth: u32,
    /// Match smoothness tiers against each line's length
    #[arg(long, global = true)]
    length_tiers: bool,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Play a full game from two random tiles (default)
    Play {
        /// RNG seed for tile spawns (thread entropy when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many moves
        #[arg(long)]
        steps: Option<u64>,
        /// Stop once this tile value appears
        #[arg(long)]
        stop_tile: Option<u32>,
        /// Print the board after every move
        #[arg(long)]
        show_board: bool,
        /// Suppress the status spinner
        #[arg(short, long)]
        quiet: bool,
    },
    /// Select a move for a board read from a JSON snapshot
    Pick {
        /// Path to {"size":4,"cells":[[2,null,...],...]}
        #[arg(short, long, value_name = "FILE")]
        board: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let _logger = init_logging()?;
    let cli = Cli::parse();
    let cfg = ExpectimaxConfig {
        depth: cli.depth,
        tiering: if cli.length_tiers { Tiering::SequenceLength } else { Tiering::Reference },
        ..Default::default()
    };
    let mut policy = Expectimax::with_config(cfg);

    match cli.cmd {
        Some(Cmd::Pick { board }) => pick(&mut policy, &board),
        Some(Cmd::Play { seed, steps, stop_tile, show_board, quiet }) => {
            play(&mut policy, seed, steps, stop_tile, show_board, quiet)
        }
        None => play(&mut policy, None, None, None, false, false),
    }
}

fn init_logging() -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("info")?
        .log_to_stderr()
        .format(opt_format)
        .start()?;
    Ok(handle)
}

fn pick(policy: &mut Expectimax, path: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let snapshot: BoardSnapshot =
        serde_json::from_str(&text).with_context(|| format!("parsing board {}", path.display()))?;
    let grid = Grid::try_from_snapshot(&snapshot)?;
    println!("{}", grid);
    for branch in policy.branch_evals(&snapshot) {
        if branch.legal {
            println!("{:>5}: {:.1}", branch.dir.to_string(), branch.ev);
        } else {
            println!("{:>5}: illegal", branch.dir.to_string());
        }
    }
    match policy.best_move(&snapshot) {
        Some(dir) => println!("best move: {}", dir),
        None => println!("no legal move"),
    }
    Ok(())
}

fn play(
    policy: &mut Expectimax,
    seed: Option<u64>,
    steps: Option<u64>,
    stop_tile: Option<u32>,
    show_board: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let mut game = Simulator::new(&BoardSnapshot::empty());
    game.spawn_random_tile(&mut rng);
    game.spawn_random_tile(&mut rng);
    if show_board {
        println!("{}", game.grid());
    }

    let pb = if quiet || show_board {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | Moves: {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let mut move_count: u64 = 0;
    let mut total_states: u64 = 0;
    while !game.grid().is_game_over() {
        let Some(direction) = policy.best_move(&game.snapshot()) else { break };
        if !game.apply_move(direction) {
            log::warn!("selected {direction} did not change the board");
            break;
        }
        game.spawn_random_tile(&mut rng);
        move_count += 1;
        total_states = total_states.saturating_add(policy.last_stats().nodes);

        if show_board {
            println!("{}", game.grid());
        }
        if let Some(pb) = &pb {
            let rate = move_count as f64 / start.elapsed().as_secs_f64().max(1e-6);
            pb.set_message(format!("{} | moves/sec: {:.1} | score: {}", move_count, rate, game.score()));
        }
        if stop_tile.is_some_and(|t| game.grid().highest_tile() >= t) {
            break;
        }
        if steps.is_some_and(|limit| move_count >= limit) {
            break;
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    log::info!("game finished after {:.1}s", start.elapsed().as_secs_f64());
    println!(
        "Moves made: {}, Score: {}, Highest tile: {}, States considered: {}, Max states considered for a move: {}",
        move_count,
        game.score(),
        game.grid().highest_tile(),
        total_states,
        policy.last_stats().peak_nodes
    );
    Ok(())
}
