//! Wrap-Go: Go on tori, cylinders, Möbius strips and Klein bottles.
//!
//! ## Usage
//!
//! - `wrap-go` - Show a demo game on a torus
//! - `wrap-go serve` - Read protocol commands from stdin
//! - `wrap-go demo --topology klein --width 7 --height 5` - Demo on another board

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wrap_go::constants::{DEFAULT_HEIGHT, DEFAULT_WIDTH, DEMO_MOVES, DEMO_SEED};
use wrap_go::engine::RulesEngine;
use wrap_go::protocol::Session;
use wrap_go::topology::TopologyKind;

/// Wrap-Go: the rules of Go on wrapped boards
#[derive(Parser)]
#[command(name = "wrap-go")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter, e.g. `debug` or `wrap_go=trace`. `RUST_LOG` is used if unset.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the text protocol on stdin/stdout
    Serve,
    /// Play a random game and print the result
    Demo(DemoArgs),
}

#[derive(clap::Args)]
struct DemoArgs {
    /// Board topology: torus, cylinder, mobius or klein
    #[arg(long, default_value = "torus")]
    topology: TopologyKind,
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,
    /// Number of moves to play
    #[arg(long, default_value_t = DEMO_MOVES)]
    moves: usize,
    /// Seed for the random move choice
    #[arg(long, default_value_t = DEMO_SEED)]
    seed: u64,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            topology: TopologyKind::Torus,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            moves: DEMO_MOVES,
            seed: DEMO_SEED,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    match cli.command {
        Some(Commands::Serve) => {
            let stdin = io::stdin();
            Session::new().run(stdin.lock(), io::stdout())
        }
        Some(Commands::Demo(args)) => run_demo(&args),
        None => run_demo(&DemoArgs::default()),
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_demo(args: &DemoArgs) -> Result<()> {
    let mut engine = RulesEngine::new(args.topology, args.width, args.height)
        .context("creating demo board")?;
    let mut rng = fastrand::Rng::with_seed(args.seed);

    println!(
        "Wrap-Go: {} {}x{}, {} random moves\n",
        args.topology, args.width, args.height, args.moves
    );

    for _ in 0..args.moves {
        let legal = engine.legal_moves();
        if legal.is_empty() {
            println!("No legal moves left for {}", engine.turn());
            break;
        }
        let c = legal[rng.usize(..legal.len())];
        engine.play(c);
    }

    let prisoners = engine.prisoners_taken_by();
    println!("{}", engine.grid());
    println!("Moves played: {}", engine.move_count());
    println!("To move: {}", engine.turn());
    println!(
        "Prisoners taken by black: {}, by white: {}",
        prisoners.black, prisoners.white
    );
    let axes = engine.topology().extend_axes();
    println!("Wraps along x: {}, y: {}", axes.x, axes.y);
    Ok(())
}
