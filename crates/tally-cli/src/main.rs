//! CLI frontend for the Tally check resolution engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tally",
    about = "Tally: roll and resolve success-counting dice pool checks",
    version,
    propagate_version = true
)]
struct Cli {
    /// RNG seed; the same seed replays the same rolls
    #[arg(long, global = true, default_value = "42")]
    seed: u64,

    /// JSON file overriding success thresholds, botch face and margin bands
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options for subcommands that roll a single pool.
#[derive(Args)]
struct PoolArgs {
    /// Base pool size (attribute dice)
    #[arg(short, long, value_parser = dice_count())]
    pool: u32,

    /// Die size: d4, d6, d8 or d10
    #[arg(long, default_value = "d10")]
    die: String,

    /// Skill rank; each rank adds one die
    #[arg(short, long, default_value = "0", value_parser = dice_count())]
    skill: u32,

    /// Difficulty class (successes needed)
    #[arg(long, default_value = "0")]
    dc: u32,

    /// Modifier as `category:dice:dc[:duration]`, e.g. `equipment:+2:0`
    #[arg(short, long = "mod", allow_hyphen_values = true)]
    mods: Vec<String>,

    /// Roll twice and keep the better result
    #[arg(long, conflicts_with = "disadvantage")]
    advantage: bool,

    /// Roll twice and keep the worse result
    #[arg(long)]
    disadvantage: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a single check
    Check {
        #[command(flatten)]
        pool: PoolArgs,
    },

    /// Roll a contest between an initiator and a defender
    Contest {
        #[command(flatten)]
        pool: PoolArgs,

        /// Defender's pool size
        #[arg(long, value_parser = dice_count())]
        vs_pool: u32,

        /// Defender's difficulty class
        #[arg(long, default_value = "0")]
        vs_dc: u32,
    },

    /// Roll a cooperative check
    Coop {
        /// Cooperation mode: weakest, best, combined or assisted
        #[arg(short, long)]
        mode: String,

        /// Participants' pool sizes, comma separated
        #[arg(long, value_delimiter = ',', required = true, value_parser = dice_count())]
        pools: Vec<u32>,

        /// Index of the primary participant (assisted mode)
        #[arg(long, default_value = "0")]
        primary: usize,

        /// Die size: d4, d6, d8 or d10
        #[arg(long, default_value = "d10")]
        die: String,

        /// Difficulty class of the shared task
        #[arg(long, default_value = "0")]
        dc: u32,
    },

    /// Roll an extended check round by round until it ends
    Extended {
        #[command(flatten)]
        pool: PoolArgs,

        /// Successes needed across all rounds
        #[arg(short, long)]
        target: u32,

        /// Round limit
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(..=commands::MAX_ROUNDS))]
        rounds: u32,
    },

    /// Roll a chain of steps with the same pool
    Chain {
        #[command(flatten)]
        pool: PoolArgs,

        /// Steps as `label[:retries]`; retries is a number or `unlimited`
        #[arg(long = "step", required = true)]
        steps: Vec<String>,
    },
}

fn dice_count() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(..=commands::MAX_DICE)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = commands::Context::load(cli.seed, cli.config.as_deref(), cli.json).and_then(
        |ctx| match cli.command {
            Commands::Check { pool } => commands::check::run(&ctx, &pool.into()),
            Commands::Contest {
                pool,
                vs_pool,
                vs_dc,
            } => commands::contest::run(&ctx, &pool.into(), vs_pool, vs_dc),
            Commands::Coop {
                mode,
                pools,
                primary,
                die,
                dc,
            } => commands::coop::run(&ctx, &mode, &pools, primary, &die, dc),
            Commands::Extended {
                pool,
                target,
                rounds,
            } => commands::extended::run(&ctx, &pool.into(), target, rounds),
            Commands::Chain { pool, steps } => commands::chain::run(&ctx, &pool.into(), &steps),
        },
    );

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

impl From<PoolArgs> for commands::PoolOptions {
    fn from(args: PoolArgs) -> Self {
        Self {
            pool: args.pool,
            die: args.die,
            skill: args.skill,
            dc: args.dc,
            mods: args.mods,
            advantage: args.advantage,
            disadvantage: args.disadvantage,
        }
    }
}
