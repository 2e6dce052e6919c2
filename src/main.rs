// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Graphsteps CLI - step-by-step traces of classic graph algorithms

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use graphsteps::commands::{self, GraphSource, TraceRequest};
use graphsteps::config;
use graphsteps::render::Renderer;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "graphsteps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "GRAPHSTEPS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Graph selection shared by every graph-reading command
#[derive(Args)]
struct GraphArgs {
    /// Built-in fixture (see `graphsteps list`)
    #[arg(short = 'g', long = "graph", value_name = "FIXTURE")]
    fixture: Option<String>,

    /// JSON or TOML graph file
    #[arg(long, value_name = "PATH", conflicts_with = "fixture")]
    file: Option<PathBuf>,
}

impl From<GraphArgs> for GraphSource {
    fn from(args: GraphArgs) -> Self {
        Self {
            fixture: args.fixture,
            file: args.file,
        }
    }
}

/// Algorithm run arguments shared by `run` and `play`
#[derive(Args)]
struct RunArgs {
    /// Algorithm (bfs, dfs, dijkstra, bellman-ford, floyd-warshall, astar, greedy, idastar, kruskal)
    algorithm: String,

    /// Variant (defaults to the algorithm's first variant)
    variant: Option<String>,

    #[command(flatten)]
    graph: GraphArgs,

    /// Start node
    #[arg(short, long)]
    start: Option<String>,

    /// Goal node
    #[arg(long)]
    goal: Option<String>,
}

impl From<RunArgs> for TraceRequest {
    fn from(args: RunArgs) -> Self {
        Self {
            algorithm: args.algorithm,
            variant: args.variant,
            source: args.graph.into(),
            start: args.start,
            goal: args.goal,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full step trace of an algorithm run
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Output format (text, json, dot)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a run one step per tick
    Play {
        #[command(flatten)]
        args: RunArgs,

        /// Speed from 100 (slow) to 2000 (fast)
        #[arg(long)]
        speed: Option<u32>,
    },

    /// List algorithms, variants and fixtures
    List,

    /// Export a graph to various formats
    Export {
        #[command(flatten)]
        graph: GraphArgs,

        /// Output format (dot, json, toml)
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a seeded random lesson graph
    Random {
        /// Vertex count (1 to 26)
        #[arg(short, long, default_value_t = 6)]
        nodes: usize,

        /// Edge density (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        density: String,

        /// One-way edges, sometimes with a reverse edge
        #[arg(long)]
        directed: bool,

        /// RNG seed; the same seed gives the same graph
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Output format (dot, json, toml)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref())?;

    // Initialize logging; RUST_LOG wins over flags and settings
    let log_level = match cli.verbose {
        0 if cli.quiet => "error".to_string(),
        0 => settings.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let color = settings.color && !cli.no_color && std::io::stdout().is_terminal();
    let renderer = Renderer::new(color);

    // Execute command
    match cli.command {
        Commands::Run { args, format, output } => {
            let format = if cli.json { "json".to_string() } else { format };
            commands::run::run(&args.into(), &format, output.as_deref(), &settings, renderer)
        }
        Commands::Play { args, speed } => {
            commands::play::run(&args.into(), speed, &settings, renderer).await
        }
        Commands::List => commands::list::run(cli.json),
        Commands::Export { graph, format, output } => {
            let format = if cli.json { "json".to_string() } else { format };
            commands::export::run(&graph.into(), &format, output.as_deref(), &settings)
        }
        Commands::Random {
            nodes,
            density,
            directed,
            seed,
            format,
            output,
        } => commands::random::run(nodes, &density, directed, seed, &format, output.as_deref()),
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    }
}
