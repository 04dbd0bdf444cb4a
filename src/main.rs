use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trace_replay::framework::Frame;
use trace_replay::graph::{self, random_graph, GraphAlgorithm, GraphConfig, GraphEngine, GraphOutcome};
use trace_replay::karatsuba::{self, KaratsubaConfig, KaratsubaEngine};
use trace_replay::knapsack::{self, random_items, KnapsackConfig, KnapsackEngine};
use trace_replay::playback::{Advance, Playback, SystemClock};
use trace_replay::queens::{self, QueensConfig, QueensEngine};
use trace_replay::sorting::{self, Algorithm, SortingEngine};

#[derive(Parser, Debug)]
#[command(name = "trace-replay", about = "Replay recorded algorithm traces step by step")]
struct Cli {
    /// Log library events at debug level (overridden by RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
struct ReplayArgs {
    /// Stop after this many forward steps.
    #[arg(long)]
    limit: Option<usize>,
    /// Advance on the auto-play timer instead of all at once.
    #[arg(long)]
    play: bool,
    /// Auto-play speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve N-Queens by backtracking.
    Queens {
        /// Board size.
        #[arg(long, default_value_t = 4)]
        size: usize,
        /// JSON config (`{"size": N, "initialBoard": [...]}`), overrides --size.
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        replay: ReplayArgs,
    },
    /// Multiply two decimal integers with Karatsuba.
    Karatsuba {
        /// First operand.
        num1: String,
        /// Second operand.
        num2: String,
        /// Operand length at or below which schoolbook multiplication is used.
        #[arg(long, default_value_t = 2)]
        threshold: usize,
        #[command(flatten)]
        replay: ReplayArgs,
    },
    /// Fill and reconstruct a 0/1 knapsack table.
    Knapsack {
        /// JSON config (`{"capacity": C, "items": [...]}`).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Capacity for a randomly generated item list.
        #[arg(long)]
        capacity: Option<usize>,
        #[command(flatten)]
        replay: ReplayArgs,
    },
    /// Trace a sorting algorithm.
    Sort {
        /// bubble, quick or merge.
        #[arg(long, default_value = "bubble")]
        algorithm: Algorithm,
        /// Values to sort.
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<i64>,
        #[command(flatten)]
        replay: ReplayArgs,
    },
    /// Trace Dijkstra, Prim or Kruskal on a weighted graph.
    Graph {
        /// dijkstra, prim or kruskal.
        #[arg(long, default_value = "dijkstra")]
        algorithm: GraphAlgorithm,
        /// JSON graph (`{"nodes": [...], "edges": [...]}`).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Node count for a randomly generated graph.
        #[arg(long, default_value_t = 10)]
        nodes: usize,
        /// Edge probability for a randomly generated graph.
        #[arg(long, default_value_t = 0.3)]
        density: f64,
        /// Start node id (defaults to the first node).
        #[arg(long)]
        start: Option<String>,
        /// End node id for Dijkstra (defaults to the last node).
        #[arg(long)]
        end: Option<String>,
        #[command(flatten)]
        replay: ReplayArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Queens {
            size,
            config,
            replay,
        } => run_queens(size, config.as_deref(), replay)?,
        Commands::Karatsuba {
            num1,
            num2,
            threshold,
            replay,
        } => run_karatsuba(num1, num2, threshold, replay)?,
        Commands::Knapsack {
            config,
            capacity,
            replay,
        } => run_knapsack(config.as_deref(), capacity, replay)?,
        Commands::Sort {
            algorithm,
            values,
            replay,
        } => run_sort(algorithm, values, replay)?,
        Commands::Graph {
            algorithm,
            config,
            nodes,
            density,
            start,
            end,
            replay,
        } => {
            let source = match config {
                Some(path) => GraphSource::File(path),
                None => GraphSource::Random { nodes, density },
            };
            run_graph(algorithm, source, start, end, replay)?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_queens(size: usize, config_path: Option<&Path>, args: ReplayArgs) -> Result<()> {
    let config = match config_path {
        Some(path) => QueensConfig::from_json(&read_config(path)?)
            .with_context(|| format!("invalid queens config {}", path.display()))?,
        None => QueensConfig::new(size),
    };

    let mut engine = QueensEngine::new();
    engine.subscribe(|frame| print_frame(frame));
    engine
        .init(config)
        .context("failed to initialize queens search")?;
    replay(&mut engine, queens::BASE_INTERVAL, args)?;

    println!("{} solution(s) found", engine.solutions().len());
    for solution in engine.solutions() {
        println!("solution {}:\n{}", solution.id, solution.board);
    }
    Ok(())
}

fn run_karatsuba(num1: String, num2: String, threshold: usize, args: ReplayArgs) -> Result<()> {
    let mut engine = KaratsubaEngine::new();
    engine.subscribe(|frame| print_frame(frame));
    engine
        .init(KaratsubaConfig::new(num1, num2, threshold))
        .context("failed to build karatsuba trace")?;
    replay(&mut engine, karatsuba::BASE_INTERVAL, args)?;

    match engine.product() {
        Some(product) if engine.is_at_end() => println!("product = {}", product),
        _ => println!("stopped at step {:?} of {}", engine.cursor(), engine.len()),
    }
    Ok(())
}

fn run_knapsack(
    config_path: Option<&Path>,
    capacity: Option<usize>,
    args: ReplayArgs,
) -> Result<()> {
    let config = match (config_path, capacity) {
        (Some(path), _) => KnapsackConfig::from_json(&read_config(path)?)
            .with_context(|| format!("invalid knapsack config {}", path.display()))?,
        (None, Some(capacity)) => {
            KnapsackConfig::new(capacity, random_items(capacity, &mut rand::thread_rng()))
        }
        (None, None) => KnapsackConfig::default(),
    };

    let mut engine = KnapsackEngine::new();
    engine.subscribe(|frame| print_frame(frame));
    engine
        .init(config)
        .context("failed to initialize knapsack table")?;
    replay(&mut engine, knapsack::BASE_INTERVAL, args)?;

    println!("{}", engine.explanation());
    if let Some(solution) = engine.solution() {
        println!(
            "best value {} with items {:?} (weight {})",
            solution.max_value, solution.indices, solution.total_weight
        );
    }
    Ok(())
}

fn run_sort(algorithm: Algorithm, values: Vec<i64>, args: ReplayArgs) -> Result<()> {
    let mut engine = SortingEngine::new(algorithm);
    engine.subscribe(|frame| print_frame(frame));
    engine
        .init(values)
        .with_context(|| format!("failed to trace {} sort", algorithm))?;
    replay(&mut engine, sorting::BASE_INTERVAL, args)?;

    let stats = engine.stats();
    println!(
        "{} sort: {} comparisons, {} swaps",
        algorithm, stats.comparisons, stats.swaps
    );
    Ok(())
}

enum GraphSource {
    File(PathBuf),
    Random { nodes: usize, density: f64 },
}

fn run_graph(
    algorithm: GraphAlgorithm,
    source: GraphSource,
    start: Option<String>,
    end: Option<String>,
    args: ReplayArgs,
) -> Result<()> {
    let mut config = match source {
        GraphSource::File(path) => GraphConfig::from_json(&read_config(&path)?)
            .with_context(|| format!("invalid graph config {}", path.display()))?,
        GraphSource::Random { nodes, density } => GraphConfig::new(
            random_graph(nodes, density, &mut rand::thread_rng()),
            algorithm,
        ),
    };
    config.algorithm = algorithm;
    config.start = start.or(config.start);
    config.end = end.or(config.end);

    let mut engine = GraphEngine::new();
    engine.subscribe(|frame| print_frame(frame));
    engine
        .init(config)
        .with_context(|| format!("failed to trace {}", algorithm))?;
    replay(&mut engine, graph::BASE_INTERVAL, args)?;

    match engine.outcome() {
        Some(GraphOutcome::ShortestPath(path)) => match path.distance {
            Some(distance) => println!(
                "shortest path {} (distance {})",
                engine.path_ids().join(" -> "),
                distance
            ),
            None => println!("no path found"),
        },
        Some(GraphOutcome::SpanningTree(tree)) => println!(
            "{} edge(s), total weight {}{}",
            tree.edges.len(),
            tree.total_weight,
            if tree.connected { "" } else { " (forest)" }
        ),
        None => {}
    }
    Ok(())
}

/// Advance `target` to its end (or `args.limit` steps), at once or on the timer.
fn replay<A: Advance>(target: &mut A, base_interval: Duration, args: ReplayArgs) -> Result<()> {
    let mut limited = Limited {
        inner: target,
        remaining: args.limit.unwrap_or(usize::MAX),
    };

    if args.play {
        let clock = SystemClock::new();
        let mut playback = Playback::new(base_interval);
        playback
            .set_speed(args.speed, Duration::ZERO)
            .context("invalid --speed")?;
        playback.play(Duration::ZERO);
        playback.drive(&mut limited, &clock);
    } else {
        while limited.advance() {}
    }
    Ok(())
}

/// Caps the number of forward steps taken through it.
struct Limited<'a, A: ?Sized> {
    inner: &'a mut A,
    remaining: usize,
}

impl<A: Advance + ?Sized> Advance for Limited<'_, A> {
    fn advance(&mut self) -> bool {
        if self.remaining == 0 || !self.inner.advance() {
            return false;
        }
        self.remaining -= 1;
        true
    }

    fn is_at_end(&self) -> bool {
        self.remaining == 0 || self.inner.is_at_end()
    }
}

fn print_frame<S, St: Debug>(frame: &Frame<S, St>) {
    println!(
        "[{}/{}] {}\t{:?}",
        frame.index,
        frame.total.saturating_sub(1),
        frame.explanation,
        frame.stats
    );
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))
}
