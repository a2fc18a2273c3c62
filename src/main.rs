//! histgen - generate, ingest and re-encode operation histories.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use histgen::config::Config;
use histgen::encode::Format;
use histgen::generator::{generate_batch, HistoryGenerator, Mode};
use histgen::history::{History, ObjectKind};
use histgen::ingest::{pair_log, parse_scal_log, MethodTable, Remapper};

#[derive(Parser, Debug)]
#[clap(name = "histgen", about = "Operation histories for linearizability checkers")]
struct Args {
    /// TOML configuration with generator settings and mapping tables.
    #[clap(long, env = "HISTGEN_CONFIG")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one history.
    Generate {
        /// Object kind: stack, queue or pqueue.
        #[clap(long)]
        kind: ObjectKind,
        /// Number of operations.
        #[clap(short)]
        n: usize,
        /// Produce a history that is not linearizable.
        #[clap(long)]
        non_linearizable: bool,
        /// Overrides the configured seed.
        #[clap(long)]
        seed: Option<u64>,
        /// Output file. Standard output when absent.
        output: Option<PathBuf>,
    },
    /// Generate many independent histories in parallel, seeded consecutively.
    Batch {
        #[clap(long)]
        kind: ObjectKind,
        #[clap(short)]
        n: usize,
        #[clap(long)]
        runs: usize,
        #[clap(long)]
        non_linearizable: bool,
        #[clap(long)]
        seed: Option<u64>,
        /// Directory that receives `<kind>-<run>.log` files.
        dir: PathBuf,
    },
    /// Pair a bracketed per-process event log into a canonical history.
    Pair {
        input: PathBuf,
        /// Implementation whose token table to use.
        #[clap(long = "impl", conflicts_with = "kind")]
        implementation: Option<String>,
        /// Use the canonical vocabulary of this object kind instead.
        #[clap(long)]
        kind: Option<ObjectKind>,
        output: Option<PathBuf>,
    },
    /// Convert a SCAL operation log into a canonical history.
    ImportScal {
        input: PathBuf,
        #[clap(long = "impl")]
        implementation: String,
        /// Keep operations that found the object empty.
        #[clap(long)]
        keep_empties: bool,
        output: Option<PathBuf>,
    },
    /// Encode a canonical history for a checker.
    Encode {
        input: PathBuf,
        /// interval, bracket or edn.
        #[clap(long)]
        format: Format,
        output: Option<PathBuf>,
    },
}

fn init_logging() {
    let fmt = tracing_subscriber::fmt::Layer::default()
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(filter).with(fmt);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("histgen: a global tracing subscriber was already installed");
    }
}

fn mode(non_linearizable: bool) -> Mode {
    if non_linearizable {
        Mode::NonLinearizable
    } else {
        Mode::Linearizable
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
        }
        None => io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("failed to write to stdout"),
    }
}

fn run(config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Generate {
            kind,
            n,
            non_linearizable,
            seed,
            output,
        } => {
            let seed = seed.unwrap_or_else(|| config.generator.resolve_seed());
            let history = HistoryGenerator::seeded(kind, config.generator.clone(), seed)
                .generate(mode(non_linearizable), n);
            emit(output.as_deref(), &history.to_string())
        }
        Command::Batch {
            kind,
            n,
            runs,
            non_linearizable,
            seed,
            dir,
        } => {
            let base = seed.unwrap_or_else(|| config.generator.resolve_seed());
            let seeds: Vec<u64> = (0..runs as u64).map(|i| base.wrapping_add(i)).collect();
            let histories =
                generate_batch(kind, mode(non_linearizable), n, &config.generator, &seeds);
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            for (run, history) in histories.iter().enumerate() {
                let path = dir.join(format!("{}-{}.log", kind, run));
                emit(Some(path.as_path()), &history.to_string())?;
            }
            info!(runs, dir = %dir.display(), "wrote batch");
            Ok(())
        }
        Command::Pair {
            input,
            implementation,
            kind,
            output,
        } => {
            let table = match (implementation, kind) {
                (Some(implementation), _) => config.method_table(&implementation)?,
                (None, Some(kind)) => MethodTable::canonical(kind),
                (None, None) => bail!("pair needs either --impl or --kind"),
            };
            let raw = pair_log(&read(&input)?)
                .with_context(|| format!("failed to pair {}", input.display()))?;
            let history = Remapper::new(table).remap(&raw)?;
            emit(output.as_deref(), &history.to_string())
        }
        Command::ImportScal {
            input,
            implementation,
            keep_empties,
            output,
        } => {
            let table = config.method_table(&implementation)?;
            let raw = parse_scal_log(&read(&input)?, !keep_empties)
                .with_context(|| format!("failed to import {}", input.display()))?;
            let history = Remapper::new(table).remap(&raw)?;
            emit(output.as_deref(), &history.to_string())
        }
        Command::Encode {
            input,
            format,
            output,
        } => {
            let history = History::parse(&read(&input)?)
                .with_context(|| format!("failed to parse {}", input.display()))?;
            let vocabulary = config.vocabulary(format, history.kind())?;
            emit(output.as_deref(), &format.encode(&history, vocabulary))
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };

    run(&config, args.command)
}
