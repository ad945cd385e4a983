use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;
use clap::Parser;
use log::{info, debug};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;
use evlog::{
    Level,
    Logger,
    LoggerConfig,
    Result,
    TokioReactor,
};

/// Append lines read from stdin to a log file, timestamped and filtered.
#[derive(Parser, Debug)]
#[command(name = "evlog", version, about)]
struct Args {
    /// INI file with [output] and [buffering] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file to append to (overrides the config file)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Threshold level; lines above it are dropped
    #[arg(short, long)]
    level: Option<Level>,

    /// Level every input line is emitted at
    #[arg(long, default_value_t = 0)]
    line_level: Level,

    /// Batch lines and flush them on a timer instead of writing each one
    #[arg(short, long)]
    buffered: bool,

    /// Flush interval in milliseconds when buffering
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print counters as JSON when done
    #[arg(long)]
    stats: bool,
}

fn load_config(args: &Args) -> Result<LoggerConfig> {
    let mut config = match args.config {
        Some(ref path) => LoggerConfig::from_ini(path)?,
        None => LoggerConfig::default(),
    };

    if let Some(ref file) = args.file {
        config.output.filename = Some(file.clone());
    }
    if let Some(level) = args.level {
        config.output.level = level;
    }
    if let Some(ms) = args.interval_ms {
        config.buffering.flush_interval_ms = ms;
    }
    if args.buffered {
        config.buffering.enabled = true;
    }

    config.validate()?;
    Ok(config)
}

fn run_direct(logger: &Logger, line_level: Level) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        logger.emit(line_level, format_args!("{}", line));
    }
    Ok(())
}

async fn run_buffered(logger: &Logger, line_level: Level) -> Result<()> {
    let reactor = Rc::new(TokioReactor::new());
    logger.attach(reactor);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }
        logger.emit(line_level, format_args!("{}", line));
    }

    debug!("Input closed with {} bytes pending", logger.pending_bytes());
    logger.detach();
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    let logger = Logger::from_config(&config);
    info!(
        "Logging to {:?} at level {} ({})",
        config.output.filename,
        config.output.level,
        if config.buffering.enabled { "buffered" } else { "direct" }
    );

    if config.buffering.enabled {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let local = LocalSet::new();
        local.block_on(&runtime, run_buffered(&logger, args.line_level))?;
    } else {
        run_direct(&logger, args.line_level)?;
    }

    if args.stats {
        println!("{}", serde_json::to_string_pretty(&logger.stats())?);
    }

    logger.teardown();
    Ok(())
}
