use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::parsers::{CsvSchema, SnapshotSchema};
use crate::services::{html, novelty, report, Aggregator, DataLoaderService, FeedSource};
use crate::types::{DateBasis, GroupMode};

/// Browse newly listed products, grouped by day or week
#[derive(Parser)]
#[command(name = "dropfeed")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Feed CSV: file path or http(s) URL (overrides config)
    #[arg(long, global = true, value_name = "SOURCE")]
    feed: Option<String>,

    /// Config file (default: ~/.dropfeed/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Product site prefix for item links (overrides config)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Bucket by local time instead of UTC
    #[arg(long, global = true)]
    local_time: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Print grouped new listings
    List {
        /// Grouping (defaults to the configured mode)
        #[arg(long, value_enum)]
        by: Option<ModeArg>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a static HTML page with a Day/Week toggle
    Html {
        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Page title
        #[arg(long, default_value = "New arrivals")]
        title: String,
    },

    /// Flag first appearances in a raw snapshot export and write a feed CSV
    Mark {
        /// Snapshot CSV (item_id, timestamp, title, color, url, price)
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Day,
    Week,
}

impl From<ModeArg> for GroupMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Day => GroupMode::Day,
            ModeArg::Week => GroupMode::Week,
        }
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = self.resolve_config()?;

        // The TUI owns the terminal, so only line-oriented commands log
        if !matches!(self.command, None | Some(Commands::Tui)) {
            init_logging(self.verbose);
        }

        match self.command {
            None | Some(Commands::Tui) => crate::tui::run(config),
            Some(Commands::List { by, json }) => {
                let mode = by.map(GroupMode::from).unwrap_or(config.default_mode);
                run_list(&config, mode, json)
            }
            Some(Commands::Html { out, title }) => run_html(&config, out, &title),
            Some(Commands::Mark { input, out }) => run_mark(&input, out),
            Some(Commands::Config) => {
                print!("{}", config.to_toml());
                Ok(())
            }
        }
    }

    /// Config file merged with command-line overrides
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };
        if let Some(feed) = &self.feed {
            config.feed = feed.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.product_base_url = base_url.clone();
        }
        if self.local_time {
            config.date_basis = DateBasis::Local;
        }
        Ok(config)
    }
}

/// Install the stderr subscriber; RUST_LOG wins over --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn run_list(config: &Config, mode: GroupMode, json: bool) -> anyhow::Result<()> {
    let loader = DataLoaderService::new(FeedSource::parse(&config.feed));
    let result = loader.load()?;
    let groups = Aggregator::group(&result.listings, mode, config.date_basis);

    if json {
        println!("{}", report::render_json(&groups, &config.product_base_url)?);
    } else {
        print!("{}", report::render_text(&groups, &config.product_base_url));
        if result.report.skipped() > 0 {
            eprintln!(
                "\n{} of {} rows skipped (run with -v for details)",
                result.report.skipped(),
                result.report.rows_read
            );
        }
    }
    Ok(())
}

fn run_html(config: &Config, out: Option<PathBuf>, title: &str) -> anyhow::Result<()> {
    let loader = DataLoaderService::new(FeedSource::parse(&config.feed));
    let result = loader.load()?;

    let days = Aggregator::group(&result.listings, GroupMode::Day, config.date_basis);
    let weeks = Aggregator::group(&result.listings, GroupMode::Week, config.date_basis);
    let page = html::render_page(
        title,
        &days,
        &weeks,
        &config.product_base_url,
        config.default_mode,
    );

    match out {
        Some(path) => {
            fs::write(&path, page).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote HTML export");
        }
        None => print!("{}", page),
    }
    Ok(())
}

fn run_mark(input: &Path, out: Option<PathBuf>) -> anyhow::Result<()> {
    let content =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let (rows, parse_report) = SnapshotSchema.parse_str(&content)?;
    if parse_report.skipped() > 0 {
        warn!(
            skipped = parse_report.skipped(),
            "snapshot rows skipped while marking"
        );
    }

    let marked = novelty::mark_new(rows);
    let new_count = marked.iter().filter(|r| r.is_novel()).count();

    match out {
        Some(path) => {
            let file =
                File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            novelty::write_export(&marked, BufWriter::new(file))?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            novelty::write_export(&marked, &mut lock)?;
            lock.flush()?;
        }
    }

    info!(rows = marked.len(), new = new_count, "marked snapshot");
    Ok(())
}
