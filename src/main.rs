//! shelf-hunter - find books from a Goodreads shelf on SkupSzop
//!
//! Fetches a shelf, searches the marketplace for each book and writes the
//! matching offers to CSV.

use anyhow::Result;
use clap::{Parser, Subcommand};
use shelf_hunter::commands::{on_interrupt, Interrupt, RunCommand, SearchCommand, ShelfCommand};
use shelf_hunter::config::{Config, OutputFormat};
use shelf_hunter::pipeline::{ChannelObserver, PipelineEvent};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shelf-hunter",
    version,
    about = "Find books from a Goodreads shelf on SkupSzop",
    long_about = "Downloads a Goodreads shelf, searches SkupSzop for every book and keeps \
                  the offers whose title, author and price match."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SHELF_HUNTER_PROXY")]
    proxy: Option<String>,

    /// Delay between requests in milliseconds
    #[arg(long, global = true)]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Books CSV written by `shelf` and read by `search`
    #[arg(long, global = true)]
    books_csv: Option<PathBuf>,

    /// Results CSV written by `search`
    #[arg(long, global = true)]
    results_csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Matching and price options shared by `search` and `run`.
#[derive(clap::Args)]
struct MatchArgs {
    /// Minimum price filter
    #[arg(long)]
    min_price: Option<f64>,

    /// Maximum price filter
    #[arg(long)]
    max_price: Option<f64>,

    /// Minimum title similarity (0.0-1.0)
    #[arg(long)]
    title_threshold: Option<f64>,

    /// Minimum author similarity (0.0-1.0)
    #[arg(long)]
    author_threshold: Option<f64>,

    /// Books searched at the same time (1 = sequential)
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,
}

impl MatchArgs {
    fn apply(self, config: &mut Config) {
        if let Some(min) = self.min_price {
            config.min_price = min;
        }
        if let Some(max) = self.max_price {
            config.max_price = max;
        }
        if let Some(t) = self.title_threshold {
            config.title_threshold = t;
        }
        if let Some(t) = self.author_threshold {
            config.author_threshold = t;
        }
        if let Some(c) = self.concurrency {
            config.concurrency = c;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Download a shelf and save it as the books CSV
    Shelf {
        /// Shelf URL (goodreads.com/review/list/...)
        url: String,

        /// Maximum number of shelf pages to fetch
        #[arg(long)]
        max_pages: Option<u32>,
    },

    /// Search SkupSzop for every book in the books CSV
    #[command(alias = "s")]
    Search {
        #[command(flatten)]
        matching: MatchArgs,
    },

    /// Download a shelf, then search for every book on it
    Run {
        /// Shelf URL (goodreads.com/review/list/...)
        url: String,

        #[command(flatten)]
        matching: MatchArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(path) = cli.books_csv {
        config.books_csv = path;
    }
    if let Some(path) = cli.results_csv {
        config.results_csv = path;
    }

    let cancel = CancellationToken::new();
    let (observer, events) = ChannelObserver::channel();

    let output = match cli.command {
        Commands::Shelf { url, max_pages } => {
            if let Some(max) = max_pages {
                config.max_pages = max;
            }
            ShelfCommand::new(config).execute(&url).await?
        }

        Commands::Search { matching } => {
            matching.apply(&mut config);
            let printer = tokio::spawn(print_progress(events));
            watch_ctrl_c(cancel.clone());

            let cmd = SearchCommand::new(config).with_cancel(cancel);
            let output = cmd.execute(&observer).await;
            drop(observer);
            let _ = printer.await;
            output?
        }

        Commands::Run { url, matching } => {
            matching.apply(&mut config);
            let printer = tokio::spawn(print_progress(events));
            watch_ctrl_c(cancel.clone());

            let cmd = RunCommand::new(config).with_cancel(cancel);
            let output = cmd.execute(&url, &observer).await;
            drop(observer);
            let _ = printer.await;
            output?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Cancels the run on the first Ctrl-C so books already being searched can
/// finish. A second Ctrl-C exits immediately.
fn watch_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            match on_interrupt(&cancel) {
                Interrupt::Cancel => {
                    warn!("Interrupted, finishing books in progress (Ctrl-C again to quit)")
                }
                Interrupt::Exit => {
                    warn!("Interrupted again, exiting");
                    std::process::exit(130);
                }
            }
        }
    });
}

async fn print_progress(mut events: UnboundedReceiver<PipelineEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            PipelineEvent::Progress(p) => {
                eprintln!("[{}/{}] {} - {}", p.index, p.total, p.title, p.author);
            }
            PipelineEvent::Result(row) => {
                eprintln!("  found: {} ({}, {})", row.title, row.price, row.condition);
            }
        }
    }
}
