use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{FixedOffset, Local, Offset};
use clap::Parser;
use thiserror::Error;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use txs_feed::config::DuplicatePolicy;
use txs_feed::controller::FeedEvent;
use txs_feed::csv::{read_transactions, write_groups};
use txs_feed::fetch::InMemoryFetcher;
use txs_feed::wire::JsonPageSource;
use txs_feed::{Command, FeedConfig, FeedFilter, FeedSession, PageFetcher};

const MAX_OFFSET_MINUTES: i64 = 24 * 60 - 1;

#[derive(Debug, Error)]
enum ConfigError {
    #[error("utc offset out of range: {0} minutes")]
    UtcOffset(i32),
}

#[derive(Parser)]
#[command(name = "txs-feed", version)]
#[command(about = "Page through a transaction feed, filter and search it, and print it grouped by month")]
struct Args {
    /// CSV of transaction records, or a JSON array of page envelopes
    input: PathBuf,

    /// all | sent | received
    #[arg(long, default_value = "all")]
    filter: FeedFilter,

    /// Case-insensitive search text
    #[arg(long, default_value = "")]
    query: String,

    /// Page size used to paginate CSV input
    #[arg(long, default_value_t = 10)]
    page_size: usize,

    /// Visible items the auto-loader tries to reach
    #[arg(long, default_value_t = FeedConfig::AUTO_LOAD_MIN)]
    auto_load_min: usize,

    /// Viewer offset from UTC in minutes, within a day (defaults to the local offset)
    #[arg(
        long,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES)
    )]
    utc_offset: Option<i32>,

    /// Drop records whose id was already received
    #[arg(long)]
    dedupe: bool,

    /// Keep paginating until the last page
    #[arg(long)]
    all_pages: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let is_json = args
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let json = match fs::read_to_string(&args.input) {
            Ok(json) => json,
            Err(e) => {
                error!(path = %args.input.display(), "failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        };
        match JsonPageSource::from_array(&json) {
            Ok(source) => run(source, config, &args).await,
            Err(e) => {
                error!("{e}");
                ExitCode::FAILURE
            }
        }
    } else {
        if args.input.extension().is_none_or(|ext| ext != "csv") {
            warn!(path = %args.input.display(), "input file seems to not be a csv file");
        }
        let rows = match read_transactions(&args.input) {
            Ok(rows) => rows,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        };
        let records = rows
            .filter_map(|row| row.map_err(|e| warn!("{e}")).ok())
            .collect();
        run(InMemoryFetcher::paginate(records, args.page_size), config, &args).await
    }
}

fn build_config(args: &Args) -> Result<FeedConfig, ConfigError> {
    let offset = match args.utc_offset {
        Some(minutes) => minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(ConfigError::UtcOffset(minutes))?,
        None => Local::now().offset().fix(),
    };
    let duplicates = if args.dedupe {
        DuplicatePolicy::SkipKnown
    } else {
        DuplicatePolicy::Keep
    };

    Ok(FeedConfig::default()
        .with_auto_load_min(args.auto_load_min)
        .with_duplicates(duplicates)
        .with_viewer_offset(offset))
}

async fn run<F>(fetcher: F, config: FeedConfig, args: &Args) -> ExitCode
where
    F: PageFetcher + Send + Sync + 'static,
{
    let mut session = FeedSession::new(fetcher, config);
    let mut events = session.events();
    let (command_sender, command_receiver) = tokio::sync::mpsc::channel(8);

    let commands = vec![
        Command::Refresh,
        Command::SetFilter(args.filter),
        Command::SetSearchQuery(args.query.clone()),
    ];
    tokio::spawn(async move {
        for command in commands {
            if command_sender.send(command).await.is_err() {
                break;
            }
        }
    });

    session.run(ReceiverStream::new(command_receiver)).await;

    if args.all_pages {
        while !session.state().end_reached && session.state().error.is_none() {
            let before = session.controller().feed().current_page();
            session.load_more().await;
            if session.controller().feed().current_page() == before {
                break;
            }
        }
    }

    while let Ok(FeedEvent::ShowMessage { message }) = events.try_recv() {
        warn!("{message}");
    }

    let state = session.state();
    if state.shows_retry_prompt() {
        return ExitCode::FAILURE;
    }
    if let Err(e) = write_groups(io::stdout().lock(), &state.groups) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
