//! feedsync replay tool.
//!
//! Seeds a feed container from a snapshot, pushes a recorded event stream
//! through the dispatcher, and prints the resulting feed state.
//!
//! Usage:
//!   feedsync-replay --snapshot feed.json --events events.jsonl --feed user:alice
//!   feedsync-replay --snapshot feed.json --events events.jsonl --feed user:alice \
//!       --config feedsync.ron --user alice
//!
//! `events.jsonl` holds one wire message per line; blank lines are skipped
//! and malformed lines are logged and ignored. `--activity a1` also opens
//! that activity from the snapshot (comments from the snapshot's `comments`
//! page, ordered by the config's `comment_sort`) and prints it alongside the
//! feed.

mod snapshot;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use feedsync_client::{CapabilityCache, CapabilitySource, ClientConfig, spawn_dispatcher};
use feedsync_engine::Container;
use feedsync_types::FeedId;
use tracing_subscriber::{EnvFilter, fmt};

use snapshot::{ActivityView, FeedSnapshot, FeedView, ReplayOutput};

/// Replay push events against a feed snapshot.
#[derive(Parser, Debug)]
#[command(name = "feedsync-replay")]
#[command(about = "Replay recorded push events against a feed snapshot")]
struct Args {
    /// Snapshot JSON: {"feed": ..., "activities": {"models": [...]}, "pinned_activities": [...]}
    #[arg(long)]
    snapshot: PathBuf,

    /// Wire events, one JSON object per line
    #[arg(long)]
    events: PathBuf,

    /// Feed to reconcile, as group:id
    #[arg(long)]
    feed: FeedId,

    /// RON config file (defaults to ./feedsync.ron when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Current user id; overrides the config
    #[arg(long)]
    user: Option<String>,

    /// Also track this activity from the snapshot
    #[arg(long)]
    activity: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::discover(".")?,
    };
    if let Some(user) = &args.user {
        config = config.with_user(user.as_str());
    }

    // Logs go to stderr; stdout carries the final state.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let snapshot_text = std::fs::read_to_string(&args.snapshot)
        .with_context(|| format!("reading snapshot {}", args.snapshot.display()))?;
    let snapshot = FeedSnapshot::from_json(&snapshot_text).context("parsing snapshot")?;

    let cache = Arc::new(CapabilityCache::new());
    cache.put_from_feeds(snapshot.feed.iter());

    let activity = match &args.activity {
        Some(id) => {
            let seed = snapshot
                .activity(id)
                .cloned()
                .with_context(|| format!("activity {id} is not in the snapshot"))?;
            let state = config.activity_state(seed, Some(args.feed.clone()), snapshot.comments.clone());
            Some(Container::new(state, config.context()))
        }
        None => None,
    };

    let feed = Container::new(snapshot.into_state(args.feed.clone())?, config.context());
    let dispatcher = spawn_dispatcher(&config, Some(cache as Arc<dyn CapabilitySource>));
    dispatcher.register(feed.clone()).await?;
    if let Some(activity) = &activity {
        dispatcher.register(activity.clone()).await?;
    }

    let events = std::fs::read_to_string(&args.events)
        .with_context(|| format!("reading events {}", args.events.display()))?;
    let mut total = 0usize;
    let mut applied = 0usize;
    for line in events.lines().map(str::trim).filter(|l| !l.is_empty()) {
        total += 1;
        if dispatcher.dispatch_json(line).await? > 0 {
            applied += 1;
        }
    }
    tracing::info!(
        feed = %args.feed,
        user = %config.current_user_id,
        total,
        applied,
        "replay finished"
    );

    let feed_state = feed.snapshot();
    let activity_state = activity.as_ref().map(Container::snapshot);
    let output = ReplayOutput {
        feed: FeedView::from(feed_state.as_ref()),
        activity: activity_state.as_deref().map(ActivityView::from),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
