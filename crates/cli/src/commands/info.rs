//! `info` command implementation.

use std::collections::HashMap;

use anyhow::{Context, Result};
use contracts::{FeedConfig, StreamBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    queue: QueueInfo,
    feed: FeedInfo,
    subscriptions: Vec<SubscriptionInfo>,
}

#[derive(Serialize)]
struct QueueInfo {
    bounded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    capacity: Option<usize>,
}

#[derive(Serialize)]
struct FeedInfo {
    kind: &'static str,
    interval_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    query_ids: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    messages_per_query: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Serialize)]
struct SubscriptionInfo {
    query_id: i32,
    name: String,
    subscriber_type: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    params: HashMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &StreamBlueprint) -> ConfigInfo {
    let feed = match &blueprint.feed {
        FeedConfig::Mock {
            query_ids,
            messages_per_query,
            interval_ms,
        } => FeedInfo {
            kind: blueprint.feed.kind(),
            interval_ms: *interval_ms,
            query_ids: query_ids.iter().map(|id| id.get()).collect(),
            messages_per_query: Some(*messages_per_query),
            path: None,
        },
        FeedConfig::Replay { path, interval_ms } => FeedInfo {
            kind: blueprint.feed.kind(),
            interval_ms: *interval_ms,
            query_ids: Vec::new(),
            messages_per_query: None,
            path: Some(path.display().to_string()),
        },
    };

    let subscriptions = blueprint
        .subscriptions
        .iter()
        .map(|s| SubscriptionInfo {
            query_id: s.query_id.get(),
            name: s.name.clone(),
            subscriber_type: format!("{:?}", s.subscriber_type),
            params: s.params.clone(),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        queue: QueueInfo {
            bounded: blueprint.queue.capacity.is_some(),
            capacity: blueprint.queue.capacity,
        },
        feed,
        subscriptions,
    }
}

fn print_config_info(blueprint: &StreamBlueprint) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Stream Dispatch Configuration                  ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Queue");
    println!("   ├─ Version: {:?}", blueprint.version);
    match blueprint.queue.capacity {
        Some(capacity) => println!("   └─ Capacity: {}", capacity),
        None => println!("   └─ Capacity: unbounded"),
    }

    println!("\nFeed ({})", blueprint.feed.kind());
    match &blueprint.feed {
        FeedConfig::Mock {
            query_ids,
            messages_per_query,
            interval_ms,
        } => {
            let ids: Vec<i32> = query_ids.iter().map(|id| id.get()).collect();
            println!("   ├─ Query ids: {:?}", ids);
            println!("   ├─ Messages per query: {}", messages_per_query);
            println!("   └─ Interval: {} ms", interval_ms);
        }
        FeedConfig::Replay { path, interval_ms } => {
            println!("   ├─ Path: {}", path.display());
            println!("   └─ Interval: {} ms", interval_ms);
        }
    }

    println!("\nSubscriptions ({})", blueprint.subscriptions.len());
    for (i, sub) in blueprint.subscriptions.iter().enumerate() {
        let is_last = i == blueprint.subscriptions.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        println!(
            "   {} [{}] {} ({:?})",
            prefix, sub.query_id, sub.name, sub.subscriber_type
        );
    }

    println!();
}
