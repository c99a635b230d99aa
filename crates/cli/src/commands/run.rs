//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{FeedConfig, StreamBlueprint};
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(capacity) = args.queue_capacity {
        info!(capacity, "Overriding queue capacity from CLI");
        blueprint.queue.capacity = (capacity > 0).then_some(capacity);
    }

    info!(
        feed = blueprint.feed.kind(),
        capacity = ?blueprint.queue.capacity,
        subscriptions = blueprint.subscriptions.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&blueprint);
        return Ok(());
    }

    let pipeline_config = PipelineConfig {
        blueprint,
        timeout: (args.timeout > 0).then(|| Duration::from_secs(args.timeout)),
        metrics_port: (args.metrics_port > 0).then_some(args.metrics_port),
    };

    let pipeline = Pipeline::new(pipeline_config);

    // Cancel the pipeline on Ctrl+C / SIGTERM; in-flight items are abandoned.
    let cancel = pipeline.cancellation_token();
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = shutdown_signal() => {
                warn!("Received shutdown signal, stopping pipeline...");
                cancel.cancel();
            }
        }
    });

    info!("Starting pipeline...");

    let stats = pipeline.run().await.context("Pipeline execution failed")?;

    info!(
        stop_reason = ?stats.stop_reason,
        taken = stats.dispatch.taken,
        dispatched = stats.dispatch.dispatched,
        unknown = stats.dispatch.unknown,
        faults = stats.dispatch.faults,
        duration_secs = stats.duration.as_secs_f64(),
        throughput = format!("{:.2}", stats.throughput()),
        "Pipeline finished"
    );

    stats.print_summary();

    Ok(())
}

/// Resolve when Ctrl+C or SIGTERM arrives
///
/// A handler that fails to install is logged and never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(blueprint: &StreamBlueprint) {
    println!("\n=== Configuration Summary ===\n");
    println!("Queue:");
    match blueprint.queue.capacity {
        Some(capacity) => println!("  Capacity: {}", capacity),
        None => println!("  Capacity: unbounded"),
    }

    println!("\nFeed ({}):", blueprint.feed.kind());
    match &blueprint.feed {
        FeedConfig::Mock {
            query_ids,
            messages_per_query,
            interval_ms,
        } => {
            println!("  Query ids: {:?}", query_ids.iter().map(|id| id.get()).collect::<Vec<_>>());
            println!("  Messages per query: {}", messages_per_query);
            println!("  Interval: {} ms", interval_ms);
        }
        FeedConfig::Replay { path, interval_ms } => {
            println!("  Path: {}", path.display());
            println!("  Interval: {} ms", interval_ms);
        }
    }

    println!("\nSubscriptions ({}):", blueprint.subscriptions.len());
    for sub in &blueprint.subscriptions {
        println!("  - {} -> {} ({:?})", sub.query_id, sub.name, sub.subscriber_type);
    }

    println!();
}
