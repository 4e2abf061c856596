//! precache-check：对线上站点执行一次安装与激活，检查必需资源能否全部缓存。
//!
//! Usage:
//!   precache-check <origin> [--config <path>]
//!
//! Runs install and activate against a live origin with in-memory storage
//! and reports every essential resource. Exits non-zero if install fails.

use anyhow::{bail, Context};
use offline_worker::cache::CacheKey;
use offline_worker::{CacheStorage, MemoryCacheStorage, OfflineWorkerBuilder, WorkerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(origin) = args.first().filter(|a| !a.starts_with('-')) else {
        print_usage();
        std::process::exit(2);
    };

    let config = match flag_value(&args, "--config") {
        Some(path) => WorkerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path))?
            .with_env_overrides(),
        None => WorkerConfig::from_env(),
    };

    let storage = MemoryCacheStorage::new();
    let worker = OfflineWorkerBuilder::new()
        .config(config)
        .storage(Arc::new(storage.clone()))
        .origin_fetcher(origin)?
        .build()?;

    println!("Origin:     {}", origin);
    println!("Generation: {}", worker.generation_id());

    if let Err(e) = worker.install().await {
        println!("\n❌ install failed: {}", e);
        std::process::exit(1);
    }
    let report = worker.activate().await?;

    let cache = storage.open(worker.generation_id().as_str()).await?;
    println!("\n=== Essential Resources ===");
    for path in &worker.config().essential_resources {
        match cache.match_key(&CacheKey::get(path)).await? {
            Some(resp) => println!("✅ {} ({} bytes, {})", path, resp.body.len(), resp.status),
            None => bail!("{} missing after successful install", path),
        }
    }

    if !report.all_deleted() {
        for (name, e) in &report.failed {
            println!("⚠️  could not delete {}: {}", name, e);
        }
    }
    println!("\nAll {} essential resources cached.", worker.config().essential_resources.len());
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn print_usage() {
    println!(
        r#"precache-check: verify a deploy can be cached for offline use

USAGE:
    precache-check <origin> [--config <path>]

ENVIRONMENT:
    OFFLINE_WORKER_VERSION             Override the version tag
    OFFLINE_WORKER_NAMESPACE           Override the cache namespace
    OFFLINE_WORKER_HTTP_TIMEOUT_SECS   HTTP timeout (default 30)
    RUST_LOG                           Log filter"#
    );
}
