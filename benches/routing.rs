//! Benchmarks for the request hot path
//!
//! This benchmark measures:
//! - Cache key normalization
//! - Static asset served from the active generation
//! - Navigation falling back to the cache while offline

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use offline_worker::cache::CacheKey;
use offline_worker::{
    FetchError, Fetcher, OfflineWorker, OfflineWorkerBuilder, Request, Response, WorkerConfig,
};

struct BenchSite {
    offline: AtomicBool,
}

#[async_trait]
impl Fetcher for BenchSite {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(FetchError::Network("offline".into()));
        }
        Ok(Response::ok(format!("body of {}", request.url)))
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn active_worker(rt: &tokio::runtime::Runtime) -> (OfflineWorker, Arc<BenchSite>) {
    let site = Arc::new(BenchSite {
        offline: AtomicBool::new(false),
    });
    let worker = OfflineWorkerBuilder::new()
        .config(WorkerConfig::default())
        .fetcher(site.clone())
        .build()
        .unwrap();
    rt.block_on(async {
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
    });
    (worker, site)
}

fn bench_cache_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_key");

    for url in [
        "/project.css",
        "https://archaeology.world/fotos/b920f10b-c8ff-4e69-aeaf-515171ddf4ec.jpg",
        "https://archaeology.world/sites?region=aegean#map",
    ] {
        group.bench_with_input(BenchmarkId::new("normalize", url.len()), url, |b, url| {
            b.iter(|| CacheKey::get(black_box(url)))
        });
    }

    group.finish();
}

fn bench_static_hit(c: &mut Criterion) {
    let rt = runtime();
    let (worker, _site) = active_worker(&rt);
    let request = Request::get("/project.css");

    c.bench_function("static_asset_cache_hit", |b| {
        let (worker, request) = (&worker, &request);
        b.to_async(&rt)
            .iter(|| async move { black_box(worker.handle_fetch(request).await) })
    });
}

fn bench_offline_navigation(c: &mut Criterion) {
    let rt = runtime();
    let (worker, site) = active_worker(&rt);
    site.offline.store(true, Ordering::Relaxed);
    let request = Request::navigate("/sites/unvisited");

    c.bench_function("navigation_offline_fallback", |b| {
        let (worker, request) = (&worker, &request);
        b.to_async(&rt)
            .iter(|| async move { black_box(worker.handle_fetch(request).await) })
    });
}

criterion_group!(
    benches,
    bench_cache_key,
    bench_static_hit,
    bench_offline_navigation
);
criterion_main!(benches);
