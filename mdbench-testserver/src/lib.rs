use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const PATH_METRICS: &str = "/metrics";
pub const PATH_BROKEN: &str = "/broken";

/// A Prometheus-style exposition body with a few metadata counters mixed in
/// with unrelated series.
pub const SAMPLE_METRICS: &str = "\
# HELP juicefs_meta_ops_durations_histogram_seconds Operation latency distributions.
# TYPE juicefs_meta_ops_durations_histogram_seconds histogram
juicefs_meta_ops_durations_histogram_seconds_bucket{method=\"Create\",le=\"0.001\"} 10
go_goroutines 42
juicefs_meta_ops_durations_histogram_seconds_count{method=\"Create\"} 10
juicefs_uptime 12.5
juicefs_meta_ops_durations_histogram_seconds_sum{method=\"Unlink\"} 0.25
process_open_fds 9
";

#[derive(Debug, Clone)]
struct AppState {
    body: Arc<str>,
    stats: MetricsServerStats,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsServerStats {
    scrapes_total: Arc<AtomicU64>,
}

impl MetricsServerStats {
    fn inc_scrapes_total(&self) {
        self.scrapes_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn scrapes_total(&self) -> u64 {
        self.scrapes_total.load(Ordering::Relaxed)
    }
}

async fn handle_metrics(State(state): State<AppState>) -> String {
    state.stats.inc_scrapes_total();
    state.body.to_string()
}

async fn handle_broken(State(state): State<AppState>) -> (StatusCode, &'static str) {
    state.stats.inc_scrapes_total();
    (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
}

pub fn router(body: impl Into<Arc<str>>, stats: MetricsServerStats) -> Router {
    let state = AppState {
        body: body.into(),
        stats,
    };
    Router::new()
        .route(PATH_METRICS, get(handle_metrics))
        .route(PATH_BROKEN, get(handle_broken))
        .with_state(state)
}

/// Serves a fixed metrics body on an ephemeral localhost port.
pub struct MetricsServer {
    addr: SocketAddr,
    stats: MetricsServerStats,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl MetricsServer {
    pub async fn start(body: impl Into<Arc<str>>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let stats = MetricsServerStats::default();
        let app = router(body, stats.clone());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = serve.await;
        });

        Ok(Self {
            addr,
            stats,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `host:port`, the form accepted by `--metrics`.
    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    pub fn metrics_url(&self) -> String {
        format!("http://{}{PATH_METRICS}", self.addr)
    }

    pub fn broken_url(&self) -> String {
        format!("http://{}{PATH_BROKEN}", self.addr)
    }

    pub fn stats(&self) -> &MetricsServerStats {
        &self.stats
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for MetricsServer {
    fn drop(&mut self) {
        if self.shutdown_tx.is_some()
            && let Some(task) = self.task.take()
        {
            task.abort();
        }
    }
}
