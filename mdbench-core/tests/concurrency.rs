use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use mdbench_core::{Backend, BackendError, BenchmarkConfig, MetaBench, StepKind, StepSpec};

/// `stat` returns only once `expected` callers are inside it at the same
/// time, or fails after `deadline`.
struct Rendezvous {
    expected: u64,
    arrived: AtomicU64,
    deadline: Duration,
}

impl Rendezvous {
    fn new(expected: u64) -> Self {
        Self {
            expected,
            arrived: AtomicU64::new(0),
            deadline: Duration::from_secs(10),
        }
    }
}

impl Backend for Rendezvous {
    fn name(&self) -> &'static str {
        "rendezvous"
    }

    fn ensure_dir(&self, _path: &Path) -> Result<(), BackendError> {
        Ok(())
    }

    fn create(&self, _path: &Path) -> Result<(), BackendError> {
        Ok(())
    }

    fn stat(&self, _path: &Path) -> Result<(), BackendError> {
        self.arrived.fetch_add(1, Ordering::SeqCst);
        let started = Instant::now();
        while self.arrived.load(Ordering::SeqCst) < self.expected {
            if started.elapsed() > self.deadline {
                return Err(std::io::Error::from(std::io::ErrorKind::TimedOut).into());
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(())
    }

    fn open(&self, _path: &Path) -> Result<(), BackendError> {
        Ok(())
    }

    fn remove(&self, _path: &Path) -> Result<(), BackendError> {
        Ok(())
    }
}

async fn all_workers_run_at_once(threads: u64) -> anyhow::Result<()> {
    let backend = Arc::new(Rendezvous::new(threads));
    let mut cfg = BenchmarkConfig::new("/bench");
    cfg.threads = threads;
    cfg.files = 1;

    let bench = MetaBench::prepare(&cfg, backend.clone())?;
    let result = bench
        .run_step(0, StepSpec::new(StepKind::Stat))
        .await
        .with_context(|| format!("{threads} workers were not all running concurrently"))?;

    anyhow::ensure!(result.operations == threads, "unexpected operations");
    anyhow::ensure!(
        backend.arrived.load(Ordering::SeqCst) == threads,
        "every worker should have called stat once"
    );
    Ok(())
}

#[tokio::test]
async fn every_thread_runs_concurrently() -> anyhow::Result<()> {
    all_workers_run_at_once(100).await
}

#[tokio::test]
async fn thread_count_above_blocking_pool_size_runs_concurrently() -> anyhow::Result<()> {
    all_workers_run_at_once(600).await
}
