use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::backend::{self, Backend};
use crate::config::BenchmarkConfig;
use crate::error::{Error, Result};
use crate::metrics_export::MetricsExporter;
use crate::namespace::Namespace;
use crate::purge::PurgeCommand;
use crate::registry::{Operation, OperationTable};
use crate::report::{ReportFn, StepResult, total_operations};
use crate::step::StepSpec;

/// A prepared benchmark: namespace created, operations bound to a backend.
#[derive(Debug)]
pub struct MetaBench {
    namespace: Namespace,
    files: u64,
    ops: OperationTable,
    purge: Option<PurgeCommand>,
    backend_name: &'static str,
}

impl MetaBench {
    /// Validates `config`, creates the per-thread directories and binds the
    /// step operations to `backend`.
    pub fn prepare(config: &BenchmarkConfig, backend: Arc<dyn Backend>) -> Result<Self> {
        config.validate()?;

        let namespace = Namespace::new(&config.dir, config.threads);
        namespace.prepare(backend.as_ref())?;

        Ok(Self {
            namespace,
            files: config.files,
            purge: config.effective_purge().cloned(),
            backend_name: backend.name(),
            ops: OperationTable::new(backend),
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }

    /// Runs one step on every thread and waits for all of them.
    ///
    /// The clock covers worker launch through the last join; the cache purge
    /// happens before it starts. Every worker has been joined by the time
    /// this returns, including when one of them failed.
    pub async fn run_step(&self, index: usize, spec: StepSpec) -> Result<StepResult> {
        if let Some(purge) = &self.purge {
            purge.run().await;
        }

        let threads = self.namespace.threads();
        let namespace = self.namespace.clone();
        let op = self.ops.get(spec.kind);
        let files = self.files;

        let elapsed =
            tokio::task::spawn_blocking(move || run_workers(&namespace, files, spec, &op))
                .await??;

        let result = StepResult {
            index,
            spec,
            threads,
            files: self.files,
            operations: total_operations(threads, self.files, spec.repeat),
            elapsed,
        };

        tracing::info!(
            step = %spec,
            operations = result.operations,
            elapsed_ms = elapsed.as_millis() as u64,
            ops_per_sec = result.ops_per_sec(),
            "step finished"
        );
        Ok(result)
    }

    /// Runs `steps` in order. A metrics snapshot (when configured) is taken
    /// after each step, and `report` sees every result as soon as it exists.
    pub async fn run(
        &self,
        steps: &[StepSpec],
        metrics: Option<&MetricsExporter>,
        report: Option<ReportFn>,
    ) -> Result<Vec<StepResult>> {
        let mut results = Vec::with_capacity(steps.len());
        for (index, spec) in steps.iter().copied().enumerate() {
            let result = self.run_step(index, spec).await?;

            if let Some(exporter) = metrics {
                exporter.export(index, spec.kind).await?;
            }
            if let Some(report) = &report {
                report(&result);
            }

            results.push(result);
        }
        Ok(results)
    }
}

/// One OS thread per namespace thread, all started before any is joined.
/// Returns the wall time of the step or the first error seen.
fn run_workers(
    namespace: &Namespace,
    files: u64,
    spec: StepSpec,
    op: &Operation,
) -> Result<Duration> {
    let started = Instant::now();
    std::thread::scope(|scope| {
        let mut handles = Vec::new();
        let mut first_err = None;

        for thread in 0..namespace.threads() {
            let spawned = std::thread::Builder::new()
                .name(format!("mdbench-worker-{thread}"))
                .spawn_scoped(scope, move || run_worker(namespace, thread, files, spec, op));
            match spawned {
                Ok(handle) => handles.push((thread, handle)),
                Err(err) => {
                    first_err = Some(Error::WorkerSpawn(err));
                    break;
                }
            }
        }

        for (thread, handle) in handles {
            let outcome = handle
                .join()
                .unwrap_or(Err(Error::WorkerPanicked { thread }));
            if let Err(err) = outcome {
                first_err.get_or_insert(err);
            }
        }

        first_err.map_or(Ok(()), Err)
    })?;
    Ok(started.elapsed())
}

fn run_worker(
    namespace: &Namespace,
    thread: u64,
    files: u64,
    spec: StepSpec,
    op: &Operation,
) -> Result<()> {
    for _ in 0..spec.repeat {
        for path in namespace.thread_files(thread, files) {
            op(&path).map_err(|source| Error::Operation {
                kind: spec.kind,
                path,
                source,
            })?;
        }
    }
    Ok(())
}

/// Connects the configured backend, prepares the namespace and runs every
/// step.
pub async fn run_benchmark(
    config: &BenchmarkConfig,
    report: Option<ReportFn>,
) -> Result<Vec<StepResult>> {
    config.validate()?;

    let exporter = config
        .metrics
        .as_ref()
        .map(|cfg| MetricsExporter::new(cfg, config.pid))
        .transpose()?;
    let backend = backend::connect(&config.backend)?;

    let bench = MetaBench::prepare(config, backend)?;
    tracing::info!(
        dir = %config.dir.display(),
        backend = bench.backend_name(),
        threads = config.threads,
        files = config.files,
        "metadata benchmark start"
    );

    bench.run(&config.steps, exporter.as_ref(), report).await
}
