use anyhow::Context as _;
use std::path::{Path, PathBuf};

use mdbench_core::{BackendSelector, BenchmarkConfig, MetricsConfig, PurgeCommand, parse_steps};

use crate::cli::Cli;
use crate::exit_codes::ExitCode;
use crate::output::{self, RunHeader};
use crate::profile::CpuProfile;
use crate::run_error::RunError;

pub async fn run(cli: Cli) -> Result<ExitCode, RunError> {
    let out = output::formatter(cli.output);
    let config = benchmark_config(&cli)?;

    let profile = cli
        .cpuprofile
        .as_deref()
        .map(CpuProfile::start)
        .transpose()
        .map_err(RunError::RuntimeError)?;

    out.print_header(&RunHeader {
        dir: config.dir.display().to_string(),
        backend: config.backend.to_string(),
        threads: config.threads,
        files: config.files,
        steps: config.steps.iter().map(ToString::to_string).collect(),
    });

    let results = mdbench_core::run_benchmark(&config, out.report()).await;

    if let Some(profile) = profile {
        profile.finish().map_err(RunError::RuntimeError)?;
    }

    let results = results?;
    if let Some(metrics) = &config.metrics {
        tracing::info!(
            dir = %metrics.out_dir.display(),
            snapshots = results.len(),
            "metrics snapshots written"
        );
    }

    out.print_summary(&results)
        .map_err(RunError::RuntimeError)?;

    Ok(ExitCode::Success)
}

fn benchmark_config(cli: &Cli) -> Result<BenchmarkConfig, RunError> {
    let backend = BackendSelector::from_url(&cli.url);

    let mut config = BenchmarkConfig::new(benchmark_dir(&cli.path, &backend)?);
    config.threads = cli.threads;
    config.files = cli.files;
    config.steps = parse_steps(&cli.steps)?;
    config.purge = purge_command(cli, &backend)?;
    config.metrics = cli.metric_out.as_ref().map(|out_dir| MetricsConfig {
        endpoint: cli.metrics.clone(),
        out_dir: out_dir.clone(),
        prefix: cli.metric_prefix.clone(),
    });
    config.backend = backend;

    config.validate()?;
    Ok(config)
}

/// Local paths are made absolute up front; engine paths are kept as given.
fn benchmark_dir(path: &Path, backend: &BackendSelector) -> Result<PathBuf, RunError> {
    if !backend.is_local() {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(path)
        .with_context(|| format!("resolve benchmark dir: {}", path.display()))
        .map_err(RunError::InvalidInput)
}

fn purge_command(cli: &Cli, backend: &BackendSelector) -> Result<Option<PurgeCommand>, RunError> {
    if cli.no_drop_caches || !backend.is_local() {
        return Ok(None);
    }

    let cmd = PurgeCommand::for_host()?;
    if cmd.needs_elevation() {
        tracing::info!(
            command = %cmd,
            "Clean kernel cache may ask for root privilege..."
        );
    }
    Ok(Some(cmd))
}
