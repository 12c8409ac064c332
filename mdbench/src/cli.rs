use clap::Parser;
use std::path::PathBuf;

use mdbench_core::{DEFAULT_METRIC_PREFIX, DEFAULT_METRICS_ADDR, DEFAULT_STEPS};

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report lines and a summary table.
    HumanReadable,
    /// Emit one JSON line per step plus a summary line (NDJSON) to stdout.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "mdbench",
    version,
    about = "Concurrent metadata micro-benchmark",
    long_about = "mdbench measures how fast a filesystem (or a metadata engine) handles create, stat, open and remove.\n\nEach worker thread owns its own directory under PATH and walks its files in order; every step is timed from worker launch to the last join.\n\nSteps accept a repeat count: `stat*3` stats every file three times.",
    after_help = "Examples:\n  mdbench /mnt/jfs/bench\n  mdbench /mnt/jfs/bench --threads 8 --files 1000\n  mdbench /mnt/jfs/bench --steps create,stat*3,remove --output json\n  mdbench /bench --url memkv://bench --threads 4\n  mdbench /mnt/jfs/bench --metric-out ./metrics --metrics 127.0.0.1:9567"
)]
pub struct Cli {
    /// Benchmark root directory (per-thread directories are created below it)
    pub path: PathBuf,

    /// Number of concurrent worker threads
    #[arg(long, default_value_t = 1)]
    pub threads: u64,

    /// Number of files per thread
    #[arg(long, default_value_t = 100)]
    pub files: u64,

    /// Steps to run, in order (NAME or NAME*REPEAT; comma separated or repeatable)
    #[arg(
        long,
        value_name = "STEP",
        value_delimiter = ',',
        default_values_t = DEFAULT_STEPS.map(String::from)
    )]
    pub steps: Vec<String>,

    /// Metadata engine URL (e.g. memkv://bench); empty benchmarks the local filesystem
    #[arg(long, default_value = "")]
    pub url: String,

    /// Do not drop kernel caches before each step
    #[arg(long)]
    pub no_drop_caches: bool,

    /// Write a pprof CPU profile of the whole run to this file
    #[arg(long, value_name = "FILE")]
    pub cpuprofile: Option<PathBuf>,

    /// Metrics endpoint to scrape after each step (host:port or http:// URL)
    #[arg(long, default_value = DEFAULT_METRICS_ADDR)]
    pub metrics: String,

    /// Directory for per-step metrics snapshots (enables scraping)
    #[arg(long, value_name = "DIR")]
    pub metric_out: Option<PathBuf>,

    /// Keep only metric lines starting with this prefix
    #[arg(long, default_value = DEFAULT_METRIC_PREFIX)]
    pub metric_prefix: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::HumanReadable)]
    pub output: OutputFormat,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        match Cli::try_parse_from(args) {
            Ok(v) => v,
            Err(err) => panic!("failed to parse args: {err}"),
        }
    }

    #[test]
    fn cli_defaults() {
        let cli = parse(&["mdbench", "/mnt/bench"]);

        assert_eq!(cli.path, PathBuf::from("/mnt/bench"));
        assert_eq!(cli.threads, 1);
        assert_eq!(cli.files, 100);
        assert_eq!(cli.steps, vec!["create", "stat", "open", "remove"]);
        assert!(cli.url.is_empty());
        assert!(!cli.no_drop_caches);
        assert!(cli.cpuprofile.is_none());
        assert_eq!(cli.metrics, "127.0.0.1:9567");
        assert!(cli.metric_out.is_none());
        assert_eq!(cli.metric_prefix, "juicefs_meta_ops");
        assert!(matches!(cli.output, OutputFormat::HumanReadable));
        assert!(!cli.debug);
    }

    #[test]
    fn cli_parses_all_flags() {
        let cli = parse(&[
            "mdbench",
            "bench",
            "--threads",
            "4",
            "--files",
            "10",
            "--steps",
            "create,stat*3",
            "--steps",
            "rm",
            "--url",
            "memkv://x",
            "--no-drop-caches",
            "--cpuprofile",
            "cpu.pb",
            "--metrics",
            "10.0.0.1:9000",
            "--metric-out",
            "out",
            "--metric-prefix",
            "juicefs_meta",
            "--output",
            "json",
            "--debug",
        ]);

        assert_eq!(cli.threads, 4);
        assert_eq!(cli.files, 10);
        assert_eq!(cli.steps, vec!["create", "stat*3", "rm"]);
        assert_eq!(cli.url, "memkv://x");
        assert!(cli.no_drop_caches);
        assert_eq!(cli.cpuprofile, Some(PathBuf::from("cpu.pb")));
        assert_eq!(cli.metrics, "10.0.0.1:9000");
        assert_eq!(cli.metric_out, Some(PathBuf::from("out")));
        assert_eq!(cli.metric_prefix, "juicefs_meta");
        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(cli.debug);
    }

    #[test]
    fn cli_requires_path_and_numeric_counts() {
        assert!(Cli::try_parse_from(["mdbench"]).is_err());
        assert!(Cli::try_parse_from(["mdbench", "p", "--threads", "many"]).is_err());
        assert!(Cli::try_parse_from(["mdbench", "p", "--files", "-1"]).is_err());
    }
}
