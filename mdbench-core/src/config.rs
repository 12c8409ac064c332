use std::path::PathBuf;

use crate::backend::BackendSelector;
use crate::error::{Error, Result};
use crate::metrics_export::MetricsConfig;
use crate::purge::PurgeCommand;
use crate::step::{StepSpec, default_steps};

pub const DEFAULT_THREADS: u64 = 1;
pub const DEFAULT_FILES: u64 = 100;

/// Inputs of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Root directory; per-thread directories are created below it.
    pub dir: PathBuf,
    pub threads: u64,
    /// Files per thread.
    pub files: u64,
    pub steps: Vec<StepSpec>,
    pub backend: BackendSelector,
    /// Run before every timed step. Ignored for remote backends.
    pub purge: Option<PurgeCommand>,
    pub metrics: Option<MetricsConfig>,
    /// Tags metrics snapshot file names.
    pub pid: u32,
}

impl BenchmarkConfig {
    /// Defaults: one thread, 100 files, all four steps, local backend, no
    /// cache purge, no metrics.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            threads: DEFAULT_THREADS,
            files: DEFAULT_FILES,
            steps: default_steps(),
            backend: BackendSelector::Local,
            purge: None,
            metrics: None,
            pid: std::process::id(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(Error::InvalidThreads);
        }
        if self.files == 0 {
            return Err(Error::InvalidFiles);
        }
        if self.steps.is_empty() {
            return Err(Error::NoSteps);
        }
        Ok(())
    }

    /// Purge command that actually applies to this run.
    pub fn effective_purge(&self) -> Option<&PurgeCommand> {
        self.purge.as_ref().filter(|_| self.backend.is_local())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = BenchmarkConfig::new("/bench");
        assert_eq!(cfg.threads, 1);
        assert_eq!(cfg.files, 100);
        assert_eq!(cfg.steps.len(), 4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_counts_are_config_errors() {
        let mut cfg = BenchmarkConfig::new("/bench");
        cfg.threads = 0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidThreads)));

        let mut cfg = BenchmarkConfig::new("/bench");
        cfg.files = 0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidFiles)));

        let mut cfg = BenchmarkConfig::new("/bench");
        cfg.steps.clear();
        assert!(matches!(cfg.validate(), Err(Error::NoSteps)));
    }

    #[test]
    fn purge_only_applies_to_local_backend() {
        let mut cfg = BenchmarkConfig::new("/bench");
        cfg.purge = Some(PurgeCommand::new("true", Vec::<String>::new()));
        assert!(cfg.effective_purge().is_some());

        cfg.backend = BackendSelector::from_url("memkv://bench");
        assert!(cfg.effective_purge().is_none());
    }
}
