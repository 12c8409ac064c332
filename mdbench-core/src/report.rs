use std::sync::Arc;
use std::time::Duration;

use crate::step::{StepKind, StepSpec};

/// Called once per completed step, in step order.
pub type ReportFn = Arc<dyn Fn(&StepResult) + Send + Sync>;

/// Outcome of one measured step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// 0-based position in the step list.
    pub index: usize,
    pub spec: StepSpec,
    pub threads: u64,
    pub files: u64,
    pub operations: u64,
    /// Wall time from launching the first worker to joining the last one.
    pub elapsed: Duration,
}

impl StepResult {
    pub fn kind(&self) -> StepKind {
        self.spec.kind
    }

    pub fn label(&self) -> String {
        self.spec.kind.label()
    }

    pub fn ops_per_sec(&self) -> f64 {
        throughput(self.operations, self.elapsed)
    }
}

#[must_use]
pub fn total_operations(threads: u64, files: u64, repeat: u64) -> u64 {
    threads.saturating_mul(files).saturating_mul(repeat)
}

#[must_use]
pub fn throughput(operations: u64, elapsed: Duration) -> f64 {
    (operations as f64) / elapsed.as_secs_f64().max(1e-9)
}
