use serde::Serialize;
use std::io::Write as _;
use std::sync::Arc;
use std::time::Duration;

use super::{OutputFormatter, RunHeader};

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, _header: &RunHeader) {}

    fn report(&self) -> Option<mdbench_core::ReportFn> {
        Some(Arc::new(move |r: &mdbench_core::StepResult| {
            let line = build_step_line(r);
            emit_json_line(&line);
        }))
    }

    fn print_summary(&self, results: &[mdbench_core::StepResult]) -> anyhow::Result<()> {
        let line = build_summary_line(results);
        emit_json_line(&line);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonStepLine {
    pub kind: &'static str,
    pub index: usize,
    pub step: String,
    pub repeat: u64,
    pub threads: u64,
    pub files: u64,
    pub operations: u64,
    pub elapsed_secs: f64,
    pub ops_per_sec: f64,
}

fn build_step_line(r: &mdbench_core::StepResult) -> JsonStepLine {
    JsonStepLine {
        kind: "step",
        index: r.index,
        step: r.kind().to_string(),
        repeat: r.spec.repeat,
        threads: r.threads,
        files: r.files,
        operations: r.operations,
        elapsed_secs: r.elapsed.as_secs_f64(),
        ops_per_sec: finite_or_zero(r.ops_per_sec()),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub steps: usize,
    pub operations_total: u64,
    pub elapsed_secs_total: f64,
    pub ops_per_sec: f64,
}

fn build_summary_line(results: &[mdbench_core::StepResult]) -> JsonSummaryLine {
    let operations_total = results
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.operations));
    let elapsed = results
        .iter()
        .fold(Duration::ZERO, |acc, r| acc.saturating_add(r.elapsed));

    JsonSummaryLine {
        kind: "summary",
        steps: results.len(),
        operations_total,
        elapsed_secs_total: elapsed.as_secs_f64(),
        ops_per_sec: if results.is_empty() {
            0.0
        } else {
            finite_or_zero(mdbench_core::throughput(operations_total, elapsed))
        },
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn emit_json_line<T: Serialize>(line: &T) {
    let mut out = std::io::stdout().lock();
    if serde_json::to_writer(&mut out, line).is_ok() {
        let _ = writeln!(out);
    }
}
