use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

mod format;

use format::{format_cost, format_count, format_rate};

use super::{OutputFormatter, RunHeader};

pub(crate) struct HumanReadableOutput;

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, header: &RunHeader) {
        println!("dir: {}", header.dir);
        println!(
            "backend: {} threads={} files={}",
            header.backend, header.threads, header.files
        );
        println!("steps: {}", header.steps.join(","));
        println!();
    }

    fn report(&self) -> Option<mdbench_core::ReportFn> {
        Some(Arc::new(|r: &mdbench_core::StepResult| {
            println!("{}", step_line(r));
        }))
    }

    fn print_summary(&self, results: &[mdbench_core::StepResult]) -> anyhow::Result<()> {
        print!("{}", render_summary(results));
        Ok(())
    }
}

pub(crate) fn step_line(r: &mdbench_core::StepResult) -> String {
    format!(
        "{}: {} operations, cost {}, OPS={}",
        r.label(),
        r.operations,
        format_cost(r.elapsed),
        format_rate(r.ops_per_sec())
    )
}

pub(crate) fn render_summary(results: &[mdbench_core::StepResult]) -> String {
    let mut out = String::new();
    if results.is_empty() {
        out.push_str("\nsummary: no steps\n");
        return out;
    }

    out.push_str("\nsummary\n");
    writeln!(
        &mut out,
        "  {:<4} {:<12} {:>14} {:>16} {:>14}",
        "#", "step", "operations", "cost", "ops/s"
    )
    .ok();

    let mut total_ops = 0u64;
    let mut total_elapsed = Duration::ZERO;
    for r in results {
        total_ops = total_ops.saturating_add(r.operations);
        total_elapsed = total_elapsed.saturating_add(r.elapsed);
        writeln!(
            &mut out,
            "  {:<4} {:<12} {:>14} {:>16} {:>14}",
            r.index,
            r.spec.to_string(),
            format_count(r.operations),
            format_cost(r.elapsed),
            format_rate(r.ops_per_sec())
        )
        .ok();
    }

    writeln!(
        &mut out,
        "  {:<4} {:<12} {:>14} {:>16} {:>14}",
        "",
        "total",
        format_count(total_ops),
        format_cost(total_elapsed),
        format_rate(mdbench_core::throughput(total_ops, total_elapsed))
    )
    .ok();
    out
}
