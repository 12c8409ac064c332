use crate::cli::OutputFormat;

mod human;
mod json;

/// What is being benchmarked, printed once before the first step.
#[derive(Debug, Clone)]
pub(crate) struct RunHeader {
    pub dir: String,
    pub backend: String,
    pub threads: u64,
    pub files: u64,
    pub steps: Vec<String>,
}

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(&self, header: &RunHeader);
    fn report(&self) -> Option<mdbench_core::ReportFn>;
    fn print_summary(&self, results: &[mdbench_core::StepResult]) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}
