pub mod backend;
pub mod client;
pub mod http;

mod config;
mod driver;
mod error;
mod metrics_export;
mod namespace;
mod purge;
mod registry;
mod report;
mod step;

pub use backend::{Backend, BackendError, BackendSelector, LocalBackend, RemoteBackend};
pub use client::{MemKvClient, MetaClient};
pub use config::{BenchmarkConfig, DEFAULT_FILES, DEFAULT_THREADS};
pub use driver::{MetaBench, run_benchmark};
pub use error::{Error, ErrorKind, Result};
pub use metrics_export::{
    DEFAULT_METRIC_PREFIX, DEFAULT_METRICS_ADDR, MetricsConfig, MetricsExporter, endpoint_url,
    filter_lines, snapshot_file_name,
};
pub use namespace::{FILE_PREFIX, Namespace, THREAD_DIR_PREFIX};
pub use purge::PurgeCommand;
pub use registry::{Operation, OperationTable};
pub use report::{ReportFn, StepResult, throughput, total_operations};
pub use step::{DEFAULT_STEPS, StepKind, StepSpec, default_steps, parse_step, parse_steps};
