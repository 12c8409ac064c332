use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::step::StepKind;

/// Where a locally mounted client usually exposes its metrics.
pub const DEFAULT_METRICS_ADDR: &str = "127.0.0.1:9567";

/// Prefix shared by the metadata operation counters.
pub const DEFAULT_METRIC_PREFIX: &str = "juicefs_meta_ops";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// `host:port` or a full `http://` URL.
    pub endpoint: String,
    pub out_dir: PathBuf,
    pub prefix: String,
}

impl MetricsConfig {
    pub fn new(endpoint: impl Into<String>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            endpoint: endpoint.into(),
            out_dir: out_dir.into(),
            prefix: DEFAULT_METRIC_PREFIX.to_string(),
        }
    }
}

/// Scrapes the metrics endpoint after a step and keeps the metadata counters.
#[derive(Debug, Clone)]
pub struct MetricsExporter {
    url: String,
    out_dir: PathBuf,
    prefix: String,
    pid: u32,
    client: HttpClient,
}

impl MetricsExporter {
    pub fn new(cfg: &MetricsConfig, pid: u32) -> Result<Self> {
        Ok(Self {
            url: endpoint_url(&cfg.endpoint)?,
            out_dir: cfg.out_dir.clone(),
            prefix: cfg.prefix.clone(),
            pid,
            client: HttpClient::default(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Writes `<out_dir>/<pid>-<index>-<step>` and returns its path.
    pub async fn export(&self, index: usize, kind: StepKind) -> Result<PathBuf> {
        let body = self
            .client
            .get_text(&self.url)
            .await
            .map_err(|source| Error::MetricsFetch {
                url: self.url.clone(),
                source,
            })?;

        tokio::fs::create_dir_all(&self.out_dir)
            .await
            .map_err(|source| Error::MetricsWrite {
                path: self.out_dir.clone(),
                source,
            })?;

        let mut out = String::new();
        let mut lines = 0usize;
        for line in filter_lines(&body, &self.prefix) {
            out.push_str(line);
            out.push('\n');
            lines += 1;
        }

        let path = self
            .out_dir
            .join(snapshot_file_name(self.pid, index, kind));
        tokio::fs::write(&path, out)
            .await
            .map_err(|source| Error::MetricsWrite {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), lines, "metrics snapshot written");
        Ok(path)
    }
}

/// `host:port` becomes `http://host:port/metrics`; URLs are used as given.
pub fn endpoint_url(endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() || endpoint.chars().any(char::is_whitespace) {
        return Err(Error::InvalidMetricsEndpoint(endpoint.to_string()));
    }
    if endpoint.contains("://") {
        return Ok(endpoint.to_string());
    }
    Ok(format!("http://{endpoint}/metrics"))
}

/// Lines starting with `prefix`, in their original order.
pub fn filter_lines<'a>(body: &'a str, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    body.lines().filter(move |line| line.starts_with(prefix))
}

pub fn snapshot_file_name(pid: u32, index: usize, kind: StepKind) -> String {
    format!("{pid}-{index}-{kind}")
}
