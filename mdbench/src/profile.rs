//! Whole-run CPU profiling written as a pprof protobuf.

use std::path::{Path, PathBuf};

#[cfg(unix)]
const SAMPLE_FREQUENCY_HZ: i32 = 100;

#[cfg(unix)]
pub(crate) struct CpuProfile {
    guard: pprof::ProfilerGuard<'static>,
    path: PathBuf,
}

#[cfg(unix)]
impl CpuProfile {
    pub(crate) fn start(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context as _;

        let guard = pprof::ProfilerGuardBuilder::default()
            .frequency(SAMPLE_FREQUENCY_HZ)
            .blocklist(&["libc", "libgcc", "pthread", "vdso"])
            .build()
            .context("start CPU profiler")?;
        tracing::debug!(path = %path.display(), "CPU profiler started");

        Ok(Self {
            guard,
            path: path.to_path_buf(),
        })
    }

    pub(crate) fn finish(self) -> anyhow::Result<PathBuf> {
        use anyhow::Context as _;
        use pprof::protos::Message as _;

        let report = self
            .guard
            .report()
            .build()
            .context("build CPU profile report")?;
        let samples: isize = report.data.values().copied().sum();
        if samples == 0 {
            tracing::warn!(
                path = %self.path.display(),
                "no CPU profile samples collected; the run may be too short"
            );
        }

        let profile = report.pprof().context("convert CPU profile to pprof")?;
        let mut content = Vec::new();
        profile
            .encode(&mut content)
            .context("encode CPU profile")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("write CPU profile: {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), samples, "CPU profile written");
        Ok(self.path)
    }
}

#[cfg(not(unix))]
pub(crate) struct CpuProfile {
    path: PathBuf,
}

#[cfg(not(unix))]
impl CpuProfile {
    pub(crate) fn start(path: &Path) -> anyhow::Result<Self> {
        anyhow::bail!(
            "--cpuprofile is only supported on unix (requested {})",
            path.display()
        )
    }

    pub(crate) fn finish(self) -> anyhow::Result<PathBuf> {
        Ok(self.path)
    }
}
