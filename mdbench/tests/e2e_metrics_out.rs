use std::process::Command;

use anyhow::Context as _;
use mdbench_testserver::{MetricsServer, SAMPLE_METRICS};

#[tokio::test]
async fn e2e_metric_out_writes_one_snapshot_per_step() -> anyhow::Result<()> {
    let server = MetricsServer::start(SAMPLE_METRICS)
        .await
        .context("start metrics server")?;
    let endpoint = server.endpoint();

    let tmp = tempfile::tempdir().context("create tempdir")?;
    let out_dir = tmp.path().join("metrics");
    let exe = env!("CARGO_BIN_EXE_mdbench");

    let run_out_dir = out_dir.clone();
    let out = tokio::task::spawn_blocking(move || {
        Command::new(exe)
            .args(["/bench", "--url", "memkv://metrics"])
            .args(["--threads", "2", "--files", "5"])
            .args(["--steps", "create,stat*2,remove"])
            .args(["--metrics", &endpoint])
            .arg("--metric-out")
            .arg(&run_out_dir)
            .args(["--output", "json"])
            .output()
    })
    .await
    .context("spawn_blocking join")?
    .context("run mdbench binary")?;

    let scrapes = server.stats().scrapes_total();
    server.shutdown().await;

    anyhow::ensure!(
        out.status.success(),
        "mdbench exited with {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr)
    );
    anyhow::ensure!(scrapes == 3, "expected 3 scrapes, got {scrapes}");

    let mut names: Vec<String> = std::fs::read_dir(&out_dir)
        .with_context(|| format!("read {}", out_dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    anyhow::ensure!(names.len() == 3, "unexpected snapshots: {names:?}");

    let pid = names[0]
        .split('-')
        .next()
        .context("snapshot name has a pid")?
        .to_string();
    let expected: Vec<String> = ["0-create", "1-stat", "2-remove"]
        .iter()
        .map(|suffix| format!("{pid}-{suffix}"))
        .collect();
    anyhow::ensure!(names == expected, "unexpected snapshots: {names:?}");

    for name in &names {
        let body = std::fs::read_to_string(out_dir.join(name))
            .with_context(|| format!("read snapshot {name}"))?;
        anyhow::ensure!(!body.is_empty(), "snapshot {name} is empty");
        anyhow::ensure!(
            body.lines().all(|l| l.starts_with("juicefs_meta_ops")),
            "snapshot {name} has unrelated lines:\n{body}"
        );
        anyhow::ensure!(body.ends_with('\n'), "snapshot {name} is not newline terminated");
    }
    Ok(())
}
