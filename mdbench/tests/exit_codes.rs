use std::process::Command;

use anyhow::Context as _;

fn status_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

fn run_mdbench(args: &[&str]) -> anyhow::Result<std::process::Output> {
    let exe = env!("CARGO_BIN_EXE_mdbench");
    Command::new(exe)
        .args(args)
        .output()
        .context("run mdbench binary")
}

fn ensure_exit(out: &std::process::Output, expected: i32) -> anyhow::Result<()> {
    anyhow::ensure!(
        status_code(out.status) == expected,
        "expected exit code {expected}, got {}\nstdout:\n{}\nstderr:\n{}",
        status_code(out.status),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    Ok(())
}

#[test]
fn help_exits_0() -> anyhow::Result<()> {
    let out = run_mdbench(&["--help"])?;
    ensure_exit(&out, 0)
}

#[test]
fn invalid_flags_exit_30() -> anyhow::Result<()> {
    let out = run_mdbench(&["./bench", "--threads", "lots"])?;
    ensure_exit(&out, 30)
}

#[test]
fn zero_threads_exit_30() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dir = tmp.path().join("bench");
    let dir = dir.to_string_lossy();

    let out = run_mdbench(&[&dir, "--threads", "0", "--no-drop-caches"])?;
    ensure_exit(&out, 30)
}

#[test]
fn unknown_step_exit_30() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dir = tmp.path().to_string_lossy();

    let out = run_mdbench(&[&dir, "--steps", "create,rename", "--no-drop-caches"])?;
    ensure_exit(&out, 30)?;
    anyhow::ensure!(
        String::from_utf8_lossy(&out.stderr).contains("rename"),
        "stderr should name the bad step"
    );
    Ok(())
}

#[test]
fn unsupported_engine_exit_30() -> anyhow::Result<()> {
    let out = run_mdbench(&["/bench", "--url", "redis://localhost:6379/1"])?;
    ensure_exit(&out, 30)
}

#[test]
fn stat_on_missing_files_exit_20() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dir = tmp.path().to_string_lossy();

    let out = run_mdbench(&[
        &dir,
        "--threads",
        "2",
        "--files",
        "3",
        "--steps",
        "stat",
        "--no-drop-caches",
    ])?;
    ensure_exit(&out, 20)?;
    anyhow::ensure!(
        String::from_utf8_lossy(&out.stderr).contains("failed to stat"),
        "stderr should name the failed operation"
    );
    Ok(())
}

#[test]
fn unreachable_metrics_endpoint_exit_40() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir().context("create tempdir")?;
    let dir = tmp.path().join("bench");
    let dir = dir.to_string_lossy();
    let metrics_dir = tmp.path().join("metrics");
    let metrics_dir = metrics_dir.to_string_lossy();

    let out = run_mdbench(&[
        &dir,
        "--files",
        "1",
        "--steps",
        "create",
        "--no-drop-caches",
        "--metrics",
        "127.0.0.1:1",
        "--metric-out",
        &metrics_dir,
    ])?;
    ensure_exit(&out, 40)
}
