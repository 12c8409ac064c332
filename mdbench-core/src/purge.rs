use std::fmt;

use crate::error::{Error, Result};

/// External command that asks the kernel to drop its page/inode caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeCommand {
    program: String,
    args: Vec<String>,
}

impl PurgeCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The cache drop command for the current host, wrapped in `sudo` when
    /// not running as root.
    pub fn for_host() -> Result<Self> {
        let mut argv: Vec<&str> = Vec::new();
        if !is_privileged() {
            argv.push("sudo");
        }
        argv.extend(host_argv()?);

        let (program, args) = argv
            .split_first()
            .ok_or(Error::UnsupportedPlatform(std::env::consts::OS))?;
        Ok(Self::new(*program, args.iter().copied()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn needs_elevation(&self) -> bool {
        self.program == "sudo"
    }

    /// Runs the command to completion. Failure is reported as a warning and
    /// `false`; callers carry on with whatever cache state exists.
    pub async fn run(&self) -> bool {
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .status()
            .await;

        match status {
            Ok(status) if status.success() => {
                tracing::debug!(command = %self, "kernel caches dropped");
                true
            }
            Ok(status) => {
                tracing::warn!(command = %self, %status, "Failed to clean kernel caches");
                false
            }
            Err(err) => {
                tracing::warn!(command = %self, error = %err, "Failed to clean kernel caches");
                false
            }
        }
    }
}

impl fmt::Display for PurgeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote_for_display(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote_for_display(arg))?;
        }
        Ok(())
    }
}

fn quote_for_display(s: &str) -> String {
    // Not a shell-accurate escaper; just makes spaces/specials unambiguous in logs.
    let needs_quotes = s
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\\'));
    if !needs_quotes {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(target_os = "linux")]
fn host_argv() -> Result<[&'static str; 3]> {
    Ok(["/bin/sh", "-c", "echo 3 > /proc/sys/vm/drop_caches"])
}

#[cfg(target_os = "macos")]
fn host_argv() -> Result<[&'static str; 1]> {
    Ok(["purge"])
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn host_argv() -> Result<[&'static str; 0]> {
    Err(Error::UnsupportedPlatform(std::env::consts::OS))
}

#[cfg(unix)]
fn is_privileged() -> bool {
    nix::unistd::getuid().is_root()
}

#[cfg(not(unix))]
fn is_privileged() -> bool {
    false
}
