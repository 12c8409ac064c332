use mdbench_core::ErrorKind;

use crate::exit_codes::ExitCode;

#[derive(Debug)]
pub enum RunError {
    InvalidInput(anyhow::Error),
    OperationFailed(anyhow::Error),
    RuntimeError(anyhow::Error),
}

impl RunError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidInput(_) => ExitCode::InvalidInput,
            Self::OperationFailed(_) => ExitCode::OperationFailed,
            Self::RuntimeError(_) => ExitCode::RuntimeError,
        }
    }

    #[must_use]
    pub fn anyhow(&self) -> &anyhow::Error {
        match self {
            Self::InvalidInput(e) | Self::OperationFailed(e) | Self::RuntimeError(e) => e,
        }
    }
}

impl From<mdbench_core::Error> for RunError {
    fn from(err: mdbench_core::Error) -> Self {
        match err.kind() {
            ErrorKind::Config => Self::InvalidInput(err.into()),
            ErrorKind::Operation => Self::OperationFailed(err.into()),
            ErrorKind::Setup | ErrorKind::Metrics | ErrorKind::Runtime => {
                Self::RuntimeError(err.into())
            }
        }
    }
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(e) | Self::OperationFailed(e) | Self::RuntimeError(e) => {
                write!(f, "{e:#}")
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.anyhow().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdbench_core::StepKind;
    use std::path::PathBuf;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let config: RunError = mdbench_core::Error::InvalidThreads.into();
        assert_eq!(config.exit_code(), ExitCode::InvalidInput);

        let op: RunError = mdbench_core::Error::Operation {
            kind: StepKind::Stat,
            path: PathBuf::from("/bench/meta-bench-0/file-0"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound).into(),
        }
        .into();
        assert_eq!(op.exit_code(), ExitCode::OperationFailed);

        let setup: RunError = mdbench_core::Error::Prepare {
            path: PathBuf::from("/bench"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied).into(),
        }
        .into();
        assert_eq!(setup.exit_code(), ExitCode::RuntimeError);
    }
}
