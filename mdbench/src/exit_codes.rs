#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,

    /// A create/stat/open/remove call failed during a timed step.
    OperationFailed = 20,

    /// Invalid CLI/config/options (bad flags, unknown steps, unsupported engine URL, etc.).
    InvalidInput = 30,

    /// Internal/runtime error (setup, metrics export, profiling, IO).
    RuntimeError = 40,
}

impl ExitCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
