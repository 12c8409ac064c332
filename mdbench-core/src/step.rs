use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Step tokens used when the caller does not pass any.
pub const DEFAULT_STEPS: [&str; 4] = ["create", "stat", "open", "remove"];

/// A measured metadata operation.
///
/// Parsing accepts the full name and the short aliases; `Display` always
/// yields the full lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum StepKind {
    #[strum(to_string = "create", serialize = "c")]
    Create,

    #[strum(to_string = "stat", serialize = "s")]
    Stat,

    #[strum(to_string = "open", serialize = "o")]
    Open,

    #[strum(
        to_string = "remove",
        serialize = "rm",
        serialize = "r",
        serialize = "delete",
        serialize = "del",
        serialize = "d"
    )]
    Remove,
}

impl StepKind {
    pub const COUNT: usize = 4;

    pub const ALL: [StepKind; Self::COUNT] =
        [Self::Create, Self::Stat, Self::Open, Self::Remove];

    /// Position of this kind in fixed-size per-kind tables.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-cased name used in throughput reports.
    #[must_use]
    pub fn label(self) -> String {
        self.to_string().to_ascii_uppercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepSpec {
    pub kind: StepKind,
    pub repeat: u64,
}

impl StepSpec {
    #[must_use]
    pub fn new(kind: StepKind) -> Self {
        Self { kind, repeat: 1 }
    }

    #[must_use]
    pub fn repeated(kind: StepKind, repeat: u64) -> Self {
        Self { kind, repeat }
    }
}

impl fmt::Display for StepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeat == 1 {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}*{}", self.kind, self.repeat)
        }
    }
}

impl FromStr for StepSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_step(s)
    }
}

/// Parses `NAME` or `NAME*REPEAT`.
pub fn parse_step(token: &str) -> Result<StepSpec> {
    let token = token.trim();
    let (name, repeat) = match token.split_once('*') {
        Some((name, repeat)) => (name.trim(), Some(repeat.trim())),
        None => (token, None),
    };

    let kind = StepKind::from_str(name).map_err(|_| Error::UnknownStep(name.to_string()))?;

    let repeat = match repeat {
        None => 1,
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| Error::InvalidRepeat(token.to_string()))?,
    };

    Ok(StepSpec { kind, repeat })
}

/// Parses every token, failing on the first invalid one. Order is preserved
/// and the same kind may appear more than once.
pub fn parse_steps<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<StepSpec>> {
    tokens.iter().map(|t| parse_step(t.as_ref())).collect()
}

#[must_use]
pub fn default_steps() -> Vec<StepSpec> {
    StepKind::ALL.iter().copied().map(StepSpec::new).collect()
}
