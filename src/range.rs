use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// Requested `n` values: `start..=end`, or everything from `start` when `end` is `None`.
///
/// Serialized in the same text form the command line accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Range {
    pub start: u64,
    pub end: Option<u64>,
}

impl Range {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end: Some(end) }
    }

    pub fn from_start(start: u64) -> Self {
        Self { start, end: None }
    }

    pub fn is_unbounded(&self) -> bool {
        self.end.is_none()
    }

    pub fn validate(&self) -> Result<(), GenerateError> {
        match self.end {
            Some(end) if end < self.start => Err(GenerateError::InvalidRange(format!(
                "end ({end}) must be >= start ({})",
                self.start
            ))),
            _ => Ok(()),
        }
    }

    /// The part of this range at or above `min`, or `None` if empty.
    pub fn clamp_start(&self, min: u64) -> Option<Range> {
        let start = self.start.max(min);
        match self.end {
            Some(end) if start > end => None,
            end => Some(Range { start, end }),
        }
    }

    pub fn contains(&self, n: u64) -> bool {
        n >= self.start && self.end.map_or(true, |end| n <= end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) if end == self.start => write!(f, "{end}"),
            Some(end) => write!(f, "{}-{end}", self.start),
            None => write!(f, "{}-inf", self.start),
        }
    }
}

fn parse_bound(text: &str, label: &str) -> Result<u64, GenerateError> {
    text.trim().parse().map_err(|_| {
        GenerateError::InvalidRange(format!("{label} {text:?} is not a non-negative integer"))
    })
}

/// Accepts `N`, `A-B`, `A-` and `A-inf`.
impl FromStr for Range {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let range = match s.split_once('-') {
            None => {
                let n = parse_bound(s, "bound")?;
                Range::new(n, n)
            }
            Some((start, end)) => {
                let start = parse_bound(start, "start")?;
                match end.trim() {
                    "" | "inf" | "infinity" | "\u{221e}" => Range::from_start(start),
                    end => Range::new(start, parse_bound(end, "end")?),
                }
            }
        };
        range.validate()?;
        Ok(range)
    }
}

impl TryFrom<String> for Range {
    type Error = GenerateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Range> for String {
    fn from(range: Range) -> Self {
        range.to_string()
    }
}

/// Inclusive bounds of `n` values actually generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRange {
    pub start: u64,
    pub end: u64,
}

impl GeneratedRange {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn single(n: u64) -> Self {
        Self { start: n, end: n }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, n: u64) -> bool {
        (self.start..=self.end).contains(&n)
    }
}

impl fmt::Display for GeneratedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
