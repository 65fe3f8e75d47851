//! Sort direction, sort specs and the value comparator.
//!
//! [`compare_values`] is a total order over [`Value`]: same-typed values
//! compare naturally (strings case-insensitively), values of different types
//! compare by a fixed type rank, and absent values always come last. The
//! direction in a [`SortSpec`] only ever flips the comparison of present
//! values, so absent values stay at the end in both directions.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the other direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The active sort: a registered sort key and a direction.
///
/// Parses from and prints as `key`, `key:asc` or `key:desc`.
///
/// ```
/// use listquery::{Dir, SortSpec};
///
/// let spec: SortSpec = "created_at:desc".parse().unwrap();
/// assert_eq!(spec, SortSpec::desc("created_at"));
/// assert_eq!(spec.to_string(), "created_at:desc");
/// assert_eq!("title".parse::<SortSpec>().unwrap().dir, Dir::Asc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// The sort key, as registered in the engine config.
    pub key: String,
    /// The sort direction.
    #[serde(default)]
    pub dir: Dir,
}

impl SortSpec {
    /// Creates a sort spec with the given direction.
    pub fn new(key: impl Into<String>, dir: Dir) -> Self {
        SortSpec {
            key: key.into(),
            dir,
        }
    }

    /// Creates an ascending sort spec.
    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, Dir::Asc)
    }

    /// Creates a descending sort spec.
    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, Dir::Desc)
    }

    /// Compares two values according to this spec.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        compare_values(a, b, self.dir)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.dir)
    }
}

impl FromStr for SortSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSortSpec(s.to_string());
        let (key, dir) = match s.rsplit_once(':') {
            Some((key, "asc")) => (key, Dir::Asc),
            Some((key, "desc")) => (key, Dir::Desc),
            Some(_) => return Err(invalid()),
            None => (s, Dir::Asc),
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(invalid());
        }
        Ok(SortSpec::new(key, dir))
    }
}

/// Compares two values for sorting in the given direction.
///
/// Absent values sort last regardless of `dir`. Present values of the same
/// type compare naturally, strings without regard to case. Present values of
/// different types compare by type rank (bool, number, timestamp, enum,
/// string).
pub fn compare_values(a: &Value<'_>, b: &Value<'_>, dir: Dir) -> Ordering {
    match (a.sort_value(), b.sort_value()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => dir.apply(compare_present(a, b)),
    }
}

fn compare_present(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.compare(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Enum(a), Value::Enum(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => match (a.text(), b.text()) {
            (Some(a), Some(b)) => compare_case_insensitive(a, b),
            _ => a.type_rank().cmp(&b.type_rank()),
        },
    }
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    let a = a.chars().flat_map(char::to_lowercase);
    let b = b.chars().flat_map(char::to_lowercase);
    a.cmp(b)
}
