//! Field access for JSON records.
//!
//! Console records arrive as loosely shaped JSON: fields go missing, some
//! endpoints wrap the interesting bits in an embedded `response` object,
//! timestamps come as RFC 3339 strings and amounts as decimal strings.
//! [`FieldSpec`] absorbs all of that and hands the engine a plain
//! [`Value`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use listquery::{Accessor, Number, Timestamp, Value};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::{ConsoleError, Result};

/// A dotted path into a JSON record, e.g. `response.user.email` or `tags.0`.
///
/// Numeric segments index into arrays; every other segment is an object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Resolves the path against a record.
    ///
    /// Returns `None` when any segment is missing or the path walks into a
    /// scalar.
    pub fn lookup<'a>(&self, record: &'a Json) -> Option<&'a Json> {
        self.segments
            .iter()
            .try_fold(record, |current, segment| match current {
                Json::Object(map) => map.get(segment),
                Json::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for FieldPath {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        let segments: Vec<String> = s.split('.').map(str::to_string).collect();
        if segments.iter().any(|seg| seg.trim().is_empty()) {
            return Err(ConsoleError::InvalidFieldPath(s.to_string()));
        }
        Ok(FieldPath {
            raw: s.to_string(),
            segments,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// How a JSON field is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Take the JSON type at face value.
    #[default]
    Auto,
    /// Scalars read as their text, so `10` sorts before `9`.
    Text,
    /// Numbers, and strings holding a number (`"12.50"`).
    Number,
    /// RFC 3339 / `YYYY-MM-DD[ HH:MM:SS]` strings, or integer milliseconds.
    Timestamp,
}

/// One logical field: paths tried in order, plus how to read the value.
///
/// In a view file a field is written as a single path, a list of fallback
/// paths, or a map:
///
/// ```yaml
/// title: title
/// event_type: [event_type, response.event_type]
/// created_at: { paths: [created_at, response.created_at], kind: timestamp }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "FieldSpecRepr")]
pub struct FieldSpec {
    paths: Vec<FieldPath>,
    kind: FieldKind,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldSpecRepr {
    Path(String),
    Paths(Vec<String>),
    Full {
        #[serde(alias = "path")]
        paths: OneOrMany,
        #[serde(default)]
        kind: FieldKind,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<FieldSpecRepr> for FieldSpec {
    type Error = ConsoleError;

    fn try_from(repr: FieldSpecRepr) -> Result<Self> {
        let (paths, kind) = match repr {
            FieldSpecRepr::Path(p) => (vec![p], FieldKind::Auto),
            FieldSpecRepr::Paths(ps) => (ps, FieldKind::Auto),
            FieldSpecRepr::Full { paths, kind } => match paths {
                OneOrMany::One(p) => (vec![p], kind),
                OneOrMany::Many(ps) => (ps, kind),
            },
        };
        FieldSpec::with_kind(paths, kind)
    }
}

impl Serialize for FieldSpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let paths: Vec<&str> = self.paths.iter().map(FieldPath::as_str).collect();
        let mut state = serializer.serialize_struct("FieldSpec", 2)?;
        state.serialize_field("paths", &paths)?;
        state.serialize_field("kind", &self.kind)?;
        state.end()
    }
}

impl FieldSpec {
    /// A field read from a single path.
    pub fn path(path: &str) -> Result<Self> {
        Self::with_kind([path], FieldKind::Auto)
    }

    /// A field read from the first present path, interpreted as `kind`.
    pub fn with_kind<I, S>(paths: I, kind: FieldKind) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|p| p.as_ref().parse())
            .collect::<Result<Vec<FieldPath>>>()?;
        if paths.is_empty() {
            return Err(ConsoleError::InvalidFieldPath(String::new()));
        }
        Ok(FieldSpec { paths, kind })
    }

    /// The paths tried, in order.
    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// The interpretation applied to the raw JSON.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The first present raw JSON value.
    pub fn raw<'a>(&self, record: &'a Json) -> Option<&'a Json> {
        self.paths
            .iter()
            .filter_map(|path| path.lookup(record))
            .find(|json| !json.is_null())
    }

    /// Reads the field as an engine value.
    ///
    /// Each path is tried in order and the first one yielding a present
    /// value wins, so a value that fails to parse falls through to the next
    /// path.
    pub fn read<'a>(&self, record: &'a Json) -> Value<'a> {
        self.paths
            .iter()
            .filter_map(|path| path.lookup(record))
            .map(|json| convert(json, self.kind))
            .find(|value| !value.is_absent())
            .unwrap_or(Value::None)
    }

    /// Wraps this field as an engine accessor.
    pub fn accessor(&self) -> Accessor<Json> {
        let spec = self.clone();
        Accessor::new(move |record: &Json| spec.read(record))
    }
}

/// Converts raw JSON into an engine value.
pub fn convert(json: &Json, kind: FieldKind) -> Value<'_> {
    match (kind, json) {
        (FieldKind::Timestamp, Json::String(s)) => parse_timestamp(s)
            .map(Value::Timestamp)
            .unwrap_or(Value::None),
        (FieldKind::Timestamp, Json::Number(n)) => n
            .as_i64()
            .map(|ms| Value::Timestamp(Timestamp::from_millis(ms)))
            .unwrap_or(Value::None),
        (FieldKind::Timestamp, _) => Value::None,
        (FieldKind::Number, Json::String(s)) => parse_number(s)
            .map(Value::Number)
            .unwrap_or(Value::None),
        (FieldKind::Number, Json::Number(_)) => convert(json, FieldKind::Auto),
        (FieldKind::Number, _) => Value::None,
        (FieldKind::Text, Json::Number(n)) => Value::OwnedString(n.to_string()),
        (FieldKind::Text, Json::Bool(b)) => Value::OwnedString(b.to_string()),
        (_, Json::String(s)) => Value::String(s),
        (_, Json::Number(n)) => Value::Number(json_number(n)),
        (_, Json::Bool(b)) => Value::Bool(*b),
        (_, Json::Array(items)) => Value::List(items.iter().map(|j| convert(j, kind)).collect()),
        (_, Json::Null) | (_, Json::Object(_)) => Value::None,
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::I64(i)
    } else if let Some(u) = n.as_u64() {
        Number::U64(u)
    } else {
        Number::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    s.parse::<i64>()
        .map(Number::I64)
        .or_else(|_| s.parse::<f64>().map(Number::F64))
        .ok()
        .filter(|n| !n.is_nan())
}

/// Parses the timestamp formats console APIs emit.
///
/// Strings without an offset are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(Timestamp::from_millis(dt.timestamp_millis()));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Timestamp::from_millis(naive.and_utc().timestamp_millis()));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Timestamp::from_millis(naive.and_utc().timestamp_millis()))
}

/// Renders a raw JSON field as a table cell.
pub fn cell_text(json: Option<&Json>) -> String {
    match json {
        None | Some(Json::Null) => String::new(),
        Some(Json::String(s)) => s.clone(),
        Some(Json::Array(items)) => items
            .iter()
            .map(|item| cell_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}
