//! Field values as the engine sees them.
//!
//! The [`Value`] enum is what an accessor hands back to the engine: a
//! borrowed view of one field of a record. Strings, numbers, timestamps,
//! enums, booleans and lists of those are supported. Anything the accessor
//! cannot produce (missing field, null, wrong runtime type) is [`Value::None`].

use std::borrow::Cow;
use std::cmp::Ordering;

/// Runtime value extracted from a record, borrowed where possible.
///
/// # Example
///
/// ```
/// use listquery::{Value, Number};
///
/// struct Ticket {
///     title: String,
///     priority: u8,
/// }
///
/// fn title(ticket: &Ticket) -> Value<'_> {
///     Value::String(&ticket.title)
/// }
///
/// fn priority(ticket: &Ticket) -> Value<'_> {
///     Value::Number(Number::U64(ticket.priority as u64))
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text borrowed from the record.
    String(&'a str),
    /// Text built by the accessor, e.g. a number read as text. Compares,
    /// searches and facets exactly like [`Value::String`].
    OwnedString(String),
    /// Integer or float.
    Number(Number),
    /// Point in time, see [`Timestamp`].
    Timestamp(Timestamp),
    /// Discriminant of a closed set such as a status enum.
    Enum(u32),
    /// Flag.
    Bool(bool),
    /// Multi-valued field, e.g. tags.
    List(Vec<Value<'a>>),
    /// Missing, null, or a runtime type the accessor does not handle.
    None,
}

impl<'a> Value<'a> {
    /// Whether the accessor produced nothing.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Returns `true` if this value carries nothing to compare.
    ///
    /// `None`, NaN numbers and empty lists are all absent. Absent values
    /// never match a search or facet and always sort last.
    pub fn is_absent(&self) -> bool {
        match self {
            Value::None => true,
            Value::Number(n) => n.is_nan(),
            Value::List(items) => items.iter().all(Value::is_absent),
            _ => false,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_) | Value::OwnedString(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// The borrowed text of a `String`.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The text of either string variant.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::OwnedString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text a search term is matched against.
    ///
    /// Scalars are stringified; lists and absent values return `None`
    /// (lists are searched element by element, see [`Value::scalars`]).
    pub fn search_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(*s)),
            Value::OwnedString(s) => Some(Cow::Owned(s.clone())),
            Value::Number(n) if !n.is_nan() => Some(Cow::Owned(n.to_string())),
            Value::Timestamp(t) => Some(Cow::Owned(t.0.to_string())),
            Value::Enum(d) => Some(Cow::Owned(d.to_string())),
            Value::Bool(b) => Some(Cow::Owned(b.to_string())),
            _ => None,
        }
    }

    /// Returns the facet key for a scalar value.
    ///
    /// Facet selections are stored as strings, so every scalar has a
    /// canonical string form. Absent values have no key.
    pub fn facet_key(&self) -> Option<String> {
        self.search_text().map(Cow::into_owned)
    }

    /// Iterates the scalar values held by this value.
    ///
    /// A scalar yields itself, a list yields its elements (nested lists are
    /// flattened), absent values yield nothing.
    pub fn scalars(&self) -> Vec<&Value<'a>> {
        let mut out = Vec::new();
        self.collect_scalars(&mut out);
        out
    }

    fn collect_scalars<'s>(&'s self, out: &mut Vec<&'s Value<'a>>) {
        match self {
            Value::List(items) => {
                for item in items {
                    item.collect_scalars(out);
                }
            }
            other if other.is_absent() => {}
            other => out.push(other),
        }
    }

    /// The value used for ordering, or `None` when absent.
    ///
    /// Lists sort by their first present element.
    pub(crate) fn sort_value(&self) -> Option<&Value<'a>> {
        match self {
            Value::List(items) => items.iter().find_map(Value::sort_value),
            other if other.is_absent() => None,
            other => Some(other),
        }
    }

    /// Fixed rank used to order values of different runtime types.
    pub(crate) fn type_rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Number(_) => 1,
            Value::Timestamp(_) => 2,
            Value::Enum(_) => 3,
            Value::String(_) | Value::OwnedString(_) => 4,
            Value::List(_) => 5,
            Value::None => 6,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(s.as_str())
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::OwnedString(s)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Timestamp> for Value<'_> {
    fn from(t: Timestamp) -> Self {
        Value::Timestamp(t)
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::None)
    }
}

/// A number as read from a record.
///
/// Integers keep their exact value, also when compared with a float. A NaN
/// float is treated as absent by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// Lossy conversion to `f64`.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Returns `true` for a NaN float.
    pub fn is_nan(self) -> bool {
        matches!(self, Number::F64(n) if n.is_nan())
    }

    /// Total order over numbers of any variant.
    ///
    /// Every comparison is exact: integers are never rounded through `f64`,
    /// and `-0.0` equals `0.0`. NaN sorts above everything (below when its
    /// sign bit is set), as with `f64::total_cmp`.
    pub fn compare(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => a.cmp(&b),
            (Number::U64(a), Number::U64(b)) => a.cmp(&b),
            (Number::I64(a), Number::U64(b)) => {
                if a < 0 {
                    Ordering::Less
                } else {
                    (a as u64).cmp(&b)
                }
            }
            (Number::U64(a), Number::I64(b)) => {
                if b < 0 {
                    Ordering::Greater
                } else {
                    a.cmp(&(b as u64))
                }
            }
            (Number::I64(a), Number::F64(b)) => int_cmp_float(i128::from(a), b),
            (Number::U64(a), Number::F64(b)) => int_cmp_float(i128::from(a), b),
            (Number::F64(a), Number::I64(b)) => int_cmp_float(i128::from(b), a).reverse(),
            (Number::F64(a), Number::U64(b)) => int_cmp_float(i128::from(b), a).reverse(),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b)),
        }
    }
}

/// 2^127, the first float past every `i128`.
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

fn int_cmp_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= I128_LIMIT {
        return Ordering::Less;
    }
    if float < -I128_LIMIT {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal if float > whole => Ordering::Less,
        Ordering::Equal if float < whole => Ordering::Greater,
        other => other,
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            return None;
        }
        Some(self.compare(*other))
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty: $($src:ty),*) => {
        $(
            impl From<$src> for Number {
                fn from(n: $src) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

/// Milliseconds since the Unix epoch, UTC.
///
/// Timezone-agnostic; callers convert from their datetime type of choice.
///
/// ```
/// use listquery::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Whole seconds, truncated toward zero.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}
