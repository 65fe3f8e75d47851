//! Field accessors.
//!
//! An [`Accessor`] wraps a pure function that pulls one derived value out of
//! a record. The engine only ever sees records through accessors, so record
//! shape quirks (optional fields, values nested in an embedded payload)
//! stay with the caller.
//!
//! Accessors never fail. A record that lacks the field, or holds it with the
//! wrong runtime type, yields [`Value::None`].

use std::fmt;
use std::sync::Arc;

use crate::value::{Timestamp, Value};

type AccessorFn<T> = dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync;

/// A shareable field accessor over records of type `T`.
///
/// ```
/// use listquery::{Accessor, Value};
///
/// struct Ticket {
///     title: String,
///     assignee: Option<String>,
/// }
///
/// let title = Accessor::new(|t: &Ticket| Value::String(&t.title));
/// let assignee = Accessor::new(|t: &Ticket| Value::from(t.assignee.as_deref()));
///
/// let ticket = Ticket { title: "Withdrawal stuck".into(), assignee: None };
/// assert_eq!(title.get(&ticket), Value::String("Withdrawal stuck"));
/// assert!(assignee.get(&ticket).is_none());
/// ```
pub struct Accessor<T> {
    f: Arc<AccessorFn<T>>,
}

impl<T> Accessor<T> {
    /// Wraps an accessor function.
    pub fn new<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        Accessor { f: Arc::new(f) }
    }

    /// Reads the field from a record.
    pub fn get<'a>(&self, record: &'a T) -> Value<'a> {
        (self.f)(record)
    }

    /// Tries each accessor in turn, returning the first present value.
    ///
    /// This is the usual way to express "use the top-level field, else the
    /// copy inside the embedded response payload".
    pub fn first_of(accessors: Vec<Accessor<T>>) -> Self
    where
        T: 'static,
    {
        Accessor::new(move |record: &T| {
            accessors
                .iter()
                .map(|accessor| accessor.get(record))
                .find(|value| !value.is_absent())
                .unwrap_or(Value::None)
        })
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        Accessor {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

/// Conversion of datetime-like types into a [`Timestamp`].
///
/// Implement this for your datetime type to write timestamp accessors with
/// `Value::Timestamp(created_at.to_timestamp())`.
pub trait ToTimestamp {
    /// Converts this value to a [`Timestamp`] for comparison.
    fn to_timestamp(&self) -> Timestamp;
}

impl ToTimestamp for i64 {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl ToTimestamp for u64 {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl ToTimestamp for std::time::SystemTime {
    fn to_timestamp(&self) -> Timestamp {
        match self.duration_since(std::time::UNIX_EPOCH) {
            Ok(after) => Timestamp::from_millis(i64::try_from(after.as_millis()).unwrap_or(i64::MAX)),
            Err(before) => Timestamp::from_millis(
                i64::try_from(before.duration().as_millis()).map_or(i64::MIN, |ms| -ms),
            ),
        }
    }
}
