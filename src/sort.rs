//! Type-aware, stable sorting.
//!
//! There is exactly one ordering, the ascending total order on `SortKey`.
//! Descending order reverses it instead of re-deriving the comparison, so
//! the two directions can never disagree about what is "equal".

use crate::accessor::FieldSpec;
use crate::state::SortDirection;
use crate::value::Value;
use chrono::{DateTime, NaiveDateTime};
use std::cmp::Ordering;

/// Epoch milliseconds of an ISO-8601 date-time string, if it is one.
///
/// Only strings containing a `T` separator qualify; plain dates and other
/// text sort lexically.
pub fn parse_datetime_millis(s: &str) -> Option<i64> {
    if !s.contains('T') {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// A resolved value reduced to what sorting needs.
///
/// The type decision (instant, number, text) is made once per record when
/// the key is built. Keys of different kinds order by kind:
/// empty < number < instant < text < opaque. Empty and opaque keys compare
/// `Equal` among themselves, so those records keep their input order.
#[derive(Debug, Clone)]
pub enum SortKey {
    /// Missing, null or empty text.
    Empty,
    Number(f64),
    /// Epoch milliseconds of a date-time string.
    Instant(i64),
    Text { folded: String, raw: String },
    /// Booleans, rendered values and NaN.
    Opaque,
}

impl SortKey {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => SortKey::Empty,
            Value::Text(s) if s.is_empty() => SortKey::Empty,
            Value::Text(s) => match parse_datetime_millis(s) {
                Some(ms) => SortKey::Instant(ms),
                None => SortKey::Text {
                    folded: s.to_lowercase(),
                    raw: s.clone(),
                },
            },
            Value::Number(n) if n.is_nan() => SortKey::Opaque,
            Value::Number(n) => SortKey::Number(*n),
            Value::Bool(_) | Value::Rendered(_) => SortKey::Opaque,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Empty => 0,
            SortKey::Number(_) => 1,
            SortKey::Instant(_) => 2,
            SortKey::Text { .. } => 3,
            SortKey::Opaque => 4,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Instant(a), SortKey::Instant(b)) => a.cmp(b),
            (
                SortKey::Text { folded: fa, raw: ra },
                SortKey::Text { folded: fb, raw: rb },
            ) => fa.cmp(fb).then_with(|| ra.cmp(rb)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Ascending comparison of two resolved values.
///
/// - two date-time strings compare by instant
/// - two numbers compare numerically
/// - two other strings compare case-insensitively, then byte-wise
/// - values of different kinds order by kind (see `SortKey`)
/// - booleans and rendered values are `Equal` to each other
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Compare two records on one field.
pub fn compare<T>(a: &T, b: &T, field: &FieldSpec<T>, direction: SortDirection) -> Ordering {
    directed(compare_values(&field.resolve(a), &field.resolve(b)), direction)
}

/// Stable-sort `indices` (positions into `records`) by `field`.
///
/// Each record's key is resolved and typed once up front. Records whose
/// keys compare equal keep the order they had in `indices`.
pub fn sort_indices<T>(
    records: &[T],
    indices: &mut Vec<usize>,
    field: &FieldSpec<T>,
    direction: SortDirection,
) {
    let mut keyed: Vec<(SortKey, usize)> = indices
        .iter()
        .map(|&i| (SortKey::of(&field.resolve(&records[i])), i))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| directed(a.cmp(b), direction));
    indices.clear();
    indices.extend(keyed.into_iter().map(|(_, i)| i));
}
