// TableKit - core/value.rs
//
// Value model shared by sorting, filtering and export.
// Records are `serde_json::Value`; fields are addressed by dotted paths.
// Core layer: pure logic, no I/O.

use serde_json::Value;
use std::cmp::Ordering;

/// Value returned for a missing (or falsy) field so comparisons never fail.
pub fn empty_sentinel() -> Value {
    Value::String(String::new())
}

/// Resolves a dotted field path against a record.
///
/// Implementations must never panic: a path that cannot be resolved yields
/// [`empty_sentinel`].
pub trait PathResolver<R: ?Sized> {
    fn resolve(&self, record: &R, path: &str) -> Value;
}

/// Default resolver for JSON records.
///
/// Segments are object keys, or element indices when the current value is an
/// array (`"tags.0"`). `null`, `false`, `0` and `""` resolve to the sentinel,
/// so all "empty" fields sort together.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotPath;

impl PathResolver<Value> for DotPath {
    fn resolve(&self, record: &Value, path: &str) -> Value {
        match lookup(record, path) {
            Some(value) if is_truthy(value) => value.clone(),
            _ => empty_sentinel(),
        }
    }
}

/// Borrow the value at `path`, or `None` when any segment is missing.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(record, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Truthiness used when resolving fields.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Position of a value in the cross-type order used by [`default_compare`].
///
/// Null, booleans, numbers and the empty string share the numeric rank
/// (`null`/`false`/`""` = 0, `true` = 1), so empty fields sit among the
/// numbers at zero. Non-empty strings come after every number, then arrays,
/// then objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Numeric,
    Text,
    Array,
    Object,
}

fn rank(value: &Value) -> Rank {
    match value {
        Value::String(s) if !s.is_empty() => Rank::Text,
        Value::Array(_) => Rank::Array,
        Value::Object(_) => Rank::Object,
        _ => Rank::Numeric,
    }
}

/// Numeric view of a value holding the numeric rank.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Bool(true) => 1.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Three-way comparison used when no custom comparator is supplied.
///
/// Numbers compare numerically and strings lexicographically, so `"10"`
/// sorts before `"9"`. Values of different kinds are ordered by [`Rank`]
/// instead of being coerced, which keeps the comparison a total order over
/// any mix of JSON values. Arrays compare equal to arrays, objects to objects.
pub fn default_compare(a: &Value, b: &Value) -> Ordering {
    let (ra, rb) = (rank(a), rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) if ra == Rank::Text => x.cmp(y),
        _ if ra == Rank::Numeric => to_number(a).total_cmp(&to_number(b)),
        _ => Ordering::Equal,
    }
}

/// Plain-text rendering of a value for display, filtering and CSV cells.
/// Strings are returned unquoted; `null` renders as empty.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
