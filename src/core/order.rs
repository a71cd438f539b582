// TableKit - core/order.rs
//
// OrderBy engine: builds a composite comparator from a declarative, possibly
// compound, field specification and sorts record collections with it.
//
// Every accepted field shape (path string, (path, order) pair, options record)
// is normalised into one `ComparatorOptions` before any comparison happens.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::value::{default_compare, DotPath, PathResolver};
use crate::util::constants::DESCENDING_PATTERN;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// Transform applied to a value before comparison (e.g. lowercasing).
pub type Primer = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Three-way comparison between two field values.
pub type CompareFn = Arc<dyn Fn(&Value, &Value) -> Ordering + Send + Sync>;

/// Wrap a closure as a [`Primer`].
pub fn primer<F>(f: F) -> Primer
where
    F: Fn(&Value) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ready-made primers.
pub mod primers {
    use super::{primer, Primer};
    use serde_json::Value;

    /// Lowercase string values; other values pass through.
    pub fn lowercase() -> Primer {
        primer(|v| match v {
            Value::String(s) => Value::String(s.to_lowercase()),
            other => other.clone(),
        })
    }

    /// Trim surrounding whitespace from string values.
    pub fn trim() -> Primer {
        primer(|v| match v {
            Value::String(s) => Value::String(s.trim().to_string()),
            other => other.clone(),
        })
    }
}

// =============================================================================
// Order indicators
// =============================================================================

/// Normalised sort direction.
///
/// `Neutral` comes from an absent or falsy indicator and sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    #[default]
    Neutral,
    Asc,
    Desc,
}

impl Order {
    pub fn is_descending(self) -> bool {
        self == Order::Desc
    }

    pub fn label(self) -> &'static str {
        match self {
            Order::Neutral => "neutral",
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw order indicator as supplied by callers or config.
///
/// Accepts `"asc"`, `"ascending"`, `"desc"`, `"descending"`, `1`, `-1`, `0`,
/// `true` and `false`; any other text is treated as ascending.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OrderValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl OrderValue {
    fn is_truthy(&self) -> bool {
        match self {
            OrderValue::Flag(b) => *b,
            OrderValue::Number(n) => *n != 0,
            OrderValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for OrderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderValue::Flag(b) => write!(f, "{b}"),
            OrderValue::Number(n) => write!(f, "{n}"),
            OrderValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for OrderValue {
    fn from(s: &str) -> Self {
        OrderValue::Text(s.to_string())
    }
}

impl From<String> for OrderValue {
    fn from(s: String) -> Self {
        OrderValue::Text(s)
    }
}

impl From<i64> for OrderValue {
    fn from(n: i64) -> Self {
        OrderValue::Number(n)
    }
}

impl From<i32> for OrderValue {
    fn from(n: i32) -> Self {
        OrderValue::Number(i64::from(n))
    }
}

impl From<bool> for OrderValue {
    fn from(b: bool) -> Self {
        OrderValue::Flag(b)
    }
}

impl From<Order> for OrderValue {
    fn from(order: Order) -> Self {
        match order {
            Order::Neutral => OrderValue::Number(0),
            Order::Asc => OrderValue::Text("asc".to_string()),
            Order::Desc => OrderValue::Text("desc".to_string()),
        }
    }
}

fn descending_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DESCENDING_PATTERN).ok()).as_ref()
}

/// Normalise an order indicator.
///
/// Absent or falsy values give `Neutral`; values whose text starts with
/// `desc`, `descending`, `-1` or `true` (case-sensitive, so `"DESC"` is
/// ascending) give `Desc`;
/// everything else gives `Asc`.
pub fn normalize_order(value: Option<&OrderValue>) -> Order {
    let Some(value) = value.filter(|v| v.is_truthy()) else {
        return Order::Neutral;
    };
    let text = value.to_string();
    match descending_regex() {
        Some(re) if re.is_match(&text) => Order::Desc,
        Some(_) => Order::Asc,
        None => {
            tracing::warn!(pattern = DESCENDING_PATTERN, "Descending pattern failed to compile");
            Order::Asc
        }
    }
}

// =============================================================================
// Field specifications
// =============================================================================

/// Explicit options for one sort field.
#[derive(Clone, Default)]
pub struct FieldOptions {
    /// Dotted path of the field inside each record.
    pub key: String,
    /// Per-field primer; falls back to the global primer when `None`.
    pub primer: Option<Primer>,
    /// Order indicator; absent means neutral (ascending).
    pub order: Option<OrderValue>,
    /// Replaces the default three-way compare for this field.
    pub comparator: Option<CompareFn>,
}

impl FieldOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_order(mut self, order: impl Into<OrderValue>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_primer(mut self, primer: Primer) -> Self {
        self.primer = Some(primer);
        self
    }

    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Value, &Value) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("key", &self.key)
            .field("primer", &self.primer.is_some())
            .field("order", &self.order)
            .field("comparator", &self.comparator.is_some())
            .finish()
    }
}

/// One sortable field, in any of the accepted shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawField")]
pub enum FieldSpec {
    /// Path string; a leading `-` means descending.
    Path(String),
    /// Path plus explicit order indicator.
    Tuple(String, OrderValue),
    /// Fully specified options.
    Options(FieldOptions),
}

/// Serialised shapes of a field: `"-age"`, `"age:desc"` or `["age", -1]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Pair(String, OrderValue),
}

impl From<RawField> for FieldSpec {
    fn from(raw: RawField) -> Self {
        match raw {
            RawField::Text(text) => parse_field(&text),
            RawField::Pair(key, order) => FieldSpec::Tuple(key, order),
        }
    }
}

fn parse_field(text: &str) -> FieldSpec {
    let text = text.trim();
    match text.split_once(':') {
        Some((key, order)) if !key.trim().trim_start_matches('-').is_empty() => {
            // The explicit order wins over a leading dash.
            let key = key.trim().trim_start_matches('-');
            FieldSpec::Tuple(key.to_string(), OrderValue::from(order.trim()))
        }
        _ => FieldSpec::Path(text.to_string()),
    }
}

impl FromStr for FieldSpec {
    type Err = std::convert::Infallible;

    /// `"name"`, `"-name"` or `"name:desc"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_field(s))
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSpec::Path(path) => f.write_str(path),
            FieldSpec::Tuple(key, order) => write!(f, "{key}:{order}"),
            FieldSpec::Options(options) => {
                if normalize_order(options.order.as_ref()).is_descending() {
                    write!(f, "-{}", options.key)
                } else {
                    f.write_str(&options.key)
                }
            }
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(s: &str) -> Self {
        FieldSpec::Path(s.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(s: String) -> Self {
        FieldSpec::Path(s)
    }
}

impl<K, V> From<(K, V)> for FieldSpec
where
    K: Into<String>,
    V: Into<OrderValue>,
{
    fn from((key, order): (K, V)) -> Self {
        FieldSpec::Tuple(key.into(), order.into())
    }
}

impl From<FieldOptions> for FieldSpec {
    fn from(options: FieldOptions) -> Self {
        FieldSpec::Options(options)
    }
}

/// Ordered list of sort fields. The first field is the primary key; later
/// fields only break ties.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawOrderBy")]
pub struct OrderBy {
    fields: Vec<FieldSpec>,
}

/// A list is tried first so `["age", "name"]` means two fields, not one
/// (path, order) pair.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOrderBy {
    Many(Vec<FieldSpec>),
    One(FieldSpec),
}

impl From<RawOrderBy> for OrderBy {
    fn from(raw: RawOrderBy) -> Self {
        match raw {
            RawOrderBy::One(field) => OrderBy::from(field),
            RawOrderBy::Many(fields) => OrderBy { fields },
        }
    }
}

impl OrderBy {
    /// No fields: sorting falls back to comparing whole values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new().then_asc(field)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new().then_desc(field)
    }

    pub fn then_asc(self, field: impl Into<String>) -> Self {
        self.then((field.into(), Order::Asc))
    }

    pub fn then_desc(self, field: impl Into<String>) -> Self {
        self.then((field.into(), Order::Desc))
    }

    pub fn then(mut self, field: impl Into<FieldSpec>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Build from a list where some entries may be absent; absent entries
    /// are dropped before interpretation.
    pub fn from_optional<I, T>(fields: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<FieldSpec>,
    {
        fields.into_iter().flatten().collect()
    }

    /// Parse a comma-separated list such as `"-age,name:asc"`.
    pub fn parse_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_field)
            .collect()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Textual form of every field, e.g. for persisting.
    pub fn to_strings(&self) -> Vec<String> {
        self.fields.iter().map(ToString::to_string).collect()
    }
}

/// Orders are equal when their textual forms match; primers and custom
/// comparators are not compared.
impl PartialEq for OrderBy {
    fn eq(&self, other: &Self) -> bool {
        self.to_strings() == other.to_strings()
    }
}

impl<T: Into<FieldSpec>> FromIterator<T> for OrderBy {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<FieldSpec> for OrderBy {
    fn from(field: FieldSpec) -> Self {
        Self {
            fields: vec![field],
        }
    }
}

impl From<&str> for OrderBy {
    fn from(field: &str) -> Self {
        OrderBy::from(FieldSpec::from(field))
    }
}

impl From<String> for OrderBy {
    fn from(field: String) -> Self {
        OrderBy::from(FieldSpec::from(field))
    }
}

impl From<FieldOptions> for OrderBy {
    fn from(options: FieldOptions) -> Self {
        OrderBy::from(FieldSpec::from(options))
    }
}

impl<T: Into<FieldSpec>> From<Vec<T>> for OrderBy {
    fn from(fields: Vec<T>) -> Self {
        fields.into_iter().collect()
    }
}

impl<T: Into<FieldSpec>, const N: usize> From<[T; N]> for OrderBy {
    fn from(fields: [T; N]) -> Self {
        fields.into_iter().collect()
    }
}

impl From<Option<OrderBy>> for OrderBy {
    fn from(order: Option<OrderBy>) -> Self {
        order.unwrap_or_default()
    }
}

// =============================================================================
// Normalisation
// =============================================================================

/// Canonical shape of one sort field, ready for comparison.
#[derive(Clone)]
pub struct ComparatorOptions {
    pub key: String,
    pub primer: Option<Primer>,
    pub order: Order,
    /// Primer-composed, direction-adjusted compare for this field.
    pub comparator: CompareFn,
}

impl fmt::Debug for ComparatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorOptions")
            .field("key", &self.key)
            .field("primer", &self.primer.is_some())
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Compose primer, base compare and direction into one field comparator.
fn compose(primer: Option<Primer>, base: Option<CompareFn>, order: Order) -> CompareFn {
    let base: CompareFn = match base {
        Some(custom) => custom,
        None => Arc::new(default_compare),
    };
    let primed: CompareFn = match primer {
        Some(p) => Arc::new(move |a: &Value, b: &Value| base(&p(a), &p(b))),
        None => base,
    };
    if order.is_descending() {
        Arc::new(move |a: &Value, b: &Value| primed(a, b).reverse())
    } else {
        primed
    }
}

/// Normalise any field shape into [`ComparatorOptions`].
///
/// A leading `-` on a path string marks it descending and is stripped from
/// the key. The field's own primer wins over `global_primer`.
pub fn normalize_field(field: &FieldSpec, global_primer: Option<&Primer>) -> ComparatorOptions {
    let (key, order_value, field_primer, custom) = match field {
        FieldSpec::Path(path) => match path.strip_prefix('-') {
            Some(stripped) => (stripped.to_string(), Some(OrderValue::Flag(true)), None, None),
            None => (path.clone(), None, None, None),
        },
        FieldSpec::Tuple(key, order) => (key.clone(), Some(order.clone()), None, None),
        FieldSpec::Options(options) => (
            options.key.clone(),
            options.order.clone(),
            options.primer.clone(),
            options.comparator.clone(),
        ),
    };

    let primer = field_primer.or_else(|| global_primer.cloned());
    let order = normalize_order(order_value.as_ref());
    let comparator = compose(primer.clone(), custom, order);

    ComparatorOptions {
        key,
        primer,
        order,
        comparator,
    }
}

// =============================================================================
// Comparator
// =============================================================================

/// Composite comparator over JSON records.
///
/// Holds no mutable state: repeated calls with the same inputs always give
/// the same answer, and one comparator can be shared across threads.
#[derive(Clone)]
pub struct Comparator<P = DotPath> {
    fields: Vec<ComparatorOptions>,
    /// Used when no fields are configured: compares whole values.
    fallback: CompareFn,
    resolver: P,
}

impl<P> fmt::Debug for Comparator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl<P: PathResolver<Value>> Comparator<P> {
    /// Compare two records field by field in declaration order; the first
    /// non-equal field decides. All-equal records compare `Equal`.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        if self.fields.is_empty() {
            return (self.fallback)(a, b);
        }
        for field in &self.fields {
            let left = self.resolver.resolve(a, &field.key);
            let right = self.resolver.resolve(b, &field.key);
            let result = (field.comparator)(&left, &right);
            if result != Ordering::Equal {
                return result;
            }
        }
        Ordering::Equal
    }

    /// Stable in-place sort.
    pub fn sort(&self, rows: &mut [Value]) {
        rows.sort_by(|a, b| self.compare(a, b));
    }

    pub fn fields(&self) -> &[ComparatorOptions] {
        &self.fields
    }
}

/// Build a comparator using the default dotted-path resolver.
pub fn build_comparator(order: impl Into<OrderBy>, primer: Option<Primer>) -> Comparator {
    build_comparator_with(order, primer, DotPath)
}

/// Build a comparator with a caller-supplied path resolver.
pub fn build_comparator_with<P>(
    order: impl Into<OrderBy>,
    primer: Option<Primer>,
    resolver: P,
) -> Comparator<P>
where
    P: PathResolver<Value>,
{
    let order = order.into();
    let fields: Vec<ComparatorOptions> = order
        .fields()
        .iter()
        .map(|field| normalize_field(field, primer.as_ref()))
        .collect();
    let fallback = compose(primer, None, Order::Neutral);

    tracing::debug!(
        fields = fields.len(),
        keys = ?fields.iter().map(|f| f.key.as_str()).collect::<Vec<_>>(),
        "Comparator built"
    );

    Comparator {
        fields,
        fallback,
        resolver,
    }
}

/// Sort `rows` in place by `order`, with an optional global primer.
/// An empty order compares whole values.
pub fn sort(rows: &mut [Value], order: impl Into<OrderBy>, primer: Option<Primer>) {
    build_comparator(order, primer).sort(rows);
}

/// Owned variant of [`sort`].
pub fn sorted(mut rows: Vec<Value>, order: impl Into<OrderBy>, primer: Option<Primer>) -> Vec<Value> {
    sort(&mut rows, order, primer);
    rows
}
