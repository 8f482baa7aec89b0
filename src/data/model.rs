use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Name of the column holding each row's stable identifier.
pub const ID_COLUMN: &str = "number";

// ---------------------------------------------------------------------------
// CellValue – a single cell of a row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell: numeric where the text parses as a number,
/// otherwise kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Coerce raw cell text. Only finite decimal forms become numbers, so
    /// `inf` and `NaN` stay text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        if looks_numeric(trimmed) {
            if let Ok(v) = trimmed.parse::<f64>() {
                if v.is_finite() {
                    return CellValue::Number(v);
                }
            }
        }
        CellValue::Text(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The cell as a filter value, if it is numeric.
    pub fn as_filter_value(&self) -> Option<FilterValue> {
        self.as_f64().and_then(FilterValue::new)
    }
}

fn looks_numeric(s: &str) -> bool {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '-' | '+'))
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{}", FilterValue(*v)),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Empty => write!(f, "N/A"),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterValue – a numeric option in a filterable column
// ---------------------------------------------------------------------------

/// A numeric filter option. Ordered with `total_cmp` so it can be kept in a
/// `BTreeSet`.
#[derive(Debug, Clone, Copy)]
pub struct FilterValue(pub f64);

impl FilterValue {
    /// Canonical form: `-0` folds into `0`, NaN is not a value.
    pub fn new(v: f64) -> Option<Self> {
        (!v.is_nan()).then_some(FilterValue(v + 0.0))
    }

    /// This value in canonical form (see [`FilterValue::new`]).
    pub fn normalized(self) -> Option<Self> {
        Self::new(self.0)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue(v as f64)
    }
}

impl PartialEq for FilterValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for FilterValue {}

impl PartialOrd for FilterValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FilterValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for FilterValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole numbers print without a trailing ".0".
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Row – one record of the dataset
// ---------------------------------------------------------------------------

/// One record: column name → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    pub values: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Numeric value of `column`, if present and numeric.
    pub fn filter_value(&self, column: &str) -> Option<FilterValue> {
        self.get(column).and_then(CellValue::as_filter_value)
    }

    /// The identifier cell.
    pub fn id(&self) -> Option<&CellValue> {
        self.get(ID_COLUMN)
    }
}

impl<K: Into<String>> FromIterator<(K, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, CellValue)>>(iter: I) -> Self {
        Row {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed dataset together with its discovered filterable columns.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Header names in file order.
    pub headers: Vec<String>,
    /// All rows in file order.
    pub rows: Vec<Row>,
    /// Headers recognised as filterable, in header order.
    pub filter_columns: Vec<String>,
}

impl Dataset {
    /// Build a dataset, discovering filterable columns from `headers`.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let filter_columns = super::loader::filter_columns_of(&headers);
        Dataset {
            headers,
            rows,
            filter_columns,
        }
    }

    /// The fail-closed result: no rows, no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
