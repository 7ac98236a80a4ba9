use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One report row; keys keep the order the producer inserted them in.
pub type Row = Map<String, Value>;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ReportTable {
    /// Builds a table whose columns are the keys of the first row.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = infer_columns(&rows);
        Self { columns, rows }
    }

    /// Serializes typed records into generic rows.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self, serde_json::Error> {
        let rows = records
            .iter()
            .map(|record| serde_json::to_value(record).and_then(serde_json::from_value::<Row>))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_rows(rows))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[must_use]
pub fn infer_columns(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Raw string form of a cell, used for search and CSV output.
#[must_use]
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Case-insensitive substring match against every cell of the row.
#[must_use]
pub fn row_matches(row: &Row, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    row.values().any(|value| stringify(value).to_lowercase().contains(&needle))
}

#[must_use]
pub fn search<'a>(rows: impl IntoIterator<Item = &'a Row>, query: &str) -> Vec<&'a Row> {
    rows.into_iter().filter(|row| row_matches(row, query)).collect()
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub fn ascending(column: impl Into<String>) -> Self {
        Self { column: column.into(), direction: SortDirection::Asc }
    }
}

/// A column is numeric when every non-null cell in it is a JSON number.
#[must_use]
pub fn column_is_numeric(rows: &[&Row], column: &str) -> bool {
    let mut seen_number = false;
    for value in rows.iter().filter_map(|row| row.get(column)) {
        match value {
            Value::Null => {}
            Value::Number(_) => seen_number = true,
            _ => return false,
        }
    }
    seen_number
}

/// Stable sort of row references; equal keys keep their relative order in both directions.
pub fn sort_rows(rows: &mut [&Row], spec: &SortSpec) {
    let numeric = column_is_numeric(rows, &spec.column);
    rows.sort_by(|a, b| {
        let ordering = compare_cells(a.get(&spec.column), b.get(&spec.column), numeric);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_cells(a: Option<&Value>, b: Option<&Value>, numeric: bool) -> Ordering {
    if numeric {
        let left = a.and_then(Value::as_f64);
        let right = b.and_then(Value::as_f64);
        // missing cells sort before any number
        return match (left, right) {
            (Some(l), Some(r)) => l.total_cmp(&r),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
    }
    let left = a.map(stringify).unwrap_or_default();
    let right = b.map(stringify).unwrap_or_default();
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(&right))
}
