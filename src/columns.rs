//! Column naming and type detection for imported CSV files.
//!
//! SQLite compares column names case-insensitively, so headers such as `ID`
//! and `id` cannot coexist in one table. [`resolve_duplicate_names`] keeps the
//! first spelling and suffixes every later collision with `_duplicateN`, where
//! `N` counts collisions of that lower-cased name only.
//!
//! [`infer_column_types`] decides each column's storage type after looking at
//! every row of the file.

use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use rusqlite::types::Value as SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Boolean,
    Text,
}

impl ColumnType {
    /// Declared type used in the generated `CREATE TABLE` statement.
    pub fn sql_type(self) -> &'static str {
        match self {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Converts a raw cell into the value bound for this column.
    ///
    /// Empty cells become `NULL`. Callers only pass cells that took part in
    /// inference, so a failed parse falls back to text rather than erroring.
    pub fn to_sql_value(self, raw: &str) -> SqlValue {
        if raw.is_empty() {
            return SqlValue::Null;
        }
        match self {
            ColumnType::Integer => raw
                .parse::<i64>()
                .map(SqlValue::Integer)
                .unwrap_or_else(|_| SqlValue::Text(raw.to_string())),
            ColumnType::Real => raw
                .parse::<f64>()
                .map(SqlValue::Real)
                .unwrap_or_else(|_| SqlValue::Text(raw.to_string())),
            ColumnType::Boolean => match parse_boolean(raw) {
                Some(flag) => SqlValue::Integer(i64::from(flag)),
                None => SqlValue::Text(raw.to_string()),
            },
            ColumnType::Text => SqlValue::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnType::Integer => "integer",
            ColumnType::Real => "real",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPlan {
    pub name: String,
    pub column_type: ColumnType,
}

/// Names blank header cells `Unnamed: <position>`.
pub fn fill_blank_headers(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            if header.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                header.clone()
            }
        })
        .collect()
}

/// Returns true when two headers are equal ignoring case.
pub fn has_case_insensitive_duplicates(headers: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .any(|header| !seen.insert(header.to_lowercase()))
}

/// Renames case-insensitive duplicate headers.
///
/// `["ID", "id", "Value", "iD"]` becomes
/// `["ID", "id_duplicate1", "Value", "iD_duplicate2"]`. Headers without
/// collisions are returned unchanged.
pub fn resolve_duplicate_names(headers: &[String]) -> Vec<String> {
    if !has_case_insensitive_duplicates(headers) {
        return headers.to_vec();
    }
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(headers.len());
    headers
        .iter()
        .map(|header| match seen.get_mut(&header.to_lowercase()) {
            Some(count) => {
                *count += 1;
                format!("{header}_duplicate{count}")
            }
            None => {
                seen.insert(header.to_lowercase(), 0);
                header.clone()
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct TypeCandidate {
    seen_value: bool,
    possible_boolean: bool,
    possible_integer: bool,
    possible_real: bool,
}

impl TypeCandidate {
    fn new() -> Self {
        Self {
            seen_value: false,
            possible_boolean: true,
            possible_integer: true,
            possible_real: true,
        }
    }

    fn observe(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        self.seen_value = true;
        if self.possible_boolean && parse_boolean(value).is_none() {
            self.possible_boolean = false;
        }
        if self.possible_integer && value.parse::<i64>().is_err() {
            self.possible_integer = false;
        }
        if self.possible_real && value.parse::<f64>().is_err() {
            self.possible_real = false;
        }
    }

    fn decide(&self) -> ColumnType {
        if !self.seen_value {
            ColumnType::Text
        } else if self.possible_boolean {
            ColumnType::Boolean
        } else if self.possible_integer {
            ColumnType::Integer
        } else if self.possible_real {
            ColumnType::Real
        } else {
            ColumnType::Text
        }
    }
}

/// Decides one type per column from every row; rows shorter than
/// `column_count` contribute nothing for the missing cells.
pub fn infer_column_types(column_count: usize, rows: &[Vec<String>]) -> Vec<ColumnType> {
    let mut candidates = vec![TypeCandidate::new(); column_count];
    for row in rows {
        for (candidate, value) in candidates.iter_mut().zip(row.iter()) {
            candidate.observe(value);
        }
    }
    candidates.iter().map(TypeCandidate::decide).collect()
}

fn parse_boolean(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
