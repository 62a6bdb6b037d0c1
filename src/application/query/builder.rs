//! Parameterized SQL statement assembly.
//!
//! `QueryBuilder` is the only place that turns fragments into SQL text. Table
//! and column names come from static mappings; every value that originates
//! from a request goes through [`QueryBuilder::add_variable`] and is bound
//! positionally.

use serde_json::Value;

/// A positional bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    IntList(Vec<i64>),
    TextList(Vec<String>),
    Json(Value),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<Vec<i64>> for SqlValue {
    fn from(value: Vec<i64>) -> Self {
        SqlValue::IntList(value)
    }
}

impl From<Vec<String>> for SqlValue {
    fn from(value: Vec<String>) -> Self {
        SqlValue::TextList(value)
    }
}

impl From<&[String]> for SqlValue {
    fn from(value: &[String]) -> Self {
        SqlValue::TextList(value.to_vec())
    }
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        SqlValue::Json(value)
    }
}

/// Accumulates WHERE conditions, trailing clauses and bind values.
///
/// The placeholder counter is the length of the bind list, so a placeholder
/// can only be produced together with its value.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: String,
    conditions: Vec<String>,
    trailing: Vec<String>,
    values: Vec<SqlValue>,
}

impl QueryBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            trailing: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Push a bind value and return its placeholder (`$n`, 1-based).
    pub fn add_variable(&mut self, value: impl Into<SqlValue>) -> String {
        self.values.push(value.into());
        format!("${}", self.values.len())
    }

    /// `column = $n`
    pub fn equal(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        let placeholder = self.add_variable(value);
        self.add_condition(format!("{} = {}", column, placeholder))
    }

    /// `column = ANY($n)`; `values` must be a list value.
    pub fn equal_many(&mut self, column: &str, values: impl Into<SqlValue>) -> &mut Self {
        let placeholder = self.add_variable(values);
        self.add_condition(format!("{} = ANY({})", column, placeholder))
    }

    /// `NOT (column = ANY($n))`
    pub fn not_equal_many(&mut self, column: &str, values: impl Into<SqlValue>) -> &mut Self {
        let placeholder = self.add_variable(values);
        self.add_condition(format!("NOT ({} = ANY({}))", column, placeholder))
    }

    /// Append a condition made of static SQL and placeholders already
    /// obtained from this builder.
    pub fn add_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    /// Append a trailing clause (ORDER BY, LIMIT, OFFSET) verbatim.
    pub fn append(&mut self, clause: impl Into<String>) -> &mut Self {
        self.trailing.push(clause.into());
        self
    }

    /// Collect the conditions added by `compose` into a single `AND`-joined
    /// fragment instead of the top-level WHERE list. Bind values keep flowing
    /// into this builder, so numbering stays shared with the outer statement.
    ///
    /// Returns `None` when `compose` added no conditions.
    pub fn scoped<F>(&mut self, compose: F) -> Option<String>
    where
        F: FnOnce(&mut QueryBuilder),
    {
        let outer = std::mem::take(&mut self.conditions);
        compose(self);
        let inner = std::mem::replace(&mut self.conditions, outer);

        if inner.is_empty() {
            None
        } else {
            Some(inner.join(" AND "))
        }
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn variable_count(&self) -> usize {
        self.values.len()
    }

    /// Statement text: base, WHERE conditions joined by AND, trailing clauses.
    pub fn build_string(&self) -> String {
        let mut sql = self.base.trim().to_string();

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }

        for clause in &self.trailing {
            sql.push(' ');
            sql.push_str(clause);
        }

        sql
    }

    /// `SELECT COUNT(*)` over the filtered statement. Trailing clauses are
    /// part of the wrapped statement, so call this before ordering/paging.
    pub fn build_count_string(&self) -> String {
        format!("SELECT COUNT(*) counter FROM ({}) x", self.build_string())
    }

    /// Turn the built statement into a derived table `alias` selected by
    /// `select`. Bind values carry over, so later variables continue the
    /// numbering.
    pub fn wrap(self, select: &str, alias: &str) -> QueryBuilder {
        let base = format!("{} FROM ({}) {}", select, self.build_string(), alias);

        QueryBuilder {
            base,
            conditions: Vec::new(),
            trailing: Vec::new(),
            values: self.values,
        }
    }

    pub fn build_values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// Placeholder indices in order of appearance in `sql`.
pub fn placeholder_indices(sql: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut indices = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                if let Ok(n) = sql[start..end].parse() {
                    indices.push(n);
                }
            }
            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }

    indices
}
