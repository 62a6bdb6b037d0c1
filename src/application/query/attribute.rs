use serde_json::{Map, Number, Value};

use super::args::{ArgumentError, RequestParams};
use super::builder::QueryBuilder;

const MAX_KEY_LENGTH: usize = 64;

/// Typed attribute prefixes. `data.<key>` keeps the raw string.
const PREFIXES: [(&str, AttributeType); 4] = [
    ("data:text.", AttributeType::Text),
    ("data:number.", AttributeType::Number),
    ("data:bool.", AttributeType::Bool),
    ("data.", AttributeType::Text),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeType {
    Text,
    Number,
    Bool,
}

/// Attribute (data) conditions collected from `data*` request parameters.
///
/// Keys and values are bound as one JSON document, so nothing from the
/// request reaches the statement text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeFilter {
    conditions: Map<String, Value>,
}

/// Integers keep full precision; only non-integers go through `f64`.
fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(n) = raw.parse::<i64>() {
        return Some(Number::from(n));
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Some(Number::from(n));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

impl AttributeFilter {
    pub fn parse(params: &RequestParams) -> Result<Self, ArgumentError> {
        let mut conditions = Map::new();

        let mut names: Vec<&String> = params.keys().collect();
        names.sort();

        for name in names {
            let Some((key, kind)) = PREFIXES
                .iter()
                .find_map(|(prefix, kind)| name.strip_prefix(prefix).map(|key| (key, *kind)))
            else {
                continue;
            };

            if key.is_empty() || key.chars().count() > MAX_KEY_LENGTH {
                return Err(ArgumentError::Invalid(format!(
                    "Invalid attribute filter key: {}",
                    name
                )));
            }

            let raw = params[name].trim();
            if raw.is_empty() {
                continue;
            }

            let value = match kind {
                AttributeType::Text => Value::String(raw.to_string()),
                AttributeType::Number => {
                    parse_number(raw).map(Value::Number).ok_or_else(|| {
                        ArgumentError::InvalidType {
                            name: name.clone(),
                            expected: "number",
                        }
                    })?
                }
                AttributeType::Bool => match raw {
                    "true" | "1" => Value::Bool(true),
                    "false" | "0" => Value::Bool(false),
                    _ => {
                        return Err(ArgumentError::InvalidType {
                            name: name.clone(),
                            expected: "boolean",
                        })
                    }
                },
            };

            conditions.insert(key.to_string(), value);
        }

        Ok(Self { conditions })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// JSON containment over the asset data table for `asset_table`.
    pub fn build(&self, query: &mut QueryBuilder, asset_table: &str) {
        if self.is_empty() {
            return;
        }

        let placeholder = query.add_variable(Value::Object(self.conditions.clone()));
        query.add_condition(format!(
            "EXISTS (SELECT * FROM atomicassets_asset_data data_filter \
             WHERE data_filter.contract = {table}.contract AND data_filter.asset_id = {table}.asset_id \
             AND data_filter.data @> {placeholder}::jsonb)",
            table = asset_table,
            placeholder = placeholder
        ));
    }
}
