//! Declarative validation of raw request parameters.
//!
//! Every list endpoint parses its full parameter set up front, so a bad value
//! is rejected before any SQL is assembled.

use std::collections::HashMap;

use thiserror::Error;

/// Raw query-string parameters.
pub type RequestParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    #[error("Invalid value for parameter {name}: expected {expected}")]
    InvalidType { name: String, expected: &'static str },

    #[error("Parameter {name} is out of range")]
    OutOfRange {
        name: String,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("Invalid value for parameter {name}: {value}")]
    NotAllowed { name: String, value: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Int,
    Float,
    String,
    Bool,
    /// Comma separated strings
    List,
    /// Comma separated integers
    IntList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    List(Vec<String>),
    IntList(Vec<i64>),
}

/// Validation rule for one parameter.
///
/// `min`/`max` bound the numeric value for `Int`/`Float`/`IntList` items and
/// the character length for `String`/`List` items.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    kind: ArgKind,
    min: Option<f64>,
    max: Option<f64>,
    values: Option<&'static [&'static str]>,
    default: Option<ArgValue>,
}

impl ArgSpec {
    fn of(kind: ArgKind) -> Self {
        Self {
            kind,
            min: None,
            max: None,
            values: None,
            default: None,
        }
    }

    pub fn int() -> Self {
        Self::of(ArgKind::Int)
    }

    pub fn float() -> Self {
        Self::of(ArgKind::Float)
    }

    pub fn string() -> Self {
        Self::of(ArgKind::String)
    }

    pub fn bool() -> Self {
        Self::of(ArgKind::Bool)
    }

    pub fn list() -> Self {
        Self::of(ArgKind::List)
    }

    pub fn int_list() -> Self {
        Self::of(ArgKind::IntList)
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn values(mut self, values: &'static [&'static str]) -> Self {
        self.values = Some(values);
        self
    }

    pub fn default(mut self, value: ArgValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn kind(&self) -> ArgKind {
        self.kind
    }

    fn check_range(&self, name: &str, value: f64) -> Result<(), ArgumentError> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);

        if below || above {
            return Err(ArgumentError::OutOfRange {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            });
        }

        Ok(())
    }

    fn check_text(&self, name: &str, value: &str) -> Result<(), ArgumentError> {
        self.check_range(name, value.chars().count() as f64)?;

        if let Some(allowed) = self.values {
            if !allowed.contains(&value) {
                return Err(ArgumentError::NotAllowed {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }

    fn parse_int(&self, name: &str, raw: &str) -> Result<i64, ArgumentError> {
        let value: i64 = raw.parse().map_err(|_| ArgumentError::InvalidType {
            name: name.to_string(),
            expected: "integer",
        })?;
        self.check_range(name, value as f64)?;
        Ok(value)
    }

    fn parse(&self, name: &str, raw: &str) -> Result<Option<ArgValue>, ArgumentError> {
        let value = match self.kind {
            ArgKind::Int => ArgValue::Int(self.parse_int(name, raw)?),
            ArgKind::Float => {
                let value: f64 = raw
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| ArgumentError::InvalidType {
                        name: name.to_string(),
                        expected: "number",
                    })?;
                self.check_range(name, value)?;
                ArgValue::Float(value)
            }
            ArgKind::String => {
                self.check_text(name, raw)?;
                ArgValue::Str(raw.to_string())
            }
            ArgKind::Bool => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => ArgValue::Bool(true),
                "false" | "0" => ArgValue::Bool(false),
                _ => {
                    return Err(ArgumentError::InvalidType {
                        name: name.to_string(),
                        expected: "boolean",
                    })
                }
            },
            ArgKind::List => {
                let items: Vec<String> = split_list(raw).map(str::to_string).collect();
                for item in &items {
                    self.check_text(name, item)?;
                }
                if items.is_empty() {
                    return Ok(None);
                }
                ArgValue::List(items)
            }
            ArgKind::IntList => {
                let items = split_list(raw)
                    .map(|item| self.parse_int(name, item))
                    .collect::<Result<Vec<_>, _>>()?;
                if items.is_empty() {
                    return Ok(None);
                }
                ArgValue::IntList(items)
            }
        };

        Ok(Some(value))
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Ordered parameter name → rule mapping.
#[derive(Debug, Clone, Default)]
pub struct FilterSchema {
    specs: Vec<(&'static str, ArgSpec)>,
}

impl FilterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, name: &'static str, spec: ArgSpec) -> Self {
        self.specs.retain(|(existing, _)| *existing != name);
        self.specs.push((name, spec));
        self
    }

    /// Union of several schemas. Later schemas override earlier ones on
    /// name collisions.
    pub fn merge<'a>(schemas: impl IntoIterator<Item = &'a FilterSchema>) -> Self {
        schemas
            .into_iter()
            .flat_map(|schema| schema.specs.iter().cloned())
            .fold(Self::new(), |acc, (name, spec)| acc.arg(name, spec))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|(name, _)| *name)
    }

    /// Validate and coerce `params`. Absent parameters without a default are
    /// left out of the result; empty values count as absent.
    pub fn parse(&self, params: &RequestParams) -> Result<FilterArgs, ArgumentError> {
        let mut values = HashMap::new();

        for (name, spec) in &self.specs {
            let raw = params
                .get(*name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty());

            let parsed = match raw {
                Some(raw) => spec.parse(name, raw)?,
                None => None,
            };

            if let Some(value) = parsed.or_else(|| spec.default.clone()) {
                values.insert(*name, value);
            }
        }

        Ok(FilterArgs { values })
    }
}

/// Validated, typed request arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterArgs {
    values: HashMap<&'static str, ArgValue>,
}

impl FilterArgs {
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.values.get(name)? {
            ArgValue::Float(v) => Some(*v),
            ArgValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            ArgValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            ArgValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            ArgValue::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn int_list(&self, name: &str) -> Option<&[i64]> {
        match self.values.get(name)? {
            ArgValue::IntList(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RequestParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn schema() -> FilterSchema {
        FilterSchema::new()
            .arg("page", ArgSpec::int().min(1.0).default(ArgValue::Int(1)))
            .arg("limit", ArgSpec::int().min(1.0).max(100.0))
            .arg("order", ArgSpec::string().values(&["asc", "desc"]).default(ArgValue::Str("desc".into())))
            .arg("owner", ArgSpec::list().min(1.0).max(12.0))
            .arg("ids", ArgSpec::int_list().min(1.0))
            .arg("burned", ArgSpec::bool())
            .arg("min_price", ArgSpec::float().min(0.0))
    }

    #[test]
    fn test_defaults_applied() {
        let args = schema().parse(&params(&[])).unwrap();

        assert_eq!(args.int("page"), Some(1));
        assert_eq!(args.str("order"), Some("desc"));
        assert!(!args.contains("limit"));
        assert!(!args.contains("owner"));
    }

    #[test]
    fn test_coerces_values() {
        let args = schema()
            .parse(&params(&[
                ("page", "3"),
                ("owner", "alice, bob,"),
                ("ids", "1,2,3"),
                ("burned", "true"),
                ("min_price", "1.5"),
            ]))
            .unwrap();

        assert_eq!(args.int("page"), Some(3));
        assert_eq!(args.list("owner").unwrap(), &["alice".to_string(), "bob".to_string()]);
        assert_eq!(args.int_list("ids").unwrap(), &[1, 2, 3]);
        assert_eq!(args.bool("burned"), Some(true));
        assert_eq!(args.float("min_price"), Some(1.5));
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = schema().parse(&params(&[("page", "0")])).unwrap_err();
        assert!(matches!(err, ArgumentError::OutOfRange { .. }));

        let err = schema().parse(&params(&[("limit", "101")])).unwrap_err();
        assert!(matches!(err, ArgumentError::OutOfRange { .. }));

        let err = schema().parse(&params(&[("owner", "averyveryverylongname")])).unwrap_err();
        assert!(matches!(err, ArgumentError::OutOfRange { .. }));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = schema().parse(&params(&[("page", "one")])).unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidType { .. }));

        let err = schema().parse(&params(&[("burned", "maybe")])).unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidType { .. }));

        let err = schema().parse(&params(&[("ids", "1,x")])).unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidType { .. }));

        let err = schema().parse(&params(&[("min_price", "NaN")])).unwrap_err();
        assert!(matches!(err, ArgumentError::InvalidType { .. }));
    }

    #[test]
    fn test_unknown_enum_rejected() {
        let err = schema().parse(&params(&[("order", "sideways")])).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::NotAllowed {
                name: "order".to_string(),
                value: "sideways".to_string()
            }
        );
    }

    #[test]
    fn test_empty_value_is_absent() {
        let args = schema().parse(&params(&[("owner", ""), ("ids", ",,")])).unwrap();

        assert!(!args.contains("owner"));
        assert!(!args.contains("ids"));
    }

    #[test]
    fn test_merge_overrides() {
        let a = FilterSchema::new().arg("limit", ArgSpec::int().max(10.0));
        let b = FilterSchema::new().arg("limit", ArgSpec::int().max(20.0));
        let merged = FilterSchema::merge([&a, &b]);

        assert_eq!(merged.names().collect::<Vec<_>>(), vec!["limit"]);
        assert!(merged.parse(&params(&[("limit", "15")])).is_ok());
    }
}
