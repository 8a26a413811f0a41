use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Dynamic value extracted from an entity field, used as a sort key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Text(_) => "TEXT",
            Self::Boolean(_) => "BOOLEAN",
            Self::Timestamp(_) => "TIMESTAMP",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Total-order comparison between two values.
    ///
    /// NULL handling: NULL is "greater" than all values (NULL LAST under an
    /// ascending sort). NaN is grouped after all other floats. Mixed
    /// integer/float pairs coerce to float. Values of unrelated types fall
    /// back to comparing their type names so the ordering stays total.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,

            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => compare_floats(*a, *b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),

            // Mixed numeric types (implicit coercion)
            (Value::Integer(a), Value::Float(b)) => compare_floats(*a as f64, *b),
            (Value::Float(a), Value::Integer(b)) => compare_floats(*a, *b as f64),

            _ => self.type_name().cmp(other.type_name()),
        }
    }
}

fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::Integer(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Timestamp(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sorts_last_ascending() {
        assert_eq!(Value::Null.compare(&Value::Integer(1)), Ordering::Greater);
        assert_eq!(Value::Integer(1).compare(&Value::Null), Ordering::Less);
        assert_eq!(Value::Null.compare(&Value::Null), Ordering::Equal);
    }

    #[test]
    fn test_same_type_comparisons() {
        assert_eq!(Value::Integer(5).compare(&Value::Integer(10)), Ordering::Less);
        assert_eq!(
            Value::Text("abc".into()).compare(&Value::Text("xyz".into())),
            Ordering::Less
        );
        assert_eq!(
            Value::Boolean(false).compare(&Value::Boolean(true)),
            Ordering::Less
        );
    }

    #[test]
    fn test_mixed_numeric_coercion() {
        assert_eq!(Value::Integer(2).compare(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(Value::Float(1.5).compare(&Value::Integer(2)), Ordering::Less);
    }

    #[test]
    fn test_nan_grouped_after_floats() {
        assert_eq!(
            Value::Float(f64::NAN).compare(&Value::Float(1.0)),
            Ordering::Greater
        );
        assert_eq!(
            Value::Float(f64::NAN).compare(&Value::Float(f64::NAN)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_option_into_value() {
        let none: Option<i64> = None;
        assert!(Value::from(none).is_null());
        assert_eq!(Value::from(Some(3i64)).compare(&Value::Integer(3)), Ordering::Equal);
    }
}
