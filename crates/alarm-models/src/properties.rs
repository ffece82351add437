use crate::{AlarmDocument, Error, ALARM_ARN, ALARM_NAME};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A property value given on the command line, coerced from its raw text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Coerce raw text: digits become an integer, then anything that parses
    /// as a finite float becomes a float, then `[a, b]` becomes a list of
    /// trimmed strings. Everything else stays text.
    pub fn coerce(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = raw.parse::<i64>() {
                return PropertyValue::Integer(i);
            }
        }
        if let Some(f) = parse_float(raw) {
            return PropertyValue::Float(f);
        }
        if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
            return PropertyValue::List(parse_list(raw));
        }
        PropertyValue::Text(raw.to_string())
    }

    pub fn into_json(self) -> Value {
        match self {
            PropertyValue::Integer(i) => Value::from(i),
            PropertyValue::Float(f) => Value::from(f),
            PropertyValue::Text(s) => Value::String(s),
            PropertyValue::List(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
        }
    }
}

// Floats may be padded with whitespace, and may separate digits with single
// underscores as in `1_000.5`. NaN and infinities are rejected because JSON
// can't represent them.
fn parse_float(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();

    let separators_ok = bytes.iter().enumerate().all(|(i, b)| {
        *b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separators_ok {
        return None;
    }

    trimmed
        .replace('_', "")
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
}

fn parse_list(raw: &str) -> Vec<String> {
    let inner = raw.trim_matches(|c| c == '[' || c == ']');
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(|item| item.trim().to_string()).collect()
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Float(v) => write!(f, "{v}"),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A single `KEY=VALUE` property override.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub key: String,
    pub value: PropertyValue,
}

impl FromStr for Assignment {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (key, raw) = match token.split_once('=') {
            Some((key, raw)) if !key.is_empty() => (key, raw),
            _ => return Err(Error::InvalidAssignment(token.to_string())),
        };

        // Identity fields only change through the copy and recreate flows.
        if key.eq_ignore_ascii_case(ALARM_NAME) || key.eq_ignore_ascii_case(ALARM_ARN) {
            return Err(Error::FixedField(key.to_string()));
        }

        Ok(Assignment {
            key: key.to_string(),
            value: PropertyValue::coerce(raw),
        })
    }
}

/// An ordered set of property overrides. Every token is validated when the
/// set is parsed, so an invalid token never leaves a document half-edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet(Vec<Assignment>);

impl PropertySet {
    pub fn parse<I, S>(tokens: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|token| token.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()
            .map(PropertySet)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.0.iter()
    }

    /// Apply all assignments in order, overwriting existing values. Returns
    /// the keys which weren't present in the document beforehand.
    pub fn apply(&self, doc: &mut AlarmDocument) -> Vec<String> {
        let mut added = Vec::new();

        for Assignment { key, value } in &self.0 {
            if !doc.contains(key) {
                added.push(key.clone());
            }
            doc.insert(key.clone(), value.clone().into_json());
        }
        added
    }
}
