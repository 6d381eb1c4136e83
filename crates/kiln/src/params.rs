//! Query-string parameters and their conversion to filter values.

use kiln_query::{FieldType, FilterValue, Number, Op, Schema, Timestamp};
use regex::Regex;
use thiserror::Error;
use url::form_urlencoded;

/// Errors translating parameters into a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("invalid value '{value}' for '{param}': expected {expected}")]
    InvalidValue {
        param: String,
        value: String,
        expected: String,
    },

    #[error("unknown sort option '{value}' for '{param}' (options: {options})")]
    UnknownSortOption {
        param: String,
        value: String,
        options: String,
    },

    #[error("'{value}' is not a valid choice for '{param}' (choices: {choices})")]
    NotAChoice {
        param: String,
        value: String,
        choices: String,
    },

    #[error("listing has no '{param}' parameter")]
    Unsupported { param: String },

    #[error("expected PARAM=VALUE, got '{0}'")]
    Malformed(String),
}

/// Decoded `application/x-www-form-urlencoded` parameters.
///
/// Repeated keys keep their last value, like most routers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// Parses a query string, with or without a leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut params = SearchParams::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()).into_owned() {
            params.set(key, value);
        }
        params
    }

    /// Returns the value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Sets a parameter from a `PARAM=VALUE` assignment.
    pub fn assign(&mut self, assignment: &str) -> Result<(), ParamError> {
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.set(key.trim(), value);
                Ok(())
            }
            _ => Err(ParamError::Malformed(assignment.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the parameters back into a query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// Converts a raw parameter value into a filter value for `field`.
///
/// The schema decides how `raw` is read. Fields the schema does not know
/// get a text value; the engine then rejects the query with an unknown
/// field error.
pub fn filter_value(
    schema: &Schema,
    field: &str,
    op: Op,
    raw: &str,
    param: &str,
) -> Result<FilterValue, ParamError> {
    let invalid = |expected: &str| ParamError::InvalidValue {
        param: param.to_string(),
        value: raw.to_string(),
        expected: expected.to_string(),
    };

    let Some(ty) = schema.type_of(field) else {
        return Ok(FilterValue::Text(raw.to_string()));
    };

    let value = match ty {
        FieldType::Text if op == Op::In => FilterValue::TextSet(split_list(raw).map(String::from).collect()),
        FieldType::Text if op == Op::Regex => {
            FilterValue::Regex(Regex::new(raw).map_err(|_| invalid("a valid regular expression"))?)
        }
        FieldType::Text | FieldType::TextList => FilterValue::Text(raw.to_string()),
        FieldType::Number => {
            FilterValue::Number(Number::parse(raw).ok_or_else(|| invalid("a number"))?)
        }
        FieldType::Timestamp => FilterValue::Timestamp(
            Timestamp::parse(raw).ok_or_else(|| invalid("an ISO-8601 date or date-time"))?,
        ),
        FieldType::Enum if op == Op::In => FilterValue::EnumSet(
            split_list(raw)
                .map(|part| part.parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| invalid("comma-separated enum discriminants"))?,
        ),
        FieldType::Enum => {
            FilterValue::Enum(raw.trim().parse::<u32>().map_err(|_| invalid("an enum discriminant"))?)
        }
        FieldType::Bool => FilterValue::Bool(parse_bool(raw).ok_or_else(|| invalid("true or false"))?),
    };
    Ok(value)
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|part| !part.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
