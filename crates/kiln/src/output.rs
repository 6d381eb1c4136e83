//! Output modes for listing results.
//!
//! Text output goes through a minijinja template. Structured modes
//! serialize the listing view directly and skip the template.

use clap::ValueEnum;
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

use crate::listing::ListingView;

const LISTING_TEMPLATE: &str = include_str!("templates/listing.jinja");

/// Controls how a listing is written out.
///
/// This is the user-facing enum for the `--output` CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Numbered titles with a page footer
    #[default]
    Text,
    /// The whole listing view as JSON
    Json,
    /// The whole listing view as YAML
    Yaml,
    /// The records on the page as CSV
    Csv,
}

/// Errors that can occur while producing output.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(String),

    #[error("template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// Writes a listing view in the given mode.
pub fn render<T: Serialize>(view: &ListingView<T>, mode: OutputMode) -> Result<String, SerializeError> {
    match mode {
        OutputMode::Text => render_text(view),
        OutputMode::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputMode::Yaml => Ok(serde_yaml::to_string(view)?),
        OutputMode::Csv => serialize_csv(&view.items),
    }
}

fn render_text<T: Serialize>(view: &ListingView<T>) -> Result<String, SerializeError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template("listing", LISTING_TEMPLATE)?;
    Ok(env.get_template("listing")?.render(view)?)
}

/// Serializes records to CSV, one row per record.
///
/// Records are converted to JSON first; nested values (such as tag lists)
/// are written as their JSON text.
pub fn serialize_csv<T: Serialize>(items: &[T]) -> Result<String, SerializeError> {
    use serde_json::Value;

    let rows = serde_json::to_value(items)?;
    let mut wtr = csv::Writer::from_writer(vec![]);

    if let Value::Array(rows) = &rows {
        if let Some(Value::Object(first)) = rows.first() {
            let headers: Vec<&str> = first.keys().map(|s| s.as_str()).collect();
            wtr.write_record(&headers)
                .map_err(|e| SerializeError::Csv(e.to_string()))?;

            for row in rows {
                if let Value::Object(obj) = row {
                    let record: Vec<String> = headers
                        .iter()
                        .map(|h| obj.get(*h).map(value_to_string).unwrap_or_default())
                        .collect();
                    wtr.write_record(&record)
                        .map_err(|e| SerializeError::Csv(e.to_string()))?;
                }
            }
        }
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| SerializeError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SerializeError::Csv(e.to_string()))
}

fn value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
