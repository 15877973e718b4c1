//! Field binder: turns a field definition plus its per-field config into an
//! emit function bound to the run state.
//!
//! Two flavors exist for the two generator variants: [`bind_value`] returns
//! values (for the template-engine generator, whose callables must return
//! something renderable) and [`bind_buffer`] writes bytes straight into an
//! output buffer (for the pre-resolved generator). All definition problems
//! are detected here, at bind time; a bound emitter only fails afterwards if
//! a `unique` field runs out of fresh values.

use crate::config::{Config, FieldConfig};
use crate::fields::{Field, FieldType};
use crate::state::GenState;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde_json::Value;

/// Attempts before giving up on a fresh value for a `unique` field.
const MAX_UNIQUE_ATTEMPTS: usize = 100;

/// Output format for `date` fields, millisecond precision.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Window for `date` fields without a configured range.
const DEFAULT_DATE_FROM: &str = "2024-01-01T00:00:00Z";
const DEFAULT_DATE_TO: &str = "2025-01-01T00:00:00Z";

/// Bounds for numeric fields without a configured range.
const DEFAULT_NUMERIC_MIN: f64 = 0.0;
const DEFAULT_NUMERIC_MAX: f64 = 10_000.0;

/// Error type for field binding and value production.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    /// `constant_keyword` definition without a value
    #[error("constant_keyword field '{0}' requires a value")]
    MissingValue(String),

    /// Inverted numeric range in the config
    #[error("field '{field}' has an inverted range: min {min} > max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// Unparseable date bound in the config
    #[error("field '{field}' has an unparseable date bound: '{bound}'")]
    InvalidDateBound { field: String, bound: String },

    /// `cardinality` and `unique` contradict each other
    #[error("field '{0}' sets both cardinality and unique")]
    CardinalityWithUnique(String),

    /// A cardinality of zero can never produce a value
    #[error("field '{0}' has cardinality 0")]
    ZeroCardinality(String),

    /// A `unique` field exhausted its value space
    #[error("no fresh value for unique field '{field}' after {attempts} attempts")]
    UniqueExhausted { field: String, attempts: usize },
}

/// Value-returning emit function, bound to a [`GenState`].
pub type ValueEmitter = Box<dyn FnMut(&mut GenState) -> Result<Value, BindError> + Send>;

/// Buffer-writing emit function, bound to a [`GenState`].
pub type BufferEmitter = Box<dyn FnMut(&mut GenState, &mut Vec<u8>) -> Result<(), BindError> + Send>;

/// Bind a field to a value-returning emit function.
pub fn bind_value(cfg: &Config, field: &Field) -> Result<ValueEmitter, BindError> {
    let field_cfg = cfg.field(&field.name);
    let base = base_emitter(field, field_cfg)?;
    let name = field.name.clone();

    let cardinality = field_cfg.and_then(|c| c.cardinality);
    let unique = field_cfg.is_some_and(|c| c.unique);
    match (cardinality, unique) {
        (Some(0), _) => Err(BindError::ZeroCardinality(name)),
        (Some(_), true) => Err(BindError::CardinalityWithUnique(name)),
        (Some(n), false) => Ok(with_cardinality(name, n, base)),
        (None, true) => Ok(with_dedup(name, base)),
        (None, false) => Ok(base),
    }
}

/// Bind a field to a buffer-writing emit function.
pub fn bind_buffer(cfg: &Config, field: &Field) -> Result<BufferEmitter, BindError> {
    let mut inner = bind_value(cfg, field)?;
    Ok(Box::new(move |state, buf| {
        let value = inner(state)?;
        write_value(&value, buf);
        Ok(())
    }))
}

/// Byte rendering shared by both generator variants. Matches the template
/// engine's scalar rendering (strings raw, numbers and booleans via their
/// display form, null empty) so that equivalent templates produce identical
/// bytes through either variant.
pub fn write_value(value: &Value, buf: &mut Vec<u8>) {
    match value {
        Value::String(s) => buf.extend_from_slice(s.as_bytes()),
        Value::Number(n) => buf.extend_from_slice(n.to_string().as_bytes()),
        Value::Bool(b) => buf.extend_from_slice(if *b { b"true" } else { b"false" }),
        Value::Null => {}
        other => buf.extend_from_slice(other.to_string().as_bytes()),
    }
}

pub(crate) fn render_value(value: &Value) -> String {
    let mut buf = Vec::new();
    write_value(value, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Build the raw per-type producer, before cardinality/uniqueness wrapping.
fn base_emitter(field: &Field, field_cfg: Option<&FieldConfig>) -> Result<ValueEmitter, BindError> {
    match field.field_type {
        FieldType::ConstantKeyword => {
            let value = field
                .value
                .as_ref()
                .map(yaml_to_json)
                .ok_or_else(|| BindError::MissingValue(field.name.clone()))?;
            Ok(Box::new(move |_| Ok(value.clone())))
        }
        FieldType::Keyword => Ok(Box::new(|state| {
            let len = state.rng.gen_range(8..=16);
            Ok(Value::String(random_word(state, len)))
        })),
        FieldType::Text => Ok(Box::new(|state| {
            let words = state.rng.gen_range(4..=10);
            let mut text = String::new();
            for i in 0..words {
                if i > 0 {
                    text.push(' ');
                }
                let len = state.rng.gen_range(3..=8);
                text.push_str(&random_word(state, len));
            }
            Ok(Value::String(text))
        })),
        FieldType::Long => {
            let (min, max) = numeric_bounds(field, field_cfg)?;
            let (min, max) = (min as i64, max as i64);
            Ok(Box::new(move |state| {
                Ok(Value::from(state.rng.gen_range(min..=max)))
            }))
        }
        FieldType::Double => {
            let (min, max) = numeric_bounds(field, field_cfg)?;
            Ok(Box::new(move |state| {
                let v = state.rng.gen_range(min..=max);
                Ok(serde_json::Number::from_f64(v)
                    .map(Value::Number)
                    .unwrap_or(Value::Null))
            }))
        }
        FieldType::Bool => Ok(Box::new(|state| Ok(Value::Bool(state.rng.gen_bool(0.5))))),
        FieldType::Date => {
            let (from, to) = date_bounds(field, field_cfg)?;
            let (from_ts, to_ts) = (from.timestamp(), to.timestamp());
            Ok(Box::new(move |state| {
                let ts = if from_ts >= to_ts {
                    from_ts
                } else {
                    state.rng.gen_range(from_ts..=to_ts)
                };
                let dt = DateTime::from_timestamp(ts, 0).unwrap_or(from);
                Ok(Value::String(dt.format(DATE_FORMAT).to_string()))
            }))
        }
        FieldType::Ip => Ok(Box::new(|state| {
            let mut octets = [0u8; 4];
            for o in &mut octets {
                *o = state.rng.gen_range(1..=254);
            }
            Ok(Value::String(format!(
                "{}.{}.{}.{}",
                octets[0], octets[1], octets[2], octets[3]
            )))
        })),
    }
}

fn random_word(state: &mut GenState, len: usize) -> String {
    (0..len)
        .map(|_| state.rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

fn numeric_bounds(field: &Field, field_cfg: Option<&FieldConfig>) -> Result<(f64, f64), BindError> {
    match field_cfg.and_then(|c| c.range) {
        Some(range) if range.min > range.max => Err(BindError::InvalidRange {
            field: field.name.clone(),
            min: range.min,
            max: range.max,
        }),
        Some(range) => Ok((range.min, range.max)),
        None => Ok((DEFAULT_NUMERIC_MIN, DEFAULT_NUMERIC_MAX)),
    }
}

fn date_bounds(
    field: &Field,
    field_cfg: Option<&FieldConfig>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), BindError> {
    let (from, to) = match field_cfg.and_then(|c| c.date_range.as_ref()) {
        Some(range) => (
            parse_timestamp(&field.name, &range.from)?,
            parse_timestamp(&field.name, &range.to)?,
        ),
        None => (
            parse_timestamp(&field.name, DEFAULT_DATE_FROM)?,
            parse_timestamp(&field.name, DEFAULT_DATE_TO)?,
        ),
    };
    Ok((from, to))
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date.
fn parse_timestamp(field: &str, bound: &str) -> Result<DateTime<Utc>, BindError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(bound) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(bound, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }

    Err(BindError::InvalidDateBound {
        field: field.to_string(),
        bound: bound.to_string(),
    })
}

fn yaml_to_json(yaml: &serde_yaml::Value) -> Value {
    match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            } else {
                Value::String(n.to_string())
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        other => Value::String(format!("{other:?}")),
    }
}

/// Wrap a producer so distinct values are capped at `cardinality`; once the
/// cache is full, values cycle from it, indexed by the event counter.
fn with_cardinality(name: String, cardinality: usize, mut inner: ValueEmitter) -> ValueEmitter {
    Box::new(move |state| {
        let cached = state
            .prev_cardinality
            .entry(name.clone())
            .or_default()
            .len();
        if cached < cardinality {
            let value = inner(state)?;
            state
                .prev_cardinality
                .entry(name.clone())
                .or_default()
                .push(value.clone());
            Ok(value)
        } else {
            let idx = (state.counter as usize) % cardinality;
            Ok(state.prev_cardinality[&name][idx].clone())
        }
    })
}

/// Wrap a producer with duplicate tracking, retrying a bounded number of
/// times before reporting the value space exhausted.
fn with_dedup(name: String, mut inner: ValueEmitter) -> ValueEmitter {
    Box::new(move |state| {
        for _ in 0..MAX_UNIQUE_ATTEMPTS {
            let value = inner(state)?;
            let key = render_value(&value);
            let seen = state.prev_for_dup.entry(name.clone()).or_default();
            if seen.insert(key) {
                return Ok(value);
            }
        }
        Err(BindError::UniqueExhausted {
            field: name.clone(),
            attempts: MAX_UNIQUE_ATTEMPTS,
        })
    })
}
