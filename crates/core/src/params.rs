//! Tolerant extraction of typed values from a JSON parameter object.
//!
//! A missing key or a value of the wrong type yields the caller's default, so
//! a partially specified `--params` string or page config still produces a
//! usable [`FieldConfig`](crate::config::FieldConfig).

use crate::color::Rgb;
use serde_json::Value;

/// `params[name]` as `f64` (integers included), else `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer, else `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as a `u64`, else `default`.
pub fn param_u64(params: &Value, name: &str, default: u64) -> u64 {
    params.get(name).and_then(Value::as_u64).unwrap_or(default)
}

/// `params[name]` parsed as a `"#rrggbb"` color, else `default`.
///
/// An unparseable string also falls back; use
/// [`FieldConfig::validate`](crate::config::FieldConfig::validate) for the
/// strict checks.
pub fn param_color(params: &Value, name: &str, default: Rgb) -> Rgb {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| Rgb::from_hex(s).ok())
        .unwrap_or(default)
}
