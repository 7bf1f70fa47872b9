//! Cell type inference for text-based table formats.

use strata_core::Value;

/// Convert one cell's text into a typed value.
///
/// Numeric text without a fraction or exponent becomes an integer (if it
/// fits), other numeric text a float, `true`/`false` in any case a boolean,
/// and anything else stays a string. Each cell is inferred on its own.
pub fn infer_value(text: &str) -> Value {
    let trimmed = text.trim();

    if is_numeric(trimmed) {
        if !trimmed.contains(['.', 'e', 'E']) {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Value::Int64(i);
            }
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_finite() {
                return Value::Float64(f);
            }
        }
    }

    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(text.to_string())
}

/// Digits with optional sign, decimal point, and exponent. Rules out words
/// like `inf` and `NaN` that `f64::from_str` would otherwise accept.
fn is_numeric(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}
