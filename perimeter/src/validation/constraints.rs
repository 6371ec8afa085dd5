//! Constraint checks on present, correctly typed values.

use crate::contracts::Constraint;
use crate::value::Value;

/// Checks one constraint, returning the violation message on failure.
///
/// Constraints that have no meaning for the value's runtime type pass.
pub(crate) fn check(constraint: &Constraint, value: &Value) -> Option<String> {
    match constraint {
        Constraint::Format(pattern) => {
            let text = value.as_str()?;
            (!pattern.is_match(text)).then(|| "does not match format".to_string())
        }
        Constraint::MinLength(min) => {
            let len = length(value)?;
            (len < *min).then(|| format!("must be at least {min} characters (minimum length)"))
        }
        Constraint::MaxLength(max) => {
            let len = length(value)?;
            (len > *max).then(|| format!("must be at most {max} characters (maximum length)"))
        }
        Constraint::Min(bound) => {
            value.as_f64()?;
            // Unordered (NaN) comparisons fail the bound.
            let ok = bound.compare(value).is_some_and(|ord| ord.is_ge());
            (!ok).then(|| format!("must be >= {bound} (minimum value)"))
        }
        Constraint::Max(bound) => {
            value.as_f64()?;
            let ok = bound.compare(value).is_some_and(|ord| ord.is_le());
            (!ok).then(|| format!("must be <= {bound} (maximum value)"))
        }
        Constraint::In(allowed) => {
            (!allowed.contains(value)).then(|| format!("must be one of {}", render_list(allowed)))
        }
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::List(items) => Some(items.len()),
        _ => None,
    }
}

fn render_list(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
