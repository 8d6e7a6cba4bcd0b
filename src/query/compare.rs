use crate::table::Value;

/// `cmp(record_value, query_value)`; true on a match.
pub type Comparator = dyn Fn(&Value, &Value) -> bool;

/// Case-insensitive prefix match on character values.
pub fn istartswith(have: &Value, want: &Value) -> bool {
    match (have.as_str(), want.as_str()) {
        (Some(have), Some(want)) => have.to_lowercase().starts_with(&want.to_lowercase()),
        _ => false,
    }
}

/// Case-insensitive suffix match on character values.
pub fn iendswith(have: &Value, want: &Value) -> bool {
    match (have.as_str(), want.as_str()) {
        (Some(have), Some(want)) => have
            .trim_end()
            .to_lowercase()
            .ends_with(&want.to_lowercase()),
        _ => false,
    }
}

/// Exact equality. Numeric and Float values compare by number.
pub fn equals(have: &Value, want: &Value) -> bool {
    match (have, want) {
        (Value::Numeric(_), Value::Float(_)) | (Value::Float(_), Value::Numeric(_)) => {
            have.as_f64() == want.as_f64()
        }
        _ => have == want,
    }
}
