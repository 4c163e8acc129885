//! Serde helpers for numeric output
//!
//! Lore amounts are parsed as `f64`, but clients expect `120` rather than
//! `120.0` for whole values.

use serde::Serializer;

/// Largest integer an `f64` represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

pub(crate) fn number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub(crate) fn optional_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => number(v, serializer),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Amount {
        #[serde(serialize_with = "super::number")]
        value: f64,
        #[serde(serialize_with = "super::optional_number")]
        bonus: Option<f64>,
    }

    #[test]
    fn test_whole_values_serialize_as_integers() {
        let json = serde_json::to_string(&Amount {
            value: 120.0,
            bonus: Some(-3.0),
        })
        .unwrap();
        assert_eq!(json, r#"{"value":120,"bonus":-3}"#);
    }

    #[test]
    fn test_fractional_values_keep_decimals() {
        let json = serde_json::to_string(&Amount {
            value: 12.5,
            bonus: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"value":12.5,"bonus":null}"#);
    }
}
