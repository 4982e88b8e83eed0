//! JSON list encoding: a top-level array of `{"voltage", "current"}` objects.

use std::path::Path;

use crate::{Measurement, StorageError};

pub(crate) fn decode(path: &Path, text: &str) -> Result<Vec<Measurement>, StorageError> {
    serde_json::from_str(text).map_err(|e| StorageError::corrupt(path, e))
}

pub(crate) fn encode(path: &Path, records: &[Measurement]) -> Result<String, StorageError> {
    serde_json::to_string_pretty(records).map_err(|e| StorageError::corrupt(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("data.json")
    }

    #[test]
    fn test_decode_records_in_order() {
        let text = r#"[
  {"voltage": 1.5, "current": 0.25},
  {"voltage": 3.0, "current": 0.5}
]"#;
        let records = decode(path(), text).unwrap();
        assert_eq!(
            records,
            vec![Measurement::new(1.5, 0.25), Measurement::new(3.0, 0.5)]
        );
    }

    #[test]
    fn test_integer_values_are_accepted() {
        let records = decode(path(), r#"[{"voltage": 2, "current": 1}]"#).unwrap();
        assert_eq!(records[0], Measurement::new(2.0, 1.0));
    }

    #[test]
    fn test_missing_field_is_corrupt() {
        let err = decode(path(), r#"[{"voltage": 2.0}]"#).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
        assert!(err.to_string().contains("current"));
    }

    #[test]
    fn test_non_numeric_value_is_corrupt() {
        let err = decode(path(), r#"[{"voltage": "abc", "current": 1.0}]"#).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_non_array_document_is_corrupt() {
        let err = decode(path(), r#"{"voltage": 1.0, "current": 1.0}"#).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_encode_empty_list() {
        assert_eq!(encode(path(), &[]).unwrap(), "[]");
    }

    #[test]
    fn test_encode_uses_two_space_indent() {
        let text = encode(path(), &[Measurement::new(1.0, 0.5)]).unwrap();
        assert!(text.contains("\n  {\n    \"voltage\": 1.0,"));
    }
}
