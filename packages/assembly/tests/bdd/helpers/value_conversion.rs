//! Value conversion helpers for Gherkin data tables
//!
//! Converts string values from feature files to engine Value types.

use assembly_engine::{Record, Value};

/// Convert a Gherkin table cell value to an engine Value.
///
/// Supports:
/// - `true` / `false` -> Bool
/// - `null` -> Null
/// - Integer literals -> Int
/// - Float literals -> Float
/// - Everything else -> String
pub fn convert_gherkin_value(val: &str) -> Value {
    let trimmed = val.trim();

    // Boolean
    if trimmed == "true" {
        return Value::Bool(true);
    }
    if trimmed == "false" {
        return Value::Bool(false);
    }

    // Null
    if trimmed == "null" || trimmed.is_empty() {
        return Value::Null;
    }

    // Try integer first
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int(i);
    }

    // Try float
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float(f);
    }

    // Default to string
    Value::String(trimmed.to_string())
}

/// Split a comma separated list from a step into trimmed items.
pub fn parse_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a Gherkin data table with a header row into a list of records.
///
/// The table format is:
/// ```text
/// | name | amount |
/// | Rent | 900    |
/// ```
/// Empty cells are left out of their record.
pub fn parse_table_to_records(table: &cucumber::gherkin::Table) -> Vec<Value> {
    let Some((header, rows)) = table.rows.split_first() else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| {
            let record: Record = header
                .iter()
                .zip(row)
                .filter(|(_, cell)| !cell.trim().is_empty())
                .map(|(key, cell)| (key.trim().to_string(), convert_gherkin_value(cell)))
                .collect();
            Value::Object(record)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::{convert_gherkin_value, parse_list};
    use assembly_engine::Value;

    #[test]
    fn test_convert_bool() {
        assert_eq!(convert_gherkin_value("true"), Value::Bool(true));
        assert_eq!(convert_gherkin_value("false"), Value::Bool(false));
        assert_eq!(convert_gherkin_value(" true "), Value::Bool(true));
    }

    #[test]
    fn test_convert_null() {
        assert_eq!(convert_gherkin_value("null"), Value::Null);
        assert_eq!(convert_gherkin_value(""), Value::Null);
    }

    #[test]
    fn test_convert_numbers() {
        assert_eq!(convert_gherkin_value("42"), Value::Int(42));
        assert_eq!(convert_gherkin_value("-10"), Value::Int(-10));
        assert_eq!(convert_gherkin_value("0.5"), Value::Float(0.5));
    }

    #[test]
    fn test_convert_string() {
        assert_eq!(
            convert_gherkin_value("hello world"),
            Value::String("hello world".to_string())
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list("a, b ,c"), vec!["a", "b", "c"]);
        assert!(parse_list("").is_empty());
    }
}
