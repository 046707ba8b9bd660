//! JSON output formatting

use chrono::Utc;
use serde::Serialize;

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: ?Sized> {
    /// The actual data
    pub data: &'a T,

    /// Metadata about the response
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// Timestamp of the response
    pub timestamp: String,

    /// CLI version
    pub version: String,

    /// Number of items, for list output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl Metadata {
    fn now(count: Option<usize>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            count,
        }
    }
}

/// Format a single value as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput {
        data,
        meta: Metadata::now(None),
    })
}

/// Format a list as pretty-printed JSON with its item count
pub fn format_json_list<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput {
        data: items,
        meta: Metadata::now(Some(items.len())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Item {
        id: i64,
        category: String,
    }

    #[test]
    fn test_format_json_wraps_data_and_meta() {
        let item = Item {
            id: 1,
            category: "Groceries".to_string(),
        };
        let result = format_json(&item).unwrap();

        assert!(result.contains("\"data\""));
        assert!(result.contains("\"category\": \"Groceries\""));
        assert!(result.contains("\"timestamp\""));
        assert!(result.contains(env!("CARGO_PKG_VERSION")));
        assert!(!result.contains("\"count\""));
    }

    #[test]
    fn test_format_json_list_counts_items() {
        let items = vec![
            Item {
                id: 1,
                category: "Cafe".to_string(),
            },
            Item {
                id: 2,
                category: "Taxi".to_string(),
            },
        ];
        let value: serde_json::Value =
            serde_json::from_str(&format_json_list(&items).unwrap()).unwrap();

        assert_eq!(value["meta"]["count"], 2);
        assert_eq!(value["data"][1]["category"], "Taxi");
    }

    #[test]
    fn test_format_json_list_empty() {
        let items: Vec<Item> = vec![];
        let result = format_json_list(&items).unwrap();
        assert!(result.contains("\"data\": []"));
        assert!(result.contains("\"count\": 0"));
    }
}
