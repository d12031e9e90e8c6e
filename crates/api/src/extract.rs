use std::collections::HashMap;

use serde_json::{Map, Value};

/// Flattens the three parameter sources into one map ahead of validation.
/// Later sources win on key collision: body over query over path. Path and
/// query values arrive as strings and stay strings; the schema decides
/// whether a string is acceptable for a given field.
pub fn merge_request_params(
    path_params: &HashMap<String, String>,
    query_params: &HashMap<String, String>,
    body: &Value,
) -> Map<String, Value> {
    let mut merged = Map::new();

    for (key, value) in path_params {
        merged.insert(key.clone(), Value::String(value.clone()));
    }
    for (key, value) in query_params {
        merged.insert(key.clone(), Value::String(value.clone()));
    }
    if let Value::Object(fields) = body {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_wins_over_query_and_path() {
        let path = HashMap::from([("title".to_string(), "from path".to_string())]);
        let query = HashMap::from([("title".to_string(), "from query".to_string())]);
        let body = json!({ "title": "from body" });

        let merged = merge_request_params(&path, &query, &body);
        assert_eq!(merged["title"], "from body");
    }

    #[test]
    fn test_query_wins_over_path() {
        let path = HashMap::from([("idCategory".to_string(), "1".to_string())]);
        let query = HashMap::from([("idCategory".to_string(), "2".to_string())]);

        let merged = merge_request_params(&path, &query, &json!({}));
        assert_eq!(merged["idCategory"], "2");
    }

    #[test]
    fn test_disjoint_sources_all_present() {
        let path = HashMap::from([("a".to_string(), "1".to_string())]);
        let query = HashMap::from([("b".to_string(), "2".to_string())]);
        let body = json!({ "c": 3 });

        let merged = merge_request_params(&path, &query, &body);
        assert_eq!(merged["a"], "1");
        assert_eq!(merged["b"], "2");
        assert_eq!(merged["c"], 3);
    }

    #[test]
    fn test_non_object_body_contributes_nothing() {
        let merged =
            merge_request_params(&HashMap::new(), &HashMap::new(), &json!(["not", "an", "object"]));
        assert!(merged.is_empty());
    }
}
