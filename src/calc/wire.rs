//! JSON bodies exchanged with the recognition service.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalculateRequest {
    /// `data:image/png;base64,...` encoding of the sketch.
    pub image: String,
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalculateResponse {
    pub data: Vec<ResponseItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseItem {
    pub expr: String,
    #[serde(deserialize_with = "string_or_number")]
    pub result: String,
    #[serde(default)]
    pub assign: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarWire {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ScalarWire::deserialize(deserializer)? {
        ScalarWire::Text(text) => text,
        ScalarWire::Number(number) => number.to_string(),
        ScalarWire::Flag(flag) => flag.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_accepts_numeric_results_and_missing_assign() {
        let body = r#"{"data":[{"expr":"2+2","result":4},{"expr":"x","result":"5","assign":true}]}"#;
        let parsed: CalculateResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.data[0].result, "4");
        assert!(!parsed.data[0].assign);
        assert!(parsed.data[1].assign);
    }

    #[test]
    fn request_serialises_variables_as_object() {
        let mut variables = BTreeMap::new();
        variables.insert("x".to_string(), "5".to_string());
        let request = CalculateRequest {
            image: "data:image/png;base64,AA==".into(),
            variables,
        };
        let value = serde_json::to_value(&request).expect("serialise");
        assert_eq!(value["variables"], serde_json::json!({"x": "5"}));
        assert_eq!(value["image"], "data:image/png;base64,AA==");
    }
}
