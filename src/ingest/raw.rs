use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record as found in an export file, before normalization.
///
/// Every field is optional: exports mix record types and each type only
/// carries the fields it needs. Unknown columns are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub timezone_offset: Option<f64>,
    #[serde(default)]
    pub time_processing: Option<String>,
    #[serde(default)]
    pub device_tags: Option<Value>,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub upload_id: Option<String>,
}

impl RawRecord {
    /// Device tags flattened to one string, whether the export stored them
    /// as a JSON array or as text.
    pub fn device_tags_text(&self) -> String {
        value_text(self.device_tags.as_ref())
    }

    pub fn payload_text(&self) -> String {
        value_text(self.payload.as_ref())
    }
}

fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => other.to_string(),
    }
}
