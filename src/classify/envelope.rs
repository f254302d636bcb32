//! The backend response envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The body every backend call is wrapped in.
///
/// `code` is an opaque string; numeric codes are stringified on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEnvelope<T> {
    pub code: String,
    pub data: Option<T>,
    pub message: String,
}

impl BackendEnvelope<Value> {
    /// Read an envelope from a parsed body. Anything that is not a JSON
    /// object reads as an envelope with no code, no data and no message.
    pub fn from_body(body: Option<&Value>) -> Self {
        let Some(Value::Object(fields)) = body else {
            return Self {
                code: String::new(),
                data: None,
                message: String::new(),
            };
        };

        let code = match fields.get("code") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string(),
        };

        let data = match fields.get("data") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        };

        let message = ["msg", "message"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .find(|text| !text.is_empty())
            .unwrap_or_default()
            .to_string();

        Self {
            code,
            data,
            message,
        }
    }

    /// Deserialize the payload into the caller's shape.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<BackendEnvelope<T>, serde_json::Error> {
        let data = self.data.map(serde_json::from_value).transpose()?;
        Ok(BackendEnvelope {
            code: self.code,
            data,
            message: self.message,
        })
    }

    /// Deserialize just the payload. A missing payload reads as JSON `null`,
    /// so `T = ()` or `T = Option<_>` accept it.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.unwrap_or(Value::Null))
    }
}
