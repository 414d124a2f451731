//! Response envelope parsing.
//!
//! Every backend script answers `{ "status": "success" | "error",
//! "message"?: string, ...payload }`. Only `status == "success"` counts as
//! success; anything else becomes [`ApiError::Application`] carrying the
//! server's message.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::models::de::value_to_i64;

const SUCCESS: &str = "success";

/// A successful response with the status field stripped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub message: Option<String>,
    pub payload: Map<String, Value>,
}

/// Parse a response body and branch on `status`.
///
/// # Errors
///
/// `Decode` when the body is not a JSON object, `Application` when the
/// status is anything other than `"success"`.
pub fn parse_envelope(body: &str) -> Result<Envelope, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let Value::Object(mut payload) = value else {
        return Err(ApiError::Decode("response is not a JSON object".to_owned()));
    };

    let status = payload.remove("status");
    let message = match payload.remove("message") {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };

    if status.as_ref().and_then(Value::as_str) != Some(SUCCESS) {
        return Err(ApiError::Application { message: message.unwrap_or_default() });
    }

    Ok(Envelope { message, payload })
}

impl Envelope {
    /// Deserialize the first present key out of the payload.
    ///
    /// # Errors
    ///
    /// `Decode` when none of the keys exist or the value does not fit `T`.
    pub fn take<T: DeserializeOwned>(&mut self, keys: &[&str]) -> Result<T, ApiError> {
        let value = keys
            .iter()
            .find_map(|key| self.payload.remove(*key))
            .ok_or_else(|| ApiError::Decode(format!("missing field `{}`", keys.join("` | `"))))?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`Envelope::take`], falling back to the whole payload as `T`.
    ///
    /// # Errors
    ///
    /// `Decode` when neither the keyed value nor the payload fits `T`.
    pub fn take_or_payload<T: DeserializeOwned>(mut self, keys: &[&str]) -> Result<T, ApiError> {
        if keys.iter().any(|key| self.payload.contains_key(*key)) {
            return self.take(keys);
        }
        serde_json::from_value(Value::Object(self.payload)).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Total row count for server-paginated lists, when reported.
    #[must_use]
    pub fn total(&self) -> Option<usize> {
        let direct = ["total", "total_count", "totalCount"]
            .iter()
            .find_map(|key| self.payload.get(*key));
        let nested = self
            .payload
            .get("pagination")
            .and_then(|p| p.get("total").or_else(|| p.get("total_records")));
        direct
            .or(nested)
            .and_then(value_to_i64)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Id of a freshly created record (`id`, `<entity>_id`, or `insert_id`).
    #[must_use]
    pub fn created_id(&self, id_field: &str) -> Option<i64> {
        [id_field, "id", "insert_id"]
            .iter()
            .find_map(|key| self.payload.get(*key))
            .or_else(|| self.payload.get("data").and_then(|d| d.get(id_field)))
            .and_then(value_to_i64)
    }
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
