//! JSON-encoded string lists.
//!
//! Clients send `tags` and `agenda` as form fields holding a JSON array
//! (`["AI","Web3"]`) and read them back the same way. Inside the domain and in
//! MongoDB they are plain `Vec<String>`.

use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{EventError, Result};

/// Decode a form field holding a JSON array of strings.
///
/// `field` names the form field in the error message.
pub fn decode_string_list(field: &str, raw: &str) -> Result<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw.trim()).map_err(|_| {
        EventError::BadRequest(format!("{} must be a JSON array of strings", field))
    })
}

/// Encode a list as a JSON array string.
pub fn encode_string_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

/// Serde adapter: writes a list as a JSON string, reads either a native array
/// or a JSON string (documents written before arrays were stored natively).
pub mod json_string_list {
    use super::*;

    pub fn serialize<S>(values: &[String], serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&encode_string_list(values))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<String>),
            Encoded(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::List(values) => Ok(flatten_legacy(values)),
            Repr::Encoded(raw) => {
                serde_json::from_str::<Vec<String>>(&raw).map_err(serde::de::Error::custom)
            }
        }
    }

    /// `["[\"AI\",\"Web3\"]"]`: a single encoded array wrapped in a list
    fn flatten_legacy(values: Vec<String>) -> Vec<String> {
        if let [only] = values.as_slice() {
            if only.trim_start().starts_with('[') {
                if let Ok(decoded) = serde_json::from_str::<Vec<String>>(only) {
                    return decoded;
                }
            }
        }
        values
    }
}
