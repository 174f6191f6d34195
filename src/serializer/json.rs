//! JSON Serializer
//!
//! Reference codec: each value is wrapped in a tagged JSON envelope
//! `{"type": <tag>, "value": <payload>}`. The logical null is the sentinel
//! envelope `{"type": "null"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CacheType, Serializer, NULL_TAG};
use crate::error::SerializerError;

// == Envelope ==
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl Envelope {
    fn null() -> Self {
        Self {
            tag: NULL_TAG.to_string(),
            value: None,
        }
    }
}

// == JSON Serializer ==
/// Tagged-envelope JSON codec. Output is always UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl JsonSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl Serializer for JsonSerializer {
    fn serialize<T: CacheType>(&self, value: &T) -> Result<String, SerializerError> {
        let envelope = if value.is_null() {
            Envelope::null()
        } else {
            let payload =
                serde_json::to_value(value).map_err(|e| SerializerError::Encode(e.to_string()))?;
            Envelope {
                tag: T::type_tag().into_owned(),
                value: Some(payload),
            }
        };

        serde_json::to_string(&envelope).map_err(|e| SerializerError::Encode(e.to_string()))
    }

    fn deserialize<T: CacheType>(&self, data: &str) -> Result<T, SerializerError> {
        // No data decodes to the default, same as the null sentinel.
        if data.trim().is_empty() {
            return Ok(T::default());
        }

        let envelope: Envelope =
            serde_json::from_str(data).map_err(|e| SerializerError::Malformed(e.to_string()))?;

        if envelope.tag == NULL_TAG {
            return Ok(T::default());
        }

        let expected = T::type_tag();
        if envelope.tag != expected {
            return Err(SerializerError::TypeMismatch {
                expected: expected.into_owned(),
                found: envelope.tag,
            });
        }

        let payload = envelope.value.ok_or_else(|| {
            SerializerError::Malformed(format!("envelope '{}' has no value", envelope.tag))
        })?;

        serde_json::from_value(payload).map_err(|e| SerializerError::Decode(e.to_string()))
    }
}
