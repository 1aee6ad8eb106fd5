use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Conversion between model types and their JSON-shaped records.
///
/// Decoding validates every required key eagerly and fills optional keys
/// with their defaults; encoding always emits every key.
pub trait JsonRecord: Sized + Serialize {
    fn from_json(value: &Value) -> Result<Self>;

    fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }

    fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
