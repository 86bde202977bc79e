//! Request shapes accepted by the analysis endpoints.
//!
//! Every model is built from a JSON object and converts back to one. Absent
//! fields are omitted on the way out, so `from_value` followed by `to_value`
//! reproduces the input object.

mod adaptive_learning;
mod habitat_analysis;

pub use adaptive_learning::AdaptiveLearningRequest;
pub use habitat_analysis::{EnvironmentalData, HabitatAnalysisRequest};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("{0}")]
    InvalidField(#[from] serde_json::Error),
}

pub trait Model: Serialize + DeserializeOwned {
    /// Serialized field names, in declaration order.
    const ATTRIBUTE_MAP: &'static [&'static str];

    fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            other => Err(ModelError::NotAnObject(json_kind(&other))),
        }
    }

    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_objects_are_rejected() {
        let err = AdaptiveLearningRequest::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "expected a JSON object, got an array");

        let err = HabitatAnalysisRequest::from_value(Value::Null).unwrap_err();
        assert!(matches!(err, ModelError::NotAnObject("null")));
    }

    #[test]
    fn attribute_maps_list_serialized_names() {
        assert_eq!(AdaptiveLearningRequest::ATTRIBUTE_MAP, ["model_type"]);
        assert_eq!(
            HabitatAnalysisRequest::ATTRIBUTE_MAP,
            ["region", "satellite_image_url", "environmental_data"]
        );
    }
}
