use serde::{Deserialize, Serialize};

use super::Model;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveLearningRequest {
    /// Identifier of the model family to retrain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
}

impl Model for AdaptiveLearningRequest {
    const ATTRIBUTE_MAP: &'static [&'static str] = &["model_type"];
}

impl AdaptiveLearningRequest {
    pub fn with_model_type(mut self, model_type: impl Into<String>) -> Self {
        self.model_type = Some(model_type.into());
        self
    }

    pub fn prompt(&self) -> Option<String> {
        let model_type = self.model_type.as_deref()?.trim();
        if model_type.is_empty() {
            return None;
        }
        Some(format!(
            "Recommend an adaptive learning strategy for retraining the {model_type} model \
             on the latest monitoring data. Cover retraining cadence and the validation \
             metrics to track."
        ))
    }
}
