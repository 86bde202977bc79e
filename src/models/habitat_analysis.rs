use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Model;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitatAnalysisRequest {
    /// Region of interest, e.g. `Nigeria`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// URL of the satellite imagery to analyse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_data: Option<EnvironmentalData>,
}

/// Free-form environmental readings. Keys are kept as received; the common
/// numeric readings have typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentalData(Map<String, Value>);

impl EnvironmentalData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn reading(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn temperature(&self) -> Option<f64> {
        self.reading("temperature")
    }

    pub fn humidity(&self) -> Option<f64> {
        self.reading("humidity")
    }

    pub fn rainfall(&self) -> Option<f64> {
        self.reading("rainfall")
    }

    pub fn vegetation_index(&self) -> Option<f64> {
        self.reading("vegetation_index")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl Model for HabitatAnalysisRequest {
    const ATTRIBUTE_MAP: &'static [&'static str] =
        &["region", "satellite_image_url", "environmental_data"];
}

impl HabitatAnalysisRequest {
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_satellite_image_url(mut self, url: impl Into<String>) -> Self {
        self.satellite_image_url = Some(url.into());
        self
    }

    pub fn with_environmental_data(mut self, data: EnvironmentalData) -> Self {
        self.environmental_data = Some(data);
        self
    }

    /// Analysis prompt for the completion service; `None` without a region.
    pub fn prompt(&self) -> Option<String> {
        let region = self.region.as_deref()?.trim();
        if region.is_empty() {
            return None;
        }

        let mut prompt = format!("Analyze habitat suitability and outbreak risk for the region {region}.");
        if let Some(url) = self.satellite_image_url.as_deref().filter(|u| !u.is_empty()) {
            prompt.push_str(&format!(" Satellite imagery: {url}."));
        }
        if let Some(data) = self.environmental_data.as_ref().filter(|d| !d.is_empty()) {
            prompt.push_str(&format!(" Environmental data: {}.", data.to_value()));
        }
        prompt.push_str(" Rate the risk level as LOW, MEDIUM or HIGH and name the driving environmental factors.");
        Some(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_with_nested_object() {
        let input = json!({
            "region": "Nigeria",
            "satellite_image_url": "https://imagery.example.com/lagos.tif",
            "environmental_data": {
                "temperature": 31,
                "humidity": 0.82,
                "land_cover": "urban",
                "stations": [{"id": "LG-1", "active": true}]
            }
        });
        let req = HabitatAnalysisRequest::from_value(input.clone()).unwrap();
        assert_eq!(req.region.as_deref(), Some("Nigeria"));
        let data = req.environmental_data.as_ref().unwrap();
        assert_eq!(data.temperature(), Some(31.0));
        assert_eq!(data.humidity(), Some(0.82));
        assert_eq!(data.rainfall(), None);
        assert_eq!(data.get("land_cover"), Some(&json!("urban")));
        assert_eq!(req.to_value(), input);
    }

    #[test]
    fn absent_fields_stay_absent() {
        let input = json!({"region": "Kano"});
        let req = HabitatAnalysisRequest::from_value(input.clone()).unwrap();
        assert!(req.environmental_data.is_none());
        assert_eq!(req.to_value(), input);
    }

    #[test]
    fn nested_object_must_be_an_object() {
        assert!(
            HabitatAnalysisRequest::from_value(json!({"environmental_data": "hot"})).is_err()
        );
    }

    #[test]
    fn prompt_includes_available_context() {
        let req = HabitatAnalysisRequest::default()
            .with_region("Lagos")
            .with_satellite_image_url("https://img.example.com/a.png")
            .with_environmental_data(EnvironmentalData::new().with("rainfall", 120));
        let prompt = req.prompt().unwrap();
        assert!(prompt.contains("region Lagos"));
        assert!(prompt.contains("https://img.example.com/a.png"));
        assert!(prompt.contains("\"rainfall\":120"));

        let bare = HabitatAnalysisRequest::default().with_region("Enugu").prompt().unwrap();
        assert!(!bare.contains("Satellite imagery"));
        assert!(!bare.contains("Environmental data"));
    }

    #[test]
    fn prompt_requires_region() {
        assert!(HabitatAnalysisRequest::default().prompt().is_none());
        assert!(
            HabitatAnalysisRequest::default()
                .with_region(" ")
                .prompt()
                .is_none()
        );
    }
}
