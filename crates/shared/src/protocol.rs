use serde::{Deserialize, Serialize};

use crate::domain::SeedType;

/// Body of `POST /predict`: a validated form record with every field present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub sowing_date: String,
    pub nitrogen_applied: f64,
    pub phosphorus_applied: f64,
    pub soil_ph: f64,
    pub average_temperature: f64,
    pub average_rainfall: f64,
    pub average_humidity: f64,
    pub plant_density: f64,
    pub seed_type: SeedType,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// kg per hectare.
    pub predicted_yield: f64,
}
