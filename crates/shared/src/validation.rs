//! Submit-time validation of a [`FormRecord`].
//!
//! Every rule runs on every call; one failing field never hides another.

use std::collections::BTreeMap;

use crate::{
    domain::{FieldName, FormRecord},
    protocol::PredictRequest,
};

/// Field name to human-readable message. A field absent from the map is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: BTreeMap<FieldName, String>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Drops the entry for `field`, returning whether one existed.
    pub fn clear_field(&mut self, field: FieldName) -> bool {
        self.entries.remove(&field).is_some()
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

/// Message for `field` if its current value breaks a rule.
pub fn check_field(record: &FormRecord, field: FieldName) -> Option<&'static str> {
    let failed = match field {
        FieldName::SowingDate => record.sowing_date.trim().is_empty(),
        FieldName::NitrogenApplied => record.nitrogen_applied <= 0.0,
        FieldName::PhosphorusApplied => record.phosphorus_applied <= 0.0,
        FieldName::SoilPh => record.soil_ph <= 0.0 || record.soil_ph > 14.0,
        FieldName::AverageTemperature => {
            record.average_temperature <= -50.0 || record.average_temperature > 60.0
        }
        FieldName::AverageRainfall => record.average_rainfall < 0.0,
        FieldName::AverageHumidity => {
            record.average_humidity < 0.0 || record.average_humidity > 100.0
        }
        FieldName::PlantDensity => record.plant_density <= 0.0,
        FieldName::SeedType => record.seed_type.is_none(),
    };

    failed.then(|| failure_message(field))
}

fn failure_message(field: FieldName) -> &'static str {
    match field {
        FieldName::SowingDate => "Sowing date is required",
        FieldName::NitrogenApplied => "Nitrogen applied must be greater than 0",
        FieldName::PhosphorusApplied => "Phosphorus applied must be greater than 0",
        FieldName::SoilPh => "Soil pH must be between 0 and 14",
        FieldName::AverageTemperature => "Temperature must be between -50°C and 60°C",
        FieldName::AverageRainfall => "Rainfall cannot be negative",
        FieldName::AverageHumidity => "Humidity must be between 0% and 100%",
        FieldName::PlantDensity => "Plant density must be greater than 0",
        FieldName::SeedType => "Seed type is required",
    }
}

pub fn collect_errors(record: &FormRecord) -> ErrorMap {
    let mut errors = ErrorMap::new();
    for field in FieldName::ALL {
        if let Some(message) = check_field(record, field) {
            errors.insert(field, message);
        }
    }
    errors
}

/// Turns a record into the request body, or the full set of failing fields.
pub fn validate(record: &FormRecord) -> Result<PredictRequest, ErrorMap> {
    let errors = collect_errors(record);
    match (errors.is_empty(), record.seed_type) {
        (true, Some(seed_type)) => Ok(PredictRequest {
            sowing_date: record.sowing_date.clone(),
            nitrogen_applied: record.nitrogen_applied,
            phosphorus_applied: record.phosphorus_applied,
            soil_ph: record.soil_ph,
            average_temperature: record.average_temperature,
            average_rainfall: record.average_rainfall,
            average_humidity: record.average_humidity,
            plant_density: record.plant_density,
            seed_type,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
