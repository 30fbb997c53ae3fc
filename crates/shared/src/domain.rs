use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseFieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    SowingDate,
    SeedType,
    NitrogenApplied,
    PhosphorusApplied,
    SoilPh,
    AverageTemperature,
    AverageRainfall,
    AverageHumidity,
    PlantDensity,
}

impl FieldName {
    /// Form order, which is also the order fields are laid out in.
    pub const ALL: [FieldName; 9] = [
        FieldName::SowingDate,
        FieldName::SeedType,
        FieldName::NitrogenApplied,
        FieldName::PhosphorusApplied,
        FieldName::SoilPh,
        FieldName::AverageTemperature,
        FieldName::AverageRainfall,
        FieldName::AverageHumidity,
        FieldName::PlantDensity,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            FieldName::SowingDate => "sowingDate",
            FieldName::SeedType => "seedType",
            FieldName::NitrogenApplied => "nitrogenApplied",
            FieldName::PhosphorusApplied => "phosphorusApplied",
            FieldName::SoilPh => "soilPh",
            FieldName::AverageTemperature => "averageTemperature",
            FieldName::AverageRainfall => "averageRainfall",
            FieldName::AverageHumidity => "averageHumidity",
            FieldName::PlantDensity => "plantDensity",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, FieldName::SowingDate | FieldName::SeedType)
    }

    pub fn spec(self) -> &'static FieldSpec {
        // FIELD_SPECS is laid out in declaration order.
        &FIELD_SPECS[self as usize]
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FieldName {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| ParseFieldError::UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeedType {
    Hybrid,
    Local,
    Improved,
}

impl SeedType {
    pub const ALL: [SeedType; 3] = [SeedType::Hybrid, SeedType::Local, SeedType::Improved];

    pub fn label(self) -> &'static str {
        match self {
            SeedType::Hybrid => "Hybrid",
            SeedType::Local => "Local",
            SeedType::Improved => "Improved",
        }
    }
}

impl fmt::Display for SeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeedType {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeedType::ALL
            .into_iter()
            .find(|seed| seed.label() == s)
            .ok_or_else(|| ParseFieldError::UnknownSeedType(s.to_string()))
    }
}

/// Everything the user enters for one prediction.
///
/// Numeric fields start at zero and never hold NaN or infinities; the seed type
/// is only `None` after a change event carried an option outside [`SeedType::ALL`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormRecord {
    pub sowing_date: String,
    pub nitrogen_applied: f64,
    pub phosphorus_applied: f64,
    pub soil_ph: f64,
    pub average_temperature: f64,
    pub average_rainfall: f64,
    pub average_humidity: f64,
    pub plant_density: f64,
    pub seed_type: Option<SeedType>,
}

impl Default for FormRecord {
    fn default() -> Self {
        Self {
            sowing_date: String::new(),
            nitrogen_applied: 0.0,
            phosphorus_applied: 0.0,
            soil_ph: 0.0,
            average_temperature: 0.0,
            average_rainfall: 0.0,
            average_humidity: 0.0,
            plant_density: 0.0,
            seed_type: Some(SeedType::Hybrid),
        }
    }
}

impl FormRecord {
    /// Current value of a numeric field, `None` for the date and seed fields.
    pub fn numeric(&self, field: FieldName) -> Option<f64> {
        match field {
            FieldName::NitrogenApplied => Some(self.nitrogen_applied),
            FieldName::PhosphorusApplied => Some(self.phosphorus_applied),
            FieldName::SoilPh => Some(self.soil_ph),
            FieldName::AverageTemperature => Some(self.average_temperature),
            FieldName::AverageRainfall => Some(self.average_rainfall),
            FieldName::AverageHumidity => Some(self.average_humidity),
            FieldName::PlantDensity => Some(self.plant_density),
            FieldName::SowingDate | FieldName::SeedType => None,
        }
    }

    /// Returns false (and changes nothing) for the date and seed fields.
    pub fn set_numeric(&mut self, field: FieldName, value: f64) -> bool {
        let slot = match field {
            FieldName::NitrogenApplied => &mut self.nitrogen_applied,
            FieldName::PhosphorusApplied => &mut self.phosphorus_applied,
            FieldName::SoilPh => &mut self.soil_ph,
            FieldName::AverageTemperature => &mut self.average_temperature,
            FieldName::AverageRainfall => &mut self.average_rainfall,
            FieldName::AverageHumidity => &mut self.average_humidity,
            FieldName::PlantDensity => &mut self.plant_density,
            FieldName::SowingDate | FieldName::SeedType => return false,
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Date,
    Numeric {
        step: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    },
    Choice,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
    pub required: bool,
}

pub const FIELD_SPECS: [FieldSpec; 9] = [
    FieldSpec {
        name: FieldName::SowingDate,
        label: "Sowing Date",
        kind: FieldKind::Date,
        placeholder: "YYYY-MM-DD",
        required: true,
    },
    FieldSpec {
        name: FieldName::SeedType,
        label: "Seed Type",
        kind: FieldKind::Choice,
        placeholder: "",
        required: true,
    },
    FieldSpec {
        name: FieldName::NitrogenApplied,
        label: "Fertilizer Nitrogen (N) Applied",
        kind: FieldKind::Numeric {
            step: None,
            min: Some(0.0),
            max: None,
        },
        placeholder: "kg/ha",
        required: true,
    },
    FieldSpec {
        name: FieldName::PhosphorusApplied,
        label: "Fertilizer Phosphorus (P) Applied",
        kind: FieldKind::Numeric {
            step: None,
            min: Some(0.0),
            max: None,
        },
        placeholder: "kg/ha",
        required: true,
    },
    FieldSpec {
        name: FieldName::SoilPh,
        label: "Soil pH",
        kind: FieldKind::Numeric {
            step: Some(0.1),
            min: Some(0.0),
            max: Some(14.0),
        },
        placeholder: "0.0 - 14.0",
        required: true,
    },
    FieldSpec {
        name: FieldName::AverageTemperature,
        label: "Average Temperature",
        kind: FieldKind::Numeric {
            step: Some(0.1),
            min: None,
            max: None,
        },
        placeholder: "°C",
        required: true,
    },
    FieldSpec {
        name: FieldName::AverageRainfall,
        label: "Average Rainfall",
        kind: FieldKind::Numeric {
            step: Some(0.1),
            min: Some(0.0),
            max: None,
        },
        placeholder: "mm",
        required: true,
    },
    FieldSpec {
        name: FieldName::AverageHumidity,
        label: "Average Humidity",
        kind: FieldKind::Numeric {
            step: Some(0.1),
            min: Some(0.0),
            max: Some(100.0),
        },
        placeholder: "%",
        required: true,
    },
    FieldSpec {
        name: FieldName::PlantDensity,
        label: "Plant Density",
        kind: FieldKind::Numeric {
            step: None,
            min: Some(0.0),
            max: None,
        },
        placeholder: "plants/ha",
        required: true,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldCategory {
    Excellent,
    Good,
    Average,
    BelowAverage,
}

impl YieldCategory {
    /// Thresholds in kg/ha, lower bound inclusive.
    pub fn from_yield(kg_per_ha: f64) -> Self {
        if kg_per_ha >= 8000.0 {
            YieldCategory::Excellent
        } else if kg_per_ha >= 6000.0 {
            YieldCategory::Good
        } else if kg_per_ha >= 4000.0 {
            YieldCategory::Average
        } else {
            YieldCategory::BelowAverage
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            YieldCategory::Excellent => "Excellent",
            YieldCategory::Good => "Good",
            YieldCategory::Average => "Average",
            YieldCategory::BelowAverage => "Below Average",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_specs_cover_every_field_in_form_order() {
        let names: Vec<FieldName> = FIELD_SPECS.iter().map(|spec| spec.name).collect();
        assert_eq!(names, FieldName::ALL.to_vec());
        for field in FieldName::ALL {
            assert_eq!(field.spec().name, field);
        }
    }

    #[test]
    fn field_names_parse_from_wire_names() {
        assert_eq!("soilPh".parse::<FieldName>().expect("field"), FieldName::SoilPh);
        assert!("soil_ph".parse::<FieldName>().is_err());
    }

    #[test]
    fn seed_type_parses_only_offered_options() {
        assert_eq!("Improved".parse::<SeedType>().expect("seed"), SeedType::Improved);
        assert!("".parse::<SeedType>().is_err());
        assert!("hybrid".parse::<SeedType>().is_err());
    }

    #[test]
    fn default_record_is_zeroed_with_hybrid_seed() {
        let record = FormRecord::default();
        assert!(record.sowing_date.is_empty());
        for field in FieldName::ALL.into_iter().filter(|f| f.is_numeric()) {
            assert_eq!(record.numeric(field), Some(0.0));
        }
        assert_eq!(record.seed_type, Some(SeedType::Hybrid));
    }

    #[test]
    fn set_numeric_ignores_non_numeric_fields() {
        let mut record = FormRecord::default();
        assert!(record.set_numeric(FieldName::PlantDensity, 53000.0));
        assert!(!record.set_numeric(FieldName::SowingDate, 1.0));
        assert_eq!(record.plant_density, 53000.0);
        assert!(record.sowing_date.is_empty());
    }

    #[test]
    fn yield_category_bounds_are_closed_below() {
        assert_eq!(YieldCategory::from_yield(8000.0), YieldCategory::Excellent);
        assert_eq!(YieldCategory::from_yield(7999.99), YieldCategory::Good);
        assert_eq!(YieldCategory::from_yield(6000.0), YieldCategory::Good);
        assert_eq!(YieldCategory::from_yield(4000.0), YieldCategory::Average);
        assert_eq!(YieldCategory::from_yield(3999.99), YieldCategory::BelowAverage);
        assert_eq!(YieldCategory::BelowAverage.label(), "Below Average");
    }
}
