use super::*;
use crate::domain::SeedType;

fn valid_record() -> FormRecord {
    FormRecord {
        sowing_date: "2025-04-01".to_string(),
        nitrogen_applied: 120.0,
        phosphorus_applied: 60.0,
        soil_ph: 7.5,
        average_temperature: 25.0,
        average_rainfall: 500.0,
        average_humidity: 60.0,
        plant_density: 53000.0,
        seed_type: Some(SeedType::Hybrid),
    }
}

#[test]
fn valid_record_becomes_request_field_for_field() {
    let request = validate(&valid_record()).expect("valid");
    assert_eq!(
        request,
        PredictRequest {
            sowing_date: "2025-04-01".to_string(),
            nitrogen_applied: 120.0,
            phosphorus_applied: 60.0,
            soil_ph: 7.5,
            average_temperature: 25.0,
            average_rainfall: 500.0,
            average_humidity: 60.0,
            plant_density: 53000.0,
            seed_type: SeedType::Hybrid,
        }
    );
}

#[test]
fn zero_nitrogen_flags_only_nitrogen() {
    let mut record = valid_record();
    record.nitrogen_applied = 0.0;

    let errors = validate(&record).expect_err("must fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors.get(FieldName::NitrogenApplied),
        Some("Nitrogen applied must be greater than 0")
    );
}

#[test]
fn default_record_reports_every_failing_field_without_short_circuit() {
    let errors = validate(&FormRecord::default()).expect_err("must fail");
    let failing: Vec<FieldName> = errors.fields().collect();
    assert_eq!(
        failing,
        vec![
            FieldName::SowingDate,
            FieldName::NitrogenApplied,
            FieldName::PhosphorusApplied,
            FieldName::SoilPh,
            FieldName::PlantDensity,
        ]
    );
    // zero is inside the temperature, rainfall and humidity ranges
    assert!(!errors.contains(FieldName::AverageTemperature));
    assert!(!errors.contains(FieldName::AverageRainfall));
    assert!(!errors.contains(FieldName::AverageHumidity));
}

#[test]
fn soil_ph_range_excludes_zero_and_includes_fourteen() {
    let mut record = valid_record();
    for (value, ok) in [(0.0, false), (0.1, true), (14.0, true), (14.01, false), (-1.0, false)] {
        record.soil_ph = value;
        assert_eq!(check_field(&record, FieldName::SoilPh).is_none(), ok, "pH {value}");
    }
}

#[test]
fn temperature_range_excludes_minus_fifty_and_includes_sixty() {
    let mut record = valid_record();
    for (value, ok) in [(-50.0, false), (-49.9, true), (60.0, true), (60.1, false)] {
        record.average_temperature = value;
        assert_eq!(
            check_field(&record, FieldName::AverageTemperature).is_none(),
            ok,
            "temperature {value}"
        );
    }
}

#[test]
fn rainfall_and_humidity_accept_their_closed_bounds() {
    let mut record = valid_record();
    record.average_rainfall = 0.0;
    record.average_humidity = 0.0;
    assert!(validate(&record).is_ok());

    record.average_humidity = 100.0;
    assert!(validate(&record).is_ok());

    record.average_rainfall = -0.5;
    record.average_humidity = 100.5;
    let errors = validate(&record).expect_err("must fail");
    assert_eq!(errors.get(FieldName::AverageRainfall), Some("Rainfall cannot be negative"));
    assert_eq!(
        errors.get(FieldName::AverageHumidity),
        Some("Humidity must be between 0% and 100%")
    );
}

#[test]
fn blank_sowing_date_and_unset_seed_are_required() {
    let mut record = valid_record();
    record.sowing_date = "   ".to_string();
    record.seed_type = None;

    let errors = validate(&record).expect_err("must fail");
    assert_eq!(errors.get(FieldName::SowingDate), Some("Sowing date is required"));
    assert_eq!(errors.get(FieldName::SeedType), Some("Seed type is required"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn clearing_one_entry_leaves_the_rest() {
    let mut errors = collect_errors(&FormRecord::default());
    let before = errors.len();

    assert!(errors.clear_field(FieldName::SoilPh));
    assert!(!errors.clear_field(FieldName::SoilPh));
    assert_eq!(errors.len(), before - 1);
    assert!(errors.contains(FieldName::NitrogenApplied));
}
