use chrono::NaiveDate;
use eframe::egui;
use shared::{
    domain::YieldCategory,
    protocol::{PredictRequest, PredictionResult},
};

pub const DISCLAIMER: &str = "This prediction is based on the provided agricultural parameters and historical data patterns. Actual yields may vary due to factors such as weather conditions, pest management, and cultivation practices.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

/// Everything the result card shows, derived from one successful prediction
/// and the inputs that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub predicted_yield: String,
    pub category: YieldCategory,
    pub inputs: Vec<SummaryRow>,
}

impl ResultSummary {
    pub fn build(result: &PredictionResult, submitted: &PredictRequest) -> Self {
        let row = |label, value| SummaryRow { label, value };
        Self {
            predicted_yield: format_grouped(result.predicted_yield),
            category: YieldCategory::from_yield(result.predicted_yield),
            inputs: vec![
                row("Sowing Date", format_long_date(&submitted.sowing_date)),
                row("Seed Type", submitted.seed_type.label().to_string()),
                row("Nitrogen (N)", format!("{} kg/ha", submitted.nitrogen_applied)),
                row(
                    "Phosphorus (P)",
                    format!("{} kg/ha", submitted.phosphorus_applied),
                ),
                row("Soil pH", submitted.soil_ph.to_string()),
                row(
                    "Plant Density",
                    format!("{} plants/ha", format_grouped(submitted.plant_density)),
                ),
            ],
        }
    }
}

/// `2025-04-01` becomes `April 1, 2025`. Anything else is shown unchanged.
pub fn format_long_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Thousands separators and at most three fraction digits, e.g. `1,234.5`.
pub fn format_grouped(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

pub fn category_color(category: YieldCategory) -> egui::Color32 {
    match category {
        YieldCategory::Excellent => egui::Color32::from_rgb(22, 163, 74),
        YieldCategory::Good => egui::Color32::from_rgb(37, 99, 235),
        YieldCategory::Average => egui::Color32::from_rgb(202, 138, 4),
        YieldCategory::BelowAverage => egui::Color32::from_rgb(220, 38, 38),
    }
}

pub fn show_result_card(ui: &mut egui::Ui, summary: &ResultSummary) {
    let accent = category_color(summary.category);
    let tint = accent.gamma_multiply(0.12);

    egui::Frame::NONE
        .fill(ui.visuals().extreme_bg_color)
        .corner_radius(14.0)
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .inner_margin(egui::Margin::symmetric(20, 18))
        .show(ui, |ui| {
            ui.heading("📈 Yield Prediction Results");
            ui.add_space(8.0);

            ui.columns(2, |cols| {
                egui::Frame::NONE
                    .fill(tint)
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::same(12))
                    .show(&mut cols[0], |ui| {
                        ui.weak("Predicted Yield");
                        ui.label(
                            egui::RichText::new(&summary.predicted_yield)
                                .size(30.0)
                                .strong(),
                        );
                        ui.weak("kg/ha");
                    });
                cols[0].add_space(8.0);
                egui::Frame::NONE
                    .fill(tint)
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(&mut cols[0], |ui| {
                        ui.horizontal(|ui| {
                            ui.weak("Yield Category");
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.label(
                                    egui::RichText::new(summary.category.label())
                                        .strong()
                                        .color(accent),
                                );
                            });
                        });
                    });

                cols[1].label(egui::RichText::new("📅 Input Summary").strong());
                egui::Grid::new("result_input_summary")
                    .num_columns(2)
                    .spacing([16.0, 6.0])
                    .show(&mut cols[1], |ui| {
                        for row in &summary.inputs {
                            ui.weak(format!("{}:", row.label));
                            ui.label(egui::RichText::new(&row.value).strong());
                            ui.end_row();
                        }
                    });
            });

            ui.add_space(10.0);
            egui::Frame::NONE
                .fill(ui.visuals().faint_bg_color)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(12, 10))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.small(egui::RichText::new("Note:").strong());
                        ui.small(DISCLAIMER);
                    });
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::SeedType;

    fn submitted() -> PredictRequest {
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
    }

    #[test]
    fn scenario_summary_is_good_with_echoed_inputs() {
        let summary = ResultSummary::build(
            &PredictionResult {
                predicted_yield: 7200.0,
            },
            &submitted(),
        );

        assert_eq!(summary.predicted_yield, "7,200");
        assert_eq!(summary.category, YieldCategory::Good);
        let rows: Vec<(&str, &str)> = summary
            .inputs
            .iter()
            .map(|row| (row.label, row.value.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Sowing Date", "April 1, 2025"),
                ("Seed Type", "Hybrid"),
                ("Nitrogen (N)", "120 kg/ha"),
                ("Phosphorus (P)", "60 kg/ha"),
                ("Soil pH", "7.5"),
                ("Plant Density", "53,000 plants/ha"),
            ]
        );
    }

    #[test]
    fn building_twice_gives_the_same_summary() {
        let result = PredictionResult {
            predicted_yield: 8000.0,
        };
        let request = submitted();
        let first = ResultSummary::build(&result, &request);
        assert_eq!(first, ResultSummary::build(&result, &request));
        assert_eq!(first.category, YieldCategory::Excellent);
        assert_eq!(request, submitted());
    }

    #[test]
    fn category_follows_yield_thresholds() {
        for (value, expected) in [
            (8000.0, "Excellent"),
            (7999.99, "Good"),
            (6000.0, "Good"),
            (4000.0, "Average"),
            (3999.99, "Below Average"),
        ] {
            let summary = ResultSummary::build(
                &PredictionResult {
                    predicted_yield: value,
                },
                &submitted(),
            );
            assert_eq!(summary.category.label(), expected, "yield {value}");
        }
    }

    #[test]
    fn long_date_formatting() {
        assert_eq!(format_long_date("2025-04-01"), "April 1, 2025");
        assert_eq!(format_long_date("2024-12-25"), "December 25, 2024");
        assert_eq!(format_long_date("next tuesday"), "next tuesday");
    }

    #[test]
    fn grouped_number_formatting() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.5), "999.5");
        assert_eq!(format_grouped(7200.0), "7,200");
        assert_eq!(format_grouped(1234567.891), "1,234,567.891");
        assert_eq!(format_grouped(1234.56789), "1,234.568");
        assert_eq!(format_grouped(-1234.5), "-1,234.5");
        assert_eq!(format_grouped(7999.99), "7,999.99");
    }
}
