//! Stateless field widgets. Each one draws a labelled control bound to a
//! single form field and reports the user's edit as raw text; the caller
//! decides what the text means.

use eframe::egui;
use shared::domain::{FieldKind, FieldName, FieldSpec, SeedType};

pub const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 38, 38);
const ERROR_STROKE: egui::Color32 = egui::Color32::from_rgb(252, 165, 165);
const INPUT_HEIGHT: f32 = 34.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: FieldName,
    pub raw: String,
}

#[derive(Debug, Default)]
pub struct FieldOutput {
    pub change: Option<FieldChange>,
    /// Enter was pressed while the control had focus.
    pub submit: bool,
}

pub fn field_label(ui: &mut egui::Ui, spec: &FieldSpec) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        ui.label(egui::RichText::new(spec.label).strong());
        if spec.required {
            ui.label(egui::RichText::new("*").color(ERROR_TEXT));
        }
    });
}

fn error_line(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(error) = error {
        ui.label(egui::RichText::new(error).small().color(ERROR_TEXT));
    }
}

fn tint_for_error(ui: &mut egui::Ui, has_error: bool) {
    if has_error {
        let stroke = egui::Stroke::new(1.0, ERROR_STROKE);
        let widgets = &mut ui.visuals_mut().widgets;
        widgets.inactive.bg_stroke = stroke;
        widgets.hovered.bg_stroke = stroke;
        ui.visuals_mut().selection.stroke = egui::Stroke::new(1.0, ERROR_TEXT);
    }
}

/// Stable id of a field's text control; each field is drawn once per frame.
pub fn field_id(field: FieldName) -> egui::Id {
    egui::Id::new(("form_field", field.wire_name()))
}

/// Date and numeric fields. `text` is whatever the controller holds for the field.
pub fn text_field(
    ui: &mut egui::Ui,
    spec: &FieldSpec,
    text: &str,
    error: Option<&str>,
    enabled: bool,
) -> FieldOutput {
    let mut output = FieldOutput::default();

    ui.vertical(|ui| {
        field_label(ui, spec);

        let mut buffer = text.to_owned();
        let response = ui
            .scope(|ui| {
                tint_for_error(ui, error.is_some());
                let mut edit = egui::TextEdit::singleline(&mut buffer)
                    .id(field_id(spec.name))
                    .hint_text(
                        egui::RichText::new(spec.placeholder)
                            .color(ui.visuals().weak_text_color().gamma_multiply(0.85)),
                    )
                    .desired_width(f32::INFINITY);
                if spec.name.is_numeric() {
                    // up/down step the value instead of moving focus
                    // (egui 0.33's TextEdit has no `event_filter` setter; its default
                    // filter already captures both arrow axes with tab/escape off,
                    // and `lock_focus(false)` pins exactly that filter.)
                    edit = edit.lock_focus(false);
                }
                ui.add_enabled_ui(enabled, |ui| {
                    ui.add_sized([ui.available_width(), INPUT_HEIGHT], edit)
                })
                .inner
            })
            .inner;

        if let FieldKind::Numeric { step, min, max } = spec.kind {
            if response.has_focus() {
                let direction = ui.input(|i| {
                    if i.key_pressed(egui::Key::ArrowUp) {
                        1.0
                    } else if i.key_pressed(egui::Key::ArrowDown) {
                        -1.0
                    } else {
                        0.0
                    }
                });
                if direction != 0.0 {
                    buffer = step_value(&buffer, step, min, max, direction);
                }
            }
        }

        if buffer != text {
            output.change = Some(FieldChange {
                field: spec.name,
                raw: buffer,
            });
        }
        output.submit =
            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        error_line(ui, error);
    });

    output
}

/// Seed type selector. Only the fixed options can be picked.
pub fn seed_type_field(
    ui: &mut egui::Ui,
    spec: &FieldSpec,
    current: Option<SeedType>,
    error: Option<&str>,
    enabled: bool,
) -> FieldOutput {
    let mut output = FieldOutput::default();

    ui.vertical(|ui| {
        field_label(ui, spec);

        let mut selected = current;
        ui.scope(|ui| {
            tint_for_error(ui, error.is_some());
            ui.add_enabled_ui(enabled, |ui| {
                ui.spacing_mut().interact_size.y = INPUT_HEIGHT;
                egui::ComboBox::from_id_salt(spec.name.wire_name())
                    .selected_text(current.map(SeedType::label).unwrap_or("Select..."))
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for seed in SeedType::ALL {
                            ui.selectable_value(&mut selected, Some(seed), seed.label());
                        }
                    });
            });
        });

        output.change = choice_change(spec.name, current, selected);
        error_line(ui, error);
    });

    output
}

fn choice_change(
    field: FieldName,
    current: Option<SeedType>,
    selected: Option<SeedType>,
) -> Option<FieldChange> {
    match selected {
        Some(seed) if selected != current => Some(FieldChange {
            field,
            raw: seed.label().to_string(),
        }),
        _ => None,
    }
}

/// Nudges the number in `text` by one `step` (1 when unset), clamped to the
/// field bounds. Text that is not a number steps from zero.
pub fn step_value(
    text: &str,
    step: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    direction: f64,
) -> String {
    let step = step.unwrap_or(1.0);
    let current = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);

    let mut next = current + step * direction.signum();
    // keep to the step's precision so 0.1 + 0.2 shows as 0.3
    let decimals = decimal_places(step);
    let scale = 10f64.powi(decimals as i32);
    next = (next * scale).round() / scale;
    if let Some(min) = min {
        next = next.max(min);
    }
    if let Some(max) = max {
        next = next.min(max);
    }

    format!("{next:.decimals$}")
}

fn decimal_places(step: f64) -> usize {
    let text = step.to_string();
    text.split_once('.')
        .map(|(_, frac)| frac.len())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One frame of `add` with `events` as input. Changes seen in any pass
    /// of the frame are kept.
    fn run_frame(
        ctx: &egui::Context,
        events: Vec<egui::Event>,
        mut add: impl FnMut(&mut egui::Ui) -> FieldOutput,
    ) -> FieldOutput {
        let mut merged = FieldOutput::default();
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let output = add(ui);
                if output.change.is_some() {
                    merged.change = output.change;
                }
                merged.submit |= output.submit;
            });
        });
        merged
    }

    fn press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Draws `field` once with keyboard focus on it.
    fn focus_field(ctx: &egui::Context, field: FieldName, text: &str) {
        let output = run_frame(ctx, Vec::new(), |ui| {
            ui.memory_mut(|mem| mem.request_focus(field_id(field)));
            text_field(ui, field.spec(), text, None, true)
        });
        assert!(output.change.is_none());
    }

    #[test]
    fn untouched_text_field_emits_nothing() {
        let ctx = egui::Context::default();
        let output = run_frame(&ctx, Vec::new(), |ui| {
            text_field(
                ui,
                FieldName::SoilPh.spec(),
                "7.5",
                Some("Soil pH must be between 0 and 14"),
                true,
            )
        });

        assert!(output.change.is_none());
        assert!(!output.submit);
    }

    #[test]
    fn typed_text_is_reported_raw() {
        let ctx = egui::Context::default();
        let field = FieldName::NitrogenApplied;
        focus_field(&ctx, field, "");

        let output = run_frame(&ctx, vec![egui::Event::Text("12a".to_string())], |ui| {
            text_field(ui, field.spec(), "", None, true)
        });

        assert_eq!(
            output.change,
            Some(FieldChange {
                field,
                raw: "12a".to_string(),
            })
        );
        assert!(!output.submit);
    }

    #[test]
    fn enter_in_a_focused_field_requests_submit() {
        let ctx = egui::Context::default();
        let field = FieldName::SowingDate;
        focus_field(&ctx, field, "2025-04-01");

        let output = run_frame(&ctx, vec![press(egui::Key::Enter)], |ui| {
            text_field(ui, field.spec(), "2025-04-01", None, true)
        });

        assert!(output.submit);
        assert!(output.change.is_none());
    }

    #[test]
    fn arrow_up_steps_a_focused_numeric_field() {
        let ctx = egui::Context::default();
        let field = FieldName::SoilPh;
        focus_field(&ctx, field, "7.5");

        let output = run_frame(&ctx, vec![press(egui::Key::ArrowUp)], |ui| {
            text_field(ui, field.spec(), "7.5", None, true)
        });

        assert_eq!(output.change.map(|change| change.raw), Some("7.6".to_string()));
    }

    #[test]
    fn arrow_keys_leave_the_date_field_alone() {
        let ctx = egui::Context::default();
        let field = FieldName::SowingDate;
        focus_field(&ctx, field, "2025-04-01");

        let output = run_frame(&ctx, vec![press(egui::Key::ArrowUp)], |ui| {
            text_field(ui, field.spec(), "2025-04-01", None, true)
        });

        assert!(output.change.is_none());
    }

    #[test]
    fn disabled_field_ignores_typing() {
        let ctx = egui::Context::default();
        let field = FieldName::PlantDensity;
        focus_field(&ctx, field, "53000");

        let output = run_frame(&ctx, vec![egui::Event::Text("9".to_string())], |ui| {
            text_field(ui, field.spec(), "53000", None, false)
        });

        assert!(output.change.is_none());
    }

    #[test]
    fn untouched_seed_selector_emits_nothing() {
        let ctx = egui::Context::default();
        let output = run_frame(&ctx, Vec::new(), |ui| {
            seed_type_field(
                ui,
                FieldName::SeedType.spec(),
                Some(SeedType::Hybrid),
                None,
                false,
            )
        });

        assert!(output.change.is_none());
    }

    #[test]
    fn choosing_a_different_seed_emits_its_label() {
        assert_eq!(
            choice_change(FieldName::SeedType, Some(SeedType::Hybrid), Some(SeedType::Local)),
            Some(FieldChange {
                field: FieldName::SeedType,
                raw: "Local".to_string(),
            })
        );
        assert_eq!(
            choice_change(FieldName::SeedType, Some(SeedType::Local), Some(SeedType::Local)),
            None
        );
        assert_eq!(
            choice_change(FieldName::SeedType, None, Some(SeedType::Improved))
                .map(|change| change.raw),
            Some("Improved".to_string())
        );
    }

    #[test]
    fn stepping_respects_step_and_bounds() {
        assert_eq!(step_value("7.5", Some(0.1), Some(0.0), Some(14.0), 1.0), "7.6");
        assert_eq!(step_value("14", Some(0.1), Some(0.0), Some(14.0), 1.0), "14.0");
        assert_eq!(step_value("0", None, Some(0.0), None, -1.0), "0");
        assert_eq!(step_value("119", None, Some(0.0), None, 1.0), "120");
        assert_eq!(step_value("abc", Some(0.1), None, None, -1.0), "-0.1");
    }
}
