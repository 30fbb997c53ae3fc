use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{FieldKind, FieldName};

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::form::{FormController, SubmitOutcome};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::results::{show_result_card, ResultSummary};
use crate::ui::widgets::{seed_type_field, text_field, FieldChange, FieldOutput, ERROR_TEXT};

const CARD_MAX_WIDTH: f32 = 860.0;

#[derive(Debug, Clone)]
struct StatusBanner {
    message: String,
}

pub struct PredictorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    controller: FormController,
    server_url: String,
    status: String,
    status_banner: Option<StatusBanner>,
}

impl PredictorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &Settings,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            controller: FormController::new(settings.numeric_input),
            server_url: settings.server_url.clone(),
            status: "Starting...".to_string(),
            status_banner: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::PredictionReady(result) => {
                    if self.controller.complete(Ok(result)) {
                        self.status = "Prediction received".to_string();
                    }
                }
                UiEvent::PredictionFailed(cause) => {
                    if self.controller.complete(Err(cause)) {
                        self.status = "Prediction failed".to_string();
                    }
                }
                UiEvent::Error(err) => self.show_error(err),
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        tracing::warn!(context = ?err.context(), "{}", err.message());
        self.status = err.message().to_string();
        let prefix = match err.context() {
            UiErrorContext::BackendStartup => "Startup",
            UiErrorContext::Prediction => err_label(err.category()),
        };
        self.status_banner = Some(StatusBanner {
            message: format!("{prefix} error: {}", err.message()),
        });
    }

    fn apply_change(&mut self, change: FieldChange) {
        self.controller.handle_change(change.field, &change.raw);
    }

    fn try_submit(&mut self) {
        let request = match self.controller.submit() {
            SubmitOutcome::Dispatch(request) => request,
            SubmitOutcome::Rejected => {
                self.status = format!(
                    "Please fix {} highlighted field(s)",
                    self.controller.errors().len()
                );
                return;
            }
            SubmitOutcome::Busy => return,
        };

        tracing::info!(server_url = %self.server_url, "submitting prediction request");
        self.status = "Predicting yield...".to_string();
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::Predict { request },
            &mut self.status,
        );
        if !queued {
            // nothing will ever answer; resolve the request here
            let cause = self.status.clone();
            self.controller.complete(Err(cause.clone()));
            self.show_error(UiError::from_message(UiErrorContext::Prediction, cause));
        }
    }

    fn show_field(&self, ui: &mut egui::Ui, field: FieldName) -> FieldOutput {
        let spec = field.spec();
        let error = self.controller.error(field);
        // inputs stay editable while a request is in flight
        match spec.kind {
            FieldKind::Choice => {
                seed_type_field(ui, spec, self.controller.seed_type(), error, true)
            }
            FieldKind::Date | FieldKind::Numeric { .. } => {
                text_field(ui, spec, self.controller.field_text(field), error, true)
            }
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new("Agricultural Intelligence Platform").size(28.0));
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(
                    "Leverage advanced machine learning models to predict maize crop yields based on environmental conditions and agricultural practices.",
                )
                .weak(),
            );
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_form_card(&mut self, ui: &mut egui::Ui) {
        let mut outputs = Vec::with_capacity(FieldName::ALL.len());
        let mut submit_clicked = false;

        egui::Frame::NONE
            .fill(ui.visuals().extreme_bg_color)
            .corner_radius(14.0)
            .stroke(egui::Stroke::new(
                1.0,
                ui.visuals().widgets.noninteractive.bg_stroke.color,
            ))
            .inner_margin(egui::Margin::symmetric(20, 18))
            .show(ui, |ui| {
                ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 8.0);

                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("🌱").size(24.0));
                    ui.vertical(|ui| {
                        ui.heading("Maize Yield Prediction");
                        ui.weak("Enter crop parameters to predict your harvest yield");
                    });
                });
                ui.add_space(8.0);

                // two fields per row in form order; plant density spans the last row
                for pair in FieldName::ALL.chunks(2) {
                    if let [left, right] = pair {
                        ui.columns(2, |cols| {
                            outputs.push(self.show_field(&mut cols[0], *left));
                            outputs.push(self.show_field(&mut cols[1], *right));
                        });
                    } else {
                        for field in pair {
                            outputs.push(self.show_field(ui, *field));
                        }
                    }
                    ui.add_space(4.0);
                }

                ui.add_space(12.0);
                let loading = self.controller.is_loading();
                let label = if loading {
                    egui::RichText::new("Predicting yield...").strong().size(16.0)
                } else {
                    egui::RichText::new("➤ Predict Yield").strong().size(16.0)
                };
                ui.horizontal(|ui| {
                    if loading {
                        ui.spinner();
                    }
                    let button = egui::Button::new(label)
                        .min_size(egui::vec2(ui.available_width(), 40.0));
                    if ui.add_enabled(self.controller.can_submit(), button).clicked() {
                        submit_clicked = true;
                    }
                });

                if let Some(message) = self.controller.failure_message() {
                    ui.add_space(8.0);
                    egui::Frame::NONE
                        .fill(ERROR_TEXT.gamma_multiply(0.12))
                        .stroke(egui::Stroke::new(1.0, ERROR_TEXT.gamma_multiply(0.5)))
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(12, 10))
                        .show(ui, |ui| {
                            ui.label(egui::RichText::new(message).color(ERROR_TEXT));
                        });
                }
            });

        let mut submit_requested = submit_clicked;
        for output in outputs {
            submit_requested |= output.submit;
            if let Some(change) = output.change {
                self.apply_change(change);
            }
        }
        if submit_requested {
            self.try_submit();
        }
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.small(
                egui::RichText::new(
                    "© 2025 Agricultural Intelligence Platform. Empowering farmers with data-driven insights.",
                )
                .weak(),
            );
            ui.horizontal_wrapped(|ui| {
                ui.small("Endpoint:");
                ui.small(egui::RichText::new(format!("{}/predict", self.server_url)).weak());
                ui.small("•");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }
}

impl eframe::App for PredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.set_max_width(CARD_MAX_WIDTH);
                        ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
                            ui.add_space(16.0);
                            self.show_header(ui);
                            ui.add_space(16.0);
                            self.show_status_banner(ui);
                            self.show_form_card(ui);

                            if let Some((result, submitted)) = self.controller.result() {
                                ui.add_space(16.0);
                                show_result_card(ui, &ResultSummary::build(result, submitted));
                            }

                            ui.add_space(24.0);
                            self.show_footer(ui);
                        });
                    });
                });
        });

        if self.controller.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
