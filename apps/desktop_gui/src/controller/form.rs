//! Form controller: the single owner of field values, validation errors and
//! the prediction request lifecycle. Widgets read from it and report raw
//! change events back; nothing else mutates form state.

use std::{collections::HashMap, str::FromStr};

use serde::Deserialize;
use shared::{
    domain::{FieldName, FormRecord, SeedType},
    protocol::{PredictRequest, PredictionResult},
    validation::{validate, ErrorMap},
};

const FAILURE_PREFIX: &str = "Failed to get prediction";

/// What happens to the stored value when a numeric field receives text that
/// does not parse as a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NumericInputPolicy {
    #[default]
    CoerceToZero,
    KeepLastValid,
}

impl FromStr for NumericInputPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coerce-to-zero" => Ok(Self::CoerceToZero),
            "keep-last-valid" => Ok(Self::KeepLastValid),
            other => Err(format!(
                "unknown numeric input policy {other:?} (expected coerce-to-zero or keep-last-valid)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    InFlight {
        request: PredictRequest,
    },
    Succeeded {
        result: PredictionResult,
        submitted: PredictRequest,
    },
    Failed {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation passed; this body must be sent exactly once.
    Dispatch(PredictRequest),
    /// Validation failed; the error map now lists every failing field.
    Rejected,
    /// A request is already in flight.
    Busy,
}

pub struct FormController {
    record: FormRecord,
    display_text: HashMap<FieldName, String>,
    errors: ErrorMap,
    state: RequestState,
    numeric_policy: NumericInputPolicy,
}

impl FormController {
    pub fn new(numeric_policy: NumericInputPolicy) -> Self {
        let record = FormRecord::default();
        let mut display_text = HashMap::new();
        display_text.insert(FieldName::SowingDate, record.sowing_date.clone());
        for field in FieldName::ALL {
            if let Some(value) = record.numeric(field) {
                display_text.insert(field, value.to_string());
            }
        }

        Self {
            record,
            display_text,
            errors: ErrorMap::new(),
            state: RequestState::Idle,
            numeric_policy,
        }
    }

    #[cfg(test)]
    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    /// Text shown in a text-backed field. Empty for the seed selector.
    pub fn field_text(&self, field: FieldName) -> &str {
        self.display_text
            .get(&field)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn seed_type(&self) -> Option<SeedType> {
        self.record.seed_type
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn error(&self, field: FieldName) -> Option<&str> {
        self.errors.get(field)
    }

    #[cfg(test)]
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::InFlight { .. })
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    pub fn result(&self) -> Option<(&PredictionResult, &PredictRequest)> {
        match &self.state {
            RequestState::Succeeded { result, submitted } => Some((result, submitted)),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Applies a raw change event from a widget. Never rejects input; rule
    /// checks only run on submit. Clears the field's error entry if present.
    pub fn handle_change(&mut self, field: FieldName, raw: &str) {
        match field {
            FieldName::SowingDate => {
                self.record.sowing_date = raw.to_string();
                self.display_text.insert(field, raw.to_string());
            }
            FieldName::SeedType => {
                self.record.seed_type = raw.parse::<SeedType>().ok();
            }
            _ => {
                match (parse_numeric(raw), self.numeric_policy) {
                    (Some(value), _) => {
                        self.record.set_numeric(field, value);
                    }
                    (None, NumericInputPolicy::CoerceToZero) => {
                        self.record.set_numeric(field, 0.0);
                    }
                    (None, NumericInputPolicy::KeepLastValid) => {}
                }
                self.display_text.insert(field, raw.to_string());
            }
        }

        if self.errors.clear_field(field) {
            tracing::debug!(%field, "cleared field error after edit");
        }
    }

    /// Starts a submission. Any previous result or failure is discarded
    /// before validation runs.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_loading() {
            tracing::warn!("ignoring submit while a prediction request is in flight");
            return SubmitOutcome::Busy;
        }

        self.state = RequestState::Idle;
        match validate(&self.record) {
            Ok(request) => {
                self.errors = ErrorMap::new();
                self.state = RequestState::InFlight {
                    request: request.clone(),
                };
                SubmitOutcome::Dispatch(request)
            }
            Err(errors) => {
                tracing::debug!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "submission blocked by validation"
                );
                self.errors = errors;
                SubmitOutcome::Rejected
            }
        }
    }

    /// Resolves the in-flight request. `Err` carries the underlying cause text,
    /// which may be empty. Returns false if nothing was in flight.
    pub fn complete(&mut self, outcome: Result<PredictionResult, String>) -> bool {
        let submitted = match std::mem::replace(&mut self.state, RequestState::Idle) {
            RequestState::InFlight { request } => request,
            other => {
                tracing::warn!("dropping prediction outcome with no request in flight");
                self.state = other;
                return false;
            }
        };

        self.state = match outcome {
            Ok(result) => RequestState::Succeeded { result, submitted },
            Err(cause) => RequestState::Failed {
                message: failure_message(&cause),
            },
        };
        true
    }
}

/// Finite number in `raw`, ignoring surrounding whitespace.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn failure_message(cause: &str) -> String {
    let cause = cause.trim();
    if cause.is_empty() {
        format!("{FAILURE_PREFIX}. Please try again.")
    } else {
        format!("{FAILURE_PREFIX}: {cause}")
    }
}

#[cfg(test)]
#[path = "../tests/form_tests.rs"]
mod tests;
