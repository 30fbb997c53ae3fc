//! Controller layer: form state and request lifecycle, UI events, and command orchestration.

pub mod events;
pub mod form;
pub mod orchestration;
