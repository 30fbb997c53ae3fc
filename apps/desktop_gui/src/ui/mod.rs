//! UI layer for the desktop GUI: app shell, field widgets, and the result card.

pub mod app;
pub mod results;
pub mod widgets;

pub use app::PredictorApp;
