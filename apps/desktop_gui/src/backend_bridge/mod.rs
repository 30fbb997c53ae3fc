//! Bridge between the UI thread and the async prediction client.

pub mod commands;
pub mod runtime;
