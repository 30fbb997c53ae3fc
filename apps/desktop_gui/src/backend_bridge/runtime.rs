//! Runtime bridge between UI command queue and backend event intake.
//!
//! One worker thread owns a tokio runtime and runs commands in arrival order,
//! so at most one prediction request is outstanding at any time.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use client_core::{ClientOptions, PredictError, PredictionClient, PredictionService};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    settings: &Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> Option<JoinHandle<()>> {
    let options = ClientOptions {
        request_timeout: settings.request_timeout,
    };
    match PredictionClient::new(&settings.server_url, options) {
        Ok(client) => {
            tracing::info!(endpoint = %client.endpoint(), "prediction client ready");
            Some(spawn_worker(Arc::new(client), cmd_rx, ui_tx))
        }
        Err(err) => {
            tracing::error!(%err, "failed to build prediction client");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: {err}"),
            )));
            None
        }
    }
}

pub fn spawn_worker(
    service: Arc<dyn PredictionService>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(run_commands(service.as_ref(), &cmd_rx, &ui_tx));
        tracing::debug!("backend worker stopped");
    })
}

async fn run_commands(
    service: &dyn PredictionService,
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

    while let Ok(cmd) = cmd_rx.recv() {
        let event = match cmd {
            BackendCommand::Predict { request } => match service.predict(&request).await {
                Ok(result) => {
                    tracing::info!(predicted_yield = result.predicted_yield, "prediction received");
                    UiEvent::PredictionReady(result)
                }
                Err(err) => {
                    let cause = failure_cause(err);
                    tracing::warn!(%cause, "prediction failed");
                    UiEvent::PredictionFailed(cause)
                }
            },
        };

        // Blocking send: the UI must see exactly one outcome per request.
        if ui_tx.send(event).is_err() {
            tracing::debug!("ui event queue closed; stopping backend worker");
            break;
        }
    }
}

/// The error and every source below it, e.g. `transport error: ...: Connection refused`.
fn failure_cause(err: PredictError) -> String {
    format!("{:#}", anyhow::Error::new(err))
}
