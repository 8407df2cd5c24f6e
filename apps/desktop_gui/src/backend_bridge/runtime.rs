//! Backend worker: owns the tokio runtime and executes queued commands.

use std::{sync::Arc, thread};

use client_core::{GenerationMutation, MutationError, VideoDownloader};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    mutation: Arc<GenerationMutation>,
    downloader: VideoDownloader,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
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

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    // Each trigger runs on its own task so a second Generate is
                    // answered by the mutation guard instead of waiting in line.
                    BackendCommand::Generate { text } => {
                        let mutation = Arc::clone(&mutation);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            match mutation.trigger(&text).await {
                                Ok(state) => {
                                    let _ = ui_tx.try_send(UiEvent::GenerationSettled(state));
                                }
                                Err(MutationError::AlreadyPending) => {
                                    tracing::debug!("generate ignored while a request is pending");
                                }
                                Err(err) => {
                                    let _ = ui_tx.try_send(UiEvent::Error(
                                        UiError::from_message(
                                            UiErrorContext::Generate,
                                            err.to_string(),
                                        ),
                                    ));
                                }
                            }
                        });
                    }
                    BackendCommand::SaveVideo { url, target } => {
                        let downloader = downloader.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            match downloader.save_to_path(&url, &target).await {
                                Ok(bytes) => {
                                    let _ = ui_tx.try_send(UiEvent::VideoSaved {
                                        path: target,
                                        bytes,
                                    });
                                }
                                Err(err) => {
                                    tracing::error!(%url, error = %err, "video download failed");
                                }
                            }
                        });
                    }
                }
            }

            tracing::info!("backend command channel closed; worker exiting");
        });
    });
}
