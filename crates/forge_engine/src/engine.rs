use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use forge_logging::{forge_debug, forge_warn};

use crate::completion::{CompletionClient, CompletionSettings, GeminiClient};
use crate::{CompletionError, EngineEvent, FailureKind, RequestId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Complete {
        request_id: RequestId,
        instruction: String,
    },
}

/// Owns the background runtime that runs completion requests.
///
/// Results come back as [`EngineEvent`]s in the order requests complete.
/// Dropping the handle stops the worker once queued requests have finished.
/// Every submitted request yields exactly one event, even when the worker is
/// gone.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: CompletionSettings) -> Result<Self, EngineError> {
        Self::with_client(Arc::new(GeminiClient::new(settings)))
    }

    pub fn with_client(client: Arc<dyn CompletionClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let worker_tx = event_tx.clone();
        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = worker_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, event_tx).await;
                });
            }
            // Let in-flight requests deliver their results before shutting down.
            runtime.shutdown_timeout(Duration::from_secs(5));
        });

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx,
        })
    }

    pub fn submit(&self, request_id: RequestId, instruction: impl Into<String>) {
        let command = EngineCommand::Complete {
            request_id,
            instruction: instruction.into(),
        };
        if self.cmd_tx.send(command).is_err() {
            forge_warn!("engine worker is gone; request {} failed", request_id);
            let _ = self.event_tx.send(EngineEvent::CompletionFinished {
                request_id,
                result: Err(CompletionError::new(
                    FailureKind::EngineStopped,
                    "request not dispatched",
                )),
            });
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    client: &dyn CompletionClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Complete {
            request_id,
            instruction,
        } => {
            forge_debug!("request {} dispatched", request_id);
            let result = client.complete(&instruction).await;
            let _ = event_tx.send(EngineEvent::CompletionFinished { request_id, result });
        }
    }
}
