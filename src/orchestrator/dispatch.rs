//! Command loop between the TUI thread and the enhancement controller.

use super::{EnhancementController, Outcome};
use crate::engine::ServiceClient;
use crate::error::EnhanceError;
use crate::model::{InfoEvent, UiEvent};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinError, JoinSet};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Submit {
        resume_text: String,
        target_role: String,
    },
    ExtractPdf(PathBuf),
    Quit,
}

/// Process UI commands until quit. Every submission and upload runs as its own task so a
/// newer submission can supersede one that is still in flight.
pub(crate) async fn run_controller(
    client: ServiceClient,
    controller: Arc<EnhancementController<ServiceClient>>,
    event_tx: UnboundedSender<UiEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut tasks: JoinSet<()> = JoinSet::new();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Submit { resume_text, target_role }) => {
                        let controller = controller.clone();
                        let tx = event_tx.clone();
                        tasks.spawn(async move {
                            let outcome = controller.submit(&resume_text, Some(target_role.as_str())).await;
                            if let Outcome::Failure(EnhanceError::Validation) = outcome {
                                let _ = tx.send(UiEvent::Info(InfoEvent::EmptyResume));
                            }
                        });
                    }
                    Some(UiCommand::ExtractPdf(path)) => {
                        let client = client.clone();
                        let tx = event_tx.clone();
                        tasks.spawn(async move {
                            let file_name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| path.display().to_string());
                            let _ = tx.send(UiEvent::Info(InfoEvent::Message(format!(
                                "Extracting text from {file_name}…"
                            ))));
                            match client.extract_pdf(&path).await {
                                Ok(text) => {
                                    let _ = tx.send(UiEvent::PdfExtracted { file_name, text });
                                }
                                Err(e) => {
                                    tracing::warn!(file = %file_name, error = %e, "pdf extraction failed");
                                    let _ = tx.send(UiEvent::Info(InfoEvent::PdfFailed {
                                        reason: e.to_string(),
                                    }));
                                }
                            }
                        });
                    }
                    Some(UiCommand::Quit) | None => {
                        controller.cancel_current();
                        tasks.abort_all();
                        break;
                    }
                }
            }
            // Never resolves while there is nothing to join, so the loop doesn't spin.
            joined = async {
                if tasks.is_empty() {
                    futures::future::pending::<Option<Result<(), JoinError>>>().await
                } else {
                    tasks.join_next().await
                }
            } => {
                if let Some(Err(e)) = joined {
                    if e.is_panic() {
                        let _ = event_tx.send(UiEvent::Info(InfoEvent::Message(format!(
                            "Request task failed: {e}"
                        ))));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientConfig;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn offline_client() -> ServiceClient {
        ServiceClient::new(&ClientConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(1),
            user_agent: "resume-refiner-test".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn reports_validation_and_pdf_failures_then_quits() {
        let client = offline_client();
        let controller = Arc::new(EnhancementController::new(Arc::new(client.clone())));
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let loop_handle = tokio::spawn(run_controller(
            client,
            controller.clone(),
            event_tx,
            cmd_rx,
        ));

        cmd_tx
            .send(UiCommand::Submit {
                resume_text: "  \n ".into(),
                target_role: "Engineer".into(),
            })
            .unwrap();
        let ev = tokio::time::timeout(Duration::from_secs(2), event_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(ev, UiEvent::Info(InfoEvent::EmptyResume)));
        assert!(!controller.presentation().busy);

        cmd_tx
            .send(UiCommand::ExtractPdf(PathBuf::from("resume.docx")))
            .unwrap();
        let mut saw_failure = false;
        while let Ok(Some(ev)) =
            tokio::time::timeout(Duration::from_secs(2), event_rx.recv()).await
        {
            if let UiEvent::Info(InfoEvent::PdfFailed { reason }) = ev {
                assert!(reason.contains("PDF"));
                saw_failure = true;
                break;
            }
        }
        assert!(saw_failure);

        cmd_tx.send(UiCommand::Quit).unwrap();
        tokio::time::timeout(Duration::from_secs(2), loop_handle)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
