//! Enhancement request controller.
//!
//! Owns the single outstanding request handle and the presentation state derived from it.
//! A new submission cancels the previous handle; a completion is applied only if its handle
//! is still the current one when it resolves.

use crate::engine::{RequestHandle, ResumeService};
use crate::error::EnhanceError;
use crate::model::{EnhancementRequest, EnhancementResult, Presentation, Status};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Result of one `submit` call.
#[derive(Debug)]
pub enum Outcome {
    Success(EnhancementResult),
    Failure(EnhanceError),
    /// Superseded by a newer submission or cancelled on shutdown.
    Cancelled,
}

pub struct EnhancementController<S: ?Sized> {
    service: Arc<S>,
    current: Mutex<Option<RequestHandle>>,
    next_id: AtomicU64,
    presentation: watch::Sender<Presentation>,
}

impl<S: ResumeService + ?Sized> EnhancementController<S> {
    pub fn new(service: Arc<S>) -> Self {
        let (presentation, _) = watch::channel(Presentation::default());
        Self {
            service,
            current: Mutex::new(None),
            next_id: AtomicU64::new(0),
            presentation,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Presentation> {
        self.presentation.subscribe()
    }

    pub fn presentation(&self) -> Presentation {
        self.presentation.borrow().clone()
    }

    /// Validate input, supersede any in-flight request and run a new one.
    ///
    /// Empty resume text fails with `EnhanceError::Validation` before any state change.
    /// On every other path the busy indicator is released when this future completes or
    /// is dropped, unless a newer submission has already taken it over.
    pub async fn submit(&self, resume_text: &str, target_role: Option<&str>) -> Outcome {
        let Some(request) = EnhancementRequest::from_input(resume_text, target_role) else {
            tracing::debug!("rejected empty resume text");
            return Outcome::Failure(EnhanceError::Validation);
        };

        let handle = self.begin();
        let _release = Release {
            controller: self,
            handle: handle.clone(),
        };
        tracing::info!(
            request_id = handle.id(),
            target_role = request.target_role.as_deref().unwrap_or("-"),
            "submitting enhancement request"
        );

        let res = self.service.enhance(&request, &handle).await;
        self.finish(&handle, res)
    }

    /// Cancel the outstanding request, if any, and clear the busy indicator.
    pub fn cancel_current(&self) {
        let mut current = self.lock_current();
        if let Some(prev) = current.take() {
            tracing::debug!(request_id = prev.id(), "cancelling current request");
            prev.cancel();
            self.presentation.send_modify(|p| {
                p.busy = false;
                if p.status == Status::Loading {
                    p.status = Status::Idle;
                }
            });
        }
    }

    fn begin(&self) -> RequestHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let handle = RequestHandle::new(id);
        let mut current = self.lock_current();
        if let Some(prev) = current.replace(handle.clone()) {
            tracing::debug!(superseded = prev.id(), by = id, "cancelling previous request");
            prev.cancel();
        }
        self.presentation.send_modify(|p| {
            p.status = Status::Loading;
            p.busy = true;
            p.notice = None;
        });
        handle
    }

    fn finish(
        &self,
        handle: &RequestHandle,
        res: Result<EnhancementResult, EnhanceError>,
    ) -> Outcome {
        // Held while applying so a newer submission cannot interleave.
        let current = self.lock_current();
        if current.as_ref() != Some(handle) {
            tracing::debug!(request_id = handle.id(), "discarding superseded response");
            return Outcome::Cancelled;
        }

        match res {
            Ok(result) => {
                tracing::info!(
                    request_id = handle.id(),
                    suggestions = result.suggestions.len(),
                    "enhancement succeeded"
                );
                self.presentation.send_modify(|p| {
                    p.status = Status::Result;
                    p.result = Some(result.clone());
                    p.notice = None;
                    p.generation += 1;
                });
                Outcome::Success(result)
            }
            Err(e) if e.is_cancelled() => {
                self.presentation.send_modify(|p| p.status = Status::Idle);
                Outcome::Cancelled
            }
            Err(e) => {
                tracing::warn!(request_id = handle.id(), error = %e, "enhancement failed");
                self.presentation.send_modify(|p| {
                    p.status = Status::Error;
                    p.notice = Some(e.notice());
                });
                Outcome::Failure(e)
            }
        }
    }

    fn release(&self, handle: &RequestHandle) {
        let mut current = self.lock_current();
        if current.as_ref() == Some(handle) {
            *current = None;
            self.presentation.send_modify(|p| {
                p.busy = false;
                if p.status == Status::Loading {
                    p.status = Status::Idle;
                }
            });
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<RequestHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the busy claim of one submission when dropped.
struct Release<'a, S: ResumeService + ?Sized> {
    controller: &'a EnhancementController<S>,
    handle: RequestHandle,
}

impl<S: ResumeService + ?Sized> Drop for Release<'_, S> {
    fn drop(&mut self) {
        self.controller.release(&self.handle);
    }
}
