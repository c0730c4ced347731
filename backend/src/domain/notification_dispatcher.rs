//! Bulk notification fan-out.
//!
//! Admins accept or reject applicants in large batches, then fan the
//! matching email out to every affected address. The dispatcher owns the
//! fan-out contract: every recipient gets exactly one attempt, failures are
//! isolated per recipient, concurrency is capped by a global permit budget,
//! and a hung provider call is cut off by a per-send timeout instead of
//! stalling the batch.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::domain::ports::{NotificationMessage, NotificationSender};

/// Tuning for the fan-out loop.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Recipients handled per chunk; chunks run one after another.
    pub chunk_size: usize,
    /// Global cap on provider calls in flight at once.
    pub max_concurrent_sends: usize,
    /// Budget for a single provider call. An elapsed budget counts as a
    /// failed attempt for that recipient.
    pub send_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            max_concurrent_sends: 10,
            send_timeout: Duration::from_secs(30),
        }
    }
}

/// One addressee of a bulk notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRecipient {
    /// Destination address.
    pub email: String,
    /// Per-recipient template variables.
    pub template_vars: serde_json::Value,
}

/// A notification to fan out to many recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkNotification {
    /// Provider template identifier.
    pub template: String,
    /// Subject line shared by every copy.
    pub subject: String,
    /// Plain-text fallback body.
    pub text_body: String,
    /// Everyone who gets a copy.
    pub recipients: Vec<BulkRecipient>,
}

/// One failed attempt inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    /// Address the attempt was for.
    pub recipient: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Tally of a completed fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Attempts made, one per recipient.
    pub attempted: usize,
    /// Attempts the provider accepted.
    pub succeeded: usize,
    /// Attempts that failed for any reason.
    pub failed: usize,
    /// The failures, in recipient order.
    pub failures: Vec<DispatchFailure>,
}

/// Receipt for a fan-out running in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchAck {
    /// Recipients the detached batch will attempt.
    pub recipient_count: usize,
}

/// Fans one notification out to many recipients.
#[derive(Debug)]
pub struct NotificationDispatcher<N> {
    sender: Arc<N>,
    config: DispatcherConfig,
    permits: Arc<Semaphore>,
}

impl<N> NotificationDispatcher<N>
where
    N: NotificationSender + 'static,
{
    /// Create a dispatcher over a sender with the given tuning.
    pub fn new(sender: Arc<N>, config: DispatcherConfig) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_concurrent_sends.max(1)));
        Self {
            sender,
            config,
            permits,
        }
    }

    /// Fan the notification out and wait for the full tally.
    ///
    /// Chunks run sequentially; sends within a chunk run concurrently up to
    /// the permit budget. A failure affects only its own recipient.
    pub async fn dispatch(&self, batch: BulkNotification) -> DispatchReport {
        let mut report = DispatchReport::default();
        for chunk in batch.recipients.chunks(self.config.chunk_size.max(1)) {
            let attempts = chunk
                .iter()
                .map(|recipient| self.send_one(&batch, recipient));
            for (recipient, outcome) in chunk.iter().zip(join_all(attempts).await) {
                report.attempted += 1;
                match outcome {
                    Ok(()) => report.succeeded += 1,
                    Err(reason) => {
                        report.failed += 1;
                        report.failures.push(DispatchFailure {
                            recipient: recipient.email.clone(),
                            reason,
                        });
                    }
                }
            }
        }
        info!(
            template = %batch.template,
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            "bulk notification dispatched"
        );
        report
    }

    /// Start the fan-out in the background and acknowledge at once.
    ///
    /// The handoff returns before any send happens; the batch keeps running
    /// after the caller moves on. Failures are logged, not reported back.
    pub fn dispatch_detached(self: &Arc<Self>, batch: BulkNotification) -> DispatchAck {
        let ack = DispatchAck {
            recipient_count: batch.recipients.len(),
        };
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            let report = dispatcher.dispatch(batch).await;
            if report.failed > 0 {
                warn!(
                    failed = report.failed,
                    attempted = report.attempted,
                    "detached bulk notification finished with failures"
                );
            }
        });
        ack
    }

    async fn send_one(
        &self,
        batch: &BulkNotification,
        recipient: &BulkRecipient,
    ) -> Result<(), String> {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| "dispatcher permit pool closed".to_owned())?;
        let message = NotificationMessage {
            template: batch.template.clone(),
            recipient: recipient.email.clone(),
            subject: batch.subject.clone(),
            text_body: batch.text_body.clone(),
            template_vars: recipient.template_vars.clone(),
            attachments: Vec::new(),
        };
        let sent = tokio::time::timeout(self.config.send_timeout, self.sender.send(&message));
        match sent.await {
            Err(_) => Err(format!(
                "send timed out after {:?}",
                self.config.send_timeout
            )),
            Ok(Err(err)) => Err(err.to_string()),
            Ok(Ok(receipt)) if !receipt.is_success() => {
                Err(format!("provider returned status {}", receipt.status_code))
            }
            Ok(Ok(_)) => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "notification_dispatcher_tests.rs"]
mod tests;
