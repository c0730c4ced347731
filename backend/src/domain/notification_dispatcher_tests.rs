//! Fan-out contract tests with scripted senders.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{BulkNotification, BulkRecipient, DispatcherConfig, NotificationDispatcher};
use crate::domain::ports::{
    NotificationMessage, NotificationReceipt, NotificationSender, NotificationSenderError,
};

fn batch(recipient_count: usize) -> BulkNotification {
    BulkNotification {
        template: "decision".into(),
        subject: "Your application decision".into(),
        text_body: "See the portal for details.".into(),
        recipients: (1..=recipient_count)
            .map(|index| BulkRecipient {
                email: format!("user{index}@example.com"),
                template_vars: json!({ "index": index }),
            })
            .collect(),
    }
}

fn accepted() -> NotificationReceipt {
    NotificationReceipt {
        status_code: 200,
        raw_response: Value::Null,
    }
}

/// Records every recipient and fails the ones whose index divides by
/// `fail_every`.
struct TallySender {
    seen: Mutex<Vec<String>>,
    fail_every: usize,
}

impl TallySender {
    fn new(fail_every: usize) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            fail_every,
        }
    }

    fn index_of(recipient: &str) -> usize {
        recipient
            .trim_start_matches("user")
            .split('@')
            .next()
            .and_then(|digits| digits.parse().ok())
            .expect("recipient carries its index")
    }
}

#[async_trait]
impl NotificationSender for TallySender {
    async fn send(
        &self,
        message: &NotificationMessage,
    ) -> Result<NotificationReceipt, NotificationSenderError> {
        self.seen
            .lock()
            .expect("tally mutex healthy")
            .push(message.recipient.clone());
        let index = Self::index_of(&message.recipient);
        if self.fail_every > 0 && index % self.fail_every == 0 {
            return Err(NotificationSenderError::transport("mailbox on fire"));
        }
        Ok(accepted())
    }
}

/// Sleeps past any reasonable timeout before answering.
struct SlowSender;

#[async_trait]
impl NotificationSender for SlowSender {
    async fn send(
        &self,
        _message: &NotificationMessage,
    ) -> Result<NotificationReceipt, NotificationSenderError> {
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(accepted())
    }
}

/// Tracks how many sends overlap in time.
struct GaugeSender {
    in_flight: AtomicUsize,
    high_water: AtomicUsize,
}

impl GaugeSender {
    fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            high_water: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NotificationSender for GaugeSender {
    async fn send(
        &self,
        _message: &NotificationMessage,
    ) -> Result<NotificationReceipt, NotificationSenderError> {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.high_water.fetch_max(now_in_flight, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(accepted())
    }
}

#[tokio::test]
async fn every_recipient_gets_exactly_one_attempt() {
    let sender = Arc::new(TallySender::new(7));
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&sender),
        DispatcherConfig {
            chunk_size: 64,
            ..DispatcherConfig::default()
        },
    );

    let report = dispatcher.dispatch(batch(250)).await;

    assert_eq!(report.attempted, 250);
    assert_eq!(report.failed, 35);
    assert_eq!(report.succeeded, 215);
    assert_eq!(report.failures.len(), 35);
    assert!(report
        .failures
        .iter()
        .all(|failure| failure.reason.contains("mailbox on fire")));

    let seen = sender.seen.lock().expect("tally mutex healthy");
    assert_eq!(seen.len(), 250, "no recipient is retried or dropped");
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), 250);
}

#[tokio::test(start_paused = true)]
async fn a_hung_send_counts_as_a_failure() {
    let dispatcher = NotificationDispatcher::new(
        Arc::new(SlowSender),
        DispatcherConfig {
            send_timeout: Duration::from_secs(5),
            ..DispatcherConfig::default()
        },
    );

    let report = dispatcher.dispatch(batch(1)).await;

    assert_eq!(report.attempted, 1);
    assert_eq!(report.failed, 1);
    assert!(report.failures[0].reason.contains("timed out"));
}

#[tokio::test(start_paused = true)]
async fn in_flight_sends_respect_the_permit_budget() {
    let sender = Arc::new(GaugeSender::new());
    let dispatcher = NotificationDispatcher::new(
        Arc::clone(&sender),
        DispatcherConfig {
            chunk_size: 50,
            max_concurrent_sends: 3,
            ..DispatcherConfig::default()
        },
    );

    let report = dispatcher.dispatch(batch(20)).await;

    assert_eq!(report.succeeded, 20);
    assert!(
        sender.high_water.load(Ordering::SeqCst) <= 3,
        "permit budget was exceeded"
    );
}

#[tokio::test(start_paused = true)]
async fn detached_dispatch_acknowledges_before_sending() {
    let sender = Arc::new(TallySender::new(0));
    let dispatcher = Arc::new(NotificationDispatcher::new(
        Arc::clone(&sender),
        DispatcherConfig::default(),
    ));

    let ack = dispatcher.dispatch_detached(batch(12));
    assert_eq!(ack.recipient_count, 12);

    // The batch keeps running after the handoff; wait for it to drain.
    for _ in 0..100 {
        if sender.seen.lock().expect("tally mutex healthy").len() == 12 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(sender.seen.lock().expect("tally mutex healthy").len(), 12);
}

#[tokio::test]
async fn an_empty_batch_reports_zeroes() {
    let sender = Arc::new(TallySender::new(0));
    let dispatcher = NotificationDispatcher::new(Arc::clone(&sender), DispatcherConfig::default());

    let report = dispatcher.dispatch(batch(0)).await;

    assert_eq!(report.attempted, 0);
    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed, 0);
    assert!(report.failures.is_empty());
    assert!(sender.seen.lock().expect("tally mutex healthy").is_empty());
}
