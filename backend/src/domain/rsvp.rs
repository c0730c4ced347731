//! Acceptance (RSVP) notification assembly.
//!
//! One place builds the acceptance email: the admission-code image as an
//! inline attachment, the wallet pass link, and the event dates. Status
//! Override to `ACCEPTED`, the late Walk-in Mark branch, and walk-in
//! submissions all go through here so every acceptance is paired with the
//! same notification shape.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;
use url::Url;

use crate::domain::ports::{
    NotificationAttachment, NotificationMessage, NotificationReceipt, NotificationSender,
    PassGenerator,
};
use crate::domain::{ApplicationId, Error};

const RSVP_TEMPLATE: &str = "rsvp";
const ADMISSION_CODE_NAME: &str = "qr_code.png";
const EVENT_DATE_FORMAT: &str = "%B %d %Y";

/// Event facts substituted into the acceptance template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    /// Event name used in the subject line.
    pub name: String,
    /// First event day.
    pub starts_on: DateTime<Utc>,
    /// Last event day.
    pub ends_on: DateTime<Utc>,
    /// Human-readable RSVP deadline, e.g. "September 26th 2026".
    pub rsvp_due: String,
    /// Public site the plain-text body points at.
    pub frontend_url: Url,
}

/// Builds and sends the single-recipient acceptance notification.
#[derive(Debug)]
pub struct RsvpNotifier<N, P> {
    sender: Arc<N>,
    passes: Arc<P>,
    event: EventDetails,
}

impl<N, P> RsvpNotifier<N, P>
where
    N: NotificationSender,
    P: PassGenerator,
{
    /// Create the notifier over its outbound ports.
    pub fn new(sender: Arc<N>, passes: Arc<P>, event: EventDetails) -> Self {
        Self {
            sender,
            passes,
            event,
        }
    }

    /// Send the acceptance email for one application.
    ///
    /// A provider response of 400 or above counts as a failed attempt.
    /// Callers decide whether that failure is fatal; the admission state
    /// machine treats it as best-effort and reports it without rolling back.
    pub async fn send_rsvp(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        application_id: ApplicationId,
    ) -> Result<NotificationReceipt, Error> {
        let admission_code = self.passes.admission_code(application_id)?;
        let wallet_url = self.passes.wallet_link(recipient_name, application_id)?;

        let message = NotificationMessage {
            template: RSVP_TEMPLATE.into(),
            recipient: recipient_email.into(),
            subject: format!("RSVP for {}", self.event.name),
            text_body: format!(
                "You're in! Visit {} to confirm your spot.",
                self.event.frontend_url
            ),
            template_vars: json!({
                "start_date": self.event.starts_on.format(EVENT_DATE_FORMAT).to_string(),
                "end_date": self.event.ends_on.format(EVENT_DATE_FORMAT).to_string(),
                "due_date": self.event.rsvp_due,
                "wallet_url": wallet_url.as_str(),
            }),
            attachments: vec![NotificationAttachment {
                name: ADMISSION_CODE_NAME.into(),
                content: admission_code,
                content_type: "image/png".into(),
                content_id: Some("qr_code".into()),
            }],
        };

        let receipt = self.sender.send(&message).await?;
        if !receipt.is_success() {
            warn!(
                recipient = recipient_email,
                status = receipt.status_code,
                "notification provider rejected RSVP"
            );
            return Err(Error::service_unavailable(format!(
                "notification provider rejected RSVP with status {}",
                receipt.status_code
            )));
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{
        MockNotificationSender, MockPassGenerator, NotificationSenderError,
    };

    fn event() -> EventDetails {
        EventDetails {
            name: "Hack the Valley X".into(),
            starts_on: "2026-10-02T00:00:00Z".parse().expect("date parses"),
            ends_on: "2026-10-04T00:00:00Z".parse().expect("date parses"),
            rsvp_due: "September 26th 2026".into(),
            frontend_url: Url::parse("https://hackthevalley.io").expect("url parses"),
        }
    }

    fn passes() -> MockPassGenerator {
        let mut passes = MockPassGenerator::new();
        passes
            .expect_admission_code()
            .returning(|id| Ok(format!("png:{id}").into_bytes()));
        passes.expect_wallet_link().returning(|_, id| {
            Ok(Url::parse(&format!("https://wallet.example/{id}")).expect("url parses"))
        });
        passes
    }

    #[tokio::test]
    async fn assembles_the_acceptance_message() {
        let application_id = ApplicationId::random();

        let mut sender = MockNotificationSender::new();
        sender
            .expect_send()
            .times(1)
            .withf(move |message| {
                let vars = &message.template_vars;
                message.recipient == "ada@example.com"
                    && message.subject == "RSVP for Hack the Valley X"
                    && message.attachments.len() == 1
                    && message.attachments[0].name == "qr_code.png"
                    && vars["start_date"] == Value::from("October 02 2026")
                    && vars["due_date"] == Value::from("September 26th 2026")
            })
            .returning(|_| {
                Ok(NotificationReceipt {
                    status_code: 200,
                    raw_response: Value::Null,
                })
            });

        let notifier = RsvpNotifier::new(Arc::new(sender), Arc::new(passes()), event());
        let receipt = notifier
            .send_rsvp("ada@example.com", "Ada Lovelace", application_id)
            .await
            .expect("sends");
        assert!(receipt.is_success());
    }

    #[tokio::test]
    async fn provider_rejection_is_a_failed_attempt() {
        let mut sender = MockNotificationSender::new();
        sender.expect_send().times(1).returning(|_| {
            Ok(NotificationReceipt {
                status_code: 422,
                raw_response: Value::Null,
            })
        });

        let notifier = RsvpNotifier::new(Arc::new(sender), Arc::new(passes()), event());
        let err = notifier
            .send_rsvp("ada@example.com", "Ada Lovelace", ApplicationId::random())
            .await
            .expect_err("fails");
        assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let mut sender = MockNotificationSender::new();
        sender
            .expect_send()
            .times(1)
            .returning(|_| Err(NotificationSenderError::transport("connection refused")));

        let notifier = RsvpNotifier::new(Arc::new(sender), Arc::new(passes()), event());
        let err = notifier
            .send_rsvp("ada@example.com", "Ada Lovelace", ApplicationId::random())
            .await
            .expect_err("fails");
        assert_eq!(err.code(), crate::domain::ErrorCode::ServiceUnavailable);
    }
}
