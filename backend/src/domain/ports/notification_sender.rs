//! Port abstraction for outbound email notifications.
//!
//! The sender wraps one templated-mail provider call. It reports transport
//! failures through its error type and provider rejections through the
//! receipt's status code; callers choose which of those matter to them.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification sender adapters.
    pub enum NotificationSenderError {
        /// The provider could not be reached or the request never completed.
        Transport { message: String } => "notification transport failed: {message}",
    }
}

/// Inline attachment carried with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAttachment {
    /// Filename shown to the recipient.
    pub name: String,
    /// Raw attachment bytes.
    pub content: Vec<u8>,
    /// MIME type of `content`.
    pub content_type: String,
    /// Content id for inline `cid:` references, when set.
    pub content_id: Option<String>,
}

/// One email to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// Provider-side template identifier.
    pub template: String,
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text fallback body.
    pub text_body: String,
    /// Substitution variables handed to the template.
    pub template_vars: Value,
    /// Attachments, inline or regular.
    pub attachments: Vec<NotificationAttachment>,
}

/// Provider response for one delivered request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReceipt {
    /// HTTP status returned by the provider.
    pub status_code: u16,
    /// Raw provider response body.
    pub raw_response: Value,
}

impl NotificationReceipt {
    /// Whether the provider accepted the message.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code < 400
    }
}

/// Port for sending one notification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver `message` to its recipient.
    async fn send(
        &self,
        message: &NotificationMessage,
    ) -> Result<NotificationReceipt, NotificationSenderError>;
}

/// Fixture implementation that accepts every message without sending.
#[derive(Debug, Default)]
pub struct FixtureNotificationSender;

#[async_trait]
impl NotificationSender for FixtureNotificationSender {
    async fn send(
        &self,
        _message: &NotificationMessage,
    ) -> Result<NotificationReceipt, NotificationSenderError> {
        Ok(NotificationReceipt {
            status_code: 200,
            raw_response: Value::Null,
        })
    }
}
