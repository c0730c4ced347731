//! Form content: questions, answers, the resume slot, and the submission
//! window.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ApplicationId;

/// Maximum accepted answer length, matching the storage column bound.
pub const MAX_ANSWER_LEN: usize = 5_000;

/// Question identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(Uuid);

impl QuestionId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A form question.
///
/// Labels are unique; `order` controls presentation. The question set an
/// application sees is fixed at application creation time so mid-event
/// question changes cannot break existing drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Stable question key.
    pub id: QuestionId,
    /// Unique human-readable label, e.g. "T-Shirt Size".
    pub label: String,
    /// Presentation order.
    pub order: u32,
    /// Whether an answer is mandatory for submission.
    pub required: bool,
}

/// One answer row per question per application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Owning application.
    pub application_id: ApplicationId,
    /// Question this answers.
    pub question_id: QuestionId,
    /// Free-text value; `None` until the applicant answers.
    pub value: Option<String>,
}

impl Answer {
    /// Whether this answer satisfies a `required` question.
    ///
    /// The permissive rule: a missing value, a blank value, and the literal
    /// string `"false"` (an unticked checkbox serialised by older clients)
    /// all count as unanswered.
    pub fn is_answered(&self) -> bool {
        match self.value.as_deref() {
            None => false,
            Some(value) => {
                let trimmed = value.trim();
                !trimmed.is_empty() && trimmed != "false"
            }
        }
    }
}

/// Resume upload slot for an application.
///
/// The byte transport lives outside this crate; only the recorded metadata
/// matters for submission eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFile {
    /// Owning application.
    pub application_id: ApplicationId,
    /// Name the applicant uploaded under; `None` until a file lands.
    pub original_filename: Option<String>,
    /// Storage path recorded by the upload layer.
    pub file_path: Option<String>,
}

impl AnswerFile {
    /// Empty slot created alongside a new application.
    pub const fn placeholder(application_id: ApplicationId) -> Self {
        Self {
            application_id,
            original_filename: None,
            file_path: None,
        }
    }

    /// Whether a file has been recorded.
    pub const fn is_uploaded(&self) -> bool {
        self.original_filename.is_some()
    }
}

/// The configured submission window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionWindow {
    /// Submissions open at this instant (exclusive).
    pub opens_at: DateTime<Utc>,
    /// Submissions close at this instant (exclusive).
    pub closes_at: DateTime<Utc>,
}

impl SubmissionWindow {
    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.opens_at < now && now < self.closes_at
    }
}
