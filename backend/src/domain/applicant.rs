//! Applicant identity and application aggregate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ApplicantStatus;

/// Internal account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
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

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque public identifier for an application.
///
/// This is the value embedded in admission QR payloads and URLs. It is a
/// random v4 UUID, distinct from any internal row key, so it is safe to
/// expose and cannot be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(Uuid);

impl ApplicationId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh public identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user who may hold at most one application.
///
/// Credential material never reaches this crate; accounts arrive already
/// authenticated from the identity layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Internal account key.
    pub id: AccountId,
    /// Unique contact address, also the walk-in lookup key.
    pub email: String,
    /// Given name, used in check-in greetings and notifications.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl Account {
    /// Full display name used for wallet passes and notifications.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The per-event submission record and its current admission status.
///
/// ## Invariants
/// - Owned by exactly one [`Account`] (1:1).
/// - Never hard-deleted during the event; status transitions model all
///   removal semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Public identifier embedded in scannable codes.
    pub id: ApplicationId,
    /// Owning account.
    pub account_id: AccountId,
    /// Current lifecycle status.
    pub status: ApplicantStatus,
    /// True while the form is still editable.
    pub is_draft: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Create a fresh draft application in `APPLYING`.
    pub fn draft(account_id: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            id: ApplicationId::random(),
            account_id,
            status: ApplicantStatus::Applying,
            is_draft: true,
            created_at: now,
            updated_at: now,
        }
    }
}
