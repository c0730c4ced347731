//! Applicant status model.
//!
//! Purpose: one closed enum for the admission lifecycle plus the centralized
//! predicate set every other component must consult. No call site may inline
//! its own status comparisons; earlier iterations of this product drifted
//! because different endpoints disagreed on which statuses were
//! "submittable".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Admission lifecycle status attached 1:1 to an [`Application`].
///
/// Exactly one value holds at any time; status changes are the only
/// externally observable lifecycle signal.
///
/// [`Application`]: crate::domain::Application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicantStatus {
    /// Account exists but has never been activated.
    AccountInactive,
    /// Account active, application never started.
    NotApplied,
    /// Draft application in progress.
    Applying,
    /// Application submitted, awaiting review.
    Applied,
    /// Review in progress.
    UnderReview,
    /// Reviewed and waitlisted.
    Waitlisted,
    /// Reviewed and accepted.
    Accepted,
    /// Reviewed and rejected.
    Rejected,
    /// Accepted applicant confirmed their invite.
    AcceptedInvite,
    /// Accepted applicant declined their invite.
    RejectedInvite,
    /// Admitted on site through the standard path.
    ScannedIn,
    /// Admitted on site as a walk-in; form still outstanding.
    WalkIn,
    /// Walk-in who has submitted their form (terminal for re-scans).
    WalkInSubmitted,
}

impl ApplicantStatus {
    /// Every status, in lifecycle order. Used for zero-filled overviews.
    pub const ALL: [Self; 13] = [
        Self::AccountInactive,
        Self::NotApplied,
        Self::Applying,
        Self::Applied,
        Self::UnderReview,
        Self::Waitlisted,
        Self::Accepted,
        Self::Rejected,
        Self::AcceptedInvite,
        Self::RejectedInvite,
        Self::ScannedIn,
        Self::WalkIn,
        Self::WalkInSubmitted,
    ];

    /// True when an application in this status may be submitted.
    pub const fn can_submit(self) -> bool {
        matches!(self, Self::Applying | Self::WalkIn)
    }

    /// True when the application has already been submitted.
    pub const fn is_already_submitted(self) -> bool {
        matches!(self, Self::Applied | Self::WalkInSubmitted)
    }

    /// True when the applicant is eligible for on-site check-in.
    pub const fn can_scan_in(self) -> bool {
        matches!(
            self,
            Self::Accepted
                | Self::AcceptedInvite
                | Self::ScannedIn
                | Self::WalkIn
                | Self::WalkInSubmitted
        )
    }

    /// True for walk-in statuses, which bypass the submission window.
    pub const fn is_walk_in(self) -> bool {
        matches!(self, Self::WalkIn | Self::WalkInSubmitted)
    }

    /// Wire representation, e.g. `SCANNED_IN`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::NotApplied => "NOT_APPLIED",
            Self::Applying => "APPLYING",
            Self::Applied => "APPLIED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Waitlisted => "WAITLISTED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::AcceptedInvite => "ACCEPTED_INVITE",
            Self::RejectedInvite => "REJECTED_INVITE",
            Self::ScannedIn => "SCANNED_IN",
            Self::WalkIn => "WALK_IN",
            Self::WalkInSubmitted => "WALK_IN_SUBMITTED",
        }
    }
}

impl fmt::Display for ApplicantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when the applicant has not meaningfully entered the pipeline.
///
/// An absent status (no application record yet) counts as early stage, which
/// is why this predicate takes an `Option` unlike the instance methods.
pub const fn is_early_stage(status: Option<ApplicantStatus>) -> bool {
    matches!(
        status,
        None | Some(
            ApplicantStatus::NotApplied
                | ApplicantStatus::Applying
                | ApplicantStatus::AccountInactive
        )
    )
}
