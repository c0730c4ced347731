//! Admission lifecycle domain.
//!
//! The domain is organised around a small status state machine and the
//! services that drive it: submission, admin review, on-site check-in, food
//! tracking, and notification fan-out. Storage, locks, and mail are reached
//! only through the traits in [`ports`].

pub mod ports;

mod admission_service;
mod applicant;
mod check_in_service;
mod enrollment;
mod error;
mod food;
mod food_service;
mod forms;
mod idempotency;
mod notification_dispatcher;
mod rsvp;
mod status;
mod submission_service;

pub use admission_service::{
    AdmissionService, NotificationDisposition, OverrideOutcome, WalkInOutcome,
};
pub use applicant::{Account, AccountId, Application, ApplicationId};
pub use check_in_service::{CheckInOutcome, CheckInService, FoodRecord};
pub use enrollment::{Enrollment, enroll};
pub use error::{Error, ErrorCode, ErrorValidationError};
pub use food::{EventDay, FoodGrab, Meal, MealId, MealType};
pub use food_service::{FoodGrabReceipt, FoodService};
pub use forms::{
    Answer, AnswerFile, MAX_ANSWER_LEN, Question, QuestionId, SubmissionWindow,
};
pub use idempotency::{Ensured, IdempotencyKey};
pub use notification_dispatcher::{
    BulkNotification, BulkRecipient, DispatchAck, DispatchFailure, DispatchReport,
    DispatcherConfig, NotificationDispatcher,
};
pub use rsvp::{EventDetails, RsvpNotifier};
pub use status::{ApplicantStatus, is_early_stage};
pub use submission_service::{
    AnswerPatch, ApplicationForm, SubmissionService, SubmitOutcome, WindowStatus,
};
