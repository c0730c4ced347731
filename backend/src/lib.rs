//! Admission lifecycle core for a time-boxed hackathon.
//!
//! Applicants move through a closed status lifecycle (draft, submitted,
//! reviewed, accepted or rejected, admitted on site). This crate owns the
//! status state machine, the idempotent check-in protocol, the
//! mutual-exclusion protocol for one-time reference data seeding, and the
//! bounded-concurrency bulk notification dispatcher. Storage, email
//! transport, and pass rendering are reached through the ports in
//! [`domain::ports`]; in-memory adapters live under [`outbound`].

pub mod domain;
pub mod outbound;
pub mod seeding;
pub mod telemetry;
