//! Outbound adapters implementing domain ports.
//!
//! Adapters are thin translators between domain types and whatever sits on
//! the other side of a port. They contain no business logic; every rule
//! lives in [`crate::domain`] and is exercised identically against any
//! adapter.

pub mod persistence;
