//! Startup wiring for reference data seeding.
//!
//! Every replica runs the same seeding pass at boot. Mutual exclusion comes
//! from numeric advisory locks, not from a leader election: whichever
//! replica takes the lock first seeds, the rest observe the rows as already
//! present and skip them.

mod config;
mod coordinator;
mod defaults;

pub use config::SeedSettings;
pub use coordinator::{
    MEAL_SEED_LOCK, QUESTION_SEED_LOCK, SeedOutcome, SeedSummary, SeedingCoordinator,
};
