//! In-memory persistence adapters.
//!
//! One mutex-guarded store implements every storage port so tests and local
//! wiring can run the full lifecycle without external infrastructure. The
//! store enforces the same uniqueness rules a relational schema would:
//! one application per account, unique question labels, one meal per
//! day/type slot, one grab per applicant per meal.

mod memory_admissions_store;
mod memory_seed_lock;

pub use memory_admissions_store::MemoryAdmissionsStore;
pub use memory_seed_lock::MemorySeedLockManager;
