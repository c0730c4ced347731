//! Seeding configuration loaded via OrthoConfig.

use chrono::{DateTime, Utc};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::SubmissionWindow;

/// Configuration values controlling reference data seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SEEDING")]
pub struct SeedSettings {
    /// Enable reference data seeding on startup.
    #[ortho_config(default = true)]
    pub enabled: bool,
    /// Instant the submission window opens.
    pub window_opens_at: Option<DateTime<Utc>>,
    /// Instant the submission window closes.
    pub window_closes_at: Option<DateTime<Utc>>,
}

impl SeedSettings {
    /// The configured submission window.
    ///
    /// Returns `None` unless both bounds are set; a half-configured window
    /// is treated as absent rather than guessed at.
    #[must_use]
    pub fn window(&self) -> Option<SubmissionWindow> {
        match (self.window_opens_at, self.window_closes_at) {
            (Some(opens_at), Some(closes_at)) => Some(SubmissionWindow { opens_at, closes_at }),
            _ => None,
        }
    }
}
