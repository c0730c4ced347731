//! Tracing subscriber bootstrap for embedding binaries.
//!
//! Purpose: give every process that links the crate the same structured JSON
//! log output without each binary repeating the subscriber wiring.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global JSON tracing subscriber.
///
/// Filtering follows `RUST_LOG`. Double initialisation is tolerated so test
/// harnesses and embedding applications can both call this unconditionally.
pub fn init_telemetry() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

#[cfg(test)]
mod tests {
    //! Initialisation behaviour under repeated calls.

    use env_lock::lock_env;
    use rstest::rstest;

    use super::init_telemetry;

    #[rstest]
    fn repeated_initialisation_is_tolerated() {
        let _guard = lock_env([("RUST_LOG", Some("info".to_owned()))]);

        // The second call loses the try_init race against the first and
        // must degrade to a warning rather than an error or a panic.
        init_telemetry();
        init_telemetry();
    }
}
