//! Port abstraction for admission pass artefacts.
//!
//! Generation is pure computation over the application identifier, so this
//! port is synchronous. Both methods can fail only on misconfiguration
//! (missing signing material, malformed base URL).

use url::Url;

use crate::domain::ApplicationId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by pass generator adapters.
    pub enum PassGeneratorError {
        /// Generator configuration is incomplete or invalid.
        Configuration { message: String } => "pass generator misconfigured: {message}",
    }
}

/// Port for producing scannable admission artefacts.
#[cfg_attr(test, mockall::automock)]
pub trait PassGenerator: Send + Sync {
    /// Render the scannable admission code for an application as PNG bytes.
    fn admission_code(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<u8>, PassGeneratorError>;

    /// Build the mobile wallet pass link for an attendee.
    fn wallet_link(
        &self,
        attendee_name: &str,
        application_id: ApplicationId,
    ) -> Result<Url, PassGeneratorError>;
}

/// Fixture implementation producing deterministic placeholder artefacts.
#[derive(Debug, Default)]
pub struct FixturePassGenerator;

impl PassGenerator for FixturePassGenerator {
    fn admission_code(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<u8>, PassGeneratorError> {
        Ok(format!("pass:{application_id}").into_bytes())
    }

    fn wallet_link(
        &self,
        _attendee_name: &str,
        application_id: ApplicationId,
    ) -> Result<Url, PassGeneratorError> {
        Url::parse(&format!("https://wallet.invalid/pass/{application_id}"))
            .map_err(|err| PassGeneratorError::configuration(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_generator_encodes_the_application_id() {
        let generator = FixturePassGenerator;
        let id = ApplicationId::random();
        let code = generator.admission_code(id).expect("fixture code succeeds");
        assert_eq!(code, format!("pass:{id}").into_bytes());
    }

    #[test]
    fn fixture_generator_builds_a_wallet_link() {
        let generator = FixturePassGenerator;
        let id = ApplicationId::random();
        let link = generator
            .wallet_link("Ada Lovelace", id)
            .expect("fixture link succeeds");
        assert!(link.path().ends_with(&id.to_string()));
    }
}
