use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please input the required string!")]
    Empty,
}

/// Reject blank answers to a required prompt
pub fn validate_required(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        Err(ValidationError::Empty)
    } else {
        Ok(())
    }
}

/// API credentials gathered for a single run.
///
/// Held in memory only; nothing here is ever written to disk.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub simkl_client_id: String,
    pub trakt_client_id: String,
    pub trakt_client_secret: String,
}

impl Credentials {
    pub fn new(
        simkl_client_id: impl Into<String>,
        trakt_client_id: impl Into<String>,
        trakt_client_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let credentials = Self {
            simkl_client_id: simkl_client_id.into().trim().to_string(),
            trakt_client_id: trakt_client_id.into().trim().to_string(),
            trakt_client_secret: trakt_client_secret.into().trim().to_string(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.simkl_client_id)?;
        validate_required(&self.trakt_client_id)?;
        validate_required(&self.trakt_client_secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("simkl_client_id", &self.simkl_client_id)
            .field("trakt_client_id", &self.trakt_client_id)
            .field("trakt_client_secret", &mask(&self.trakt_client_secret))
            .finish()
    }
}

fn mask(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", secret.chars().take(4).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_rejects_blank() {
        assert_eq!(validate_required(""), Err(ValidationError::Empty));
        assert_eq!(validate_required("   "), Err(ValidationError::Empty));
        assert!(validate_required("abc").is_ok());
    }

    #[test]
    fn test_validation_message() {
        assert_eq!(ValidationError::Empty.to_string(), "Please input the required string!");
    }

    #[test]
    fn test_credentials_trim_and_validate() {
        let creds = Credentials::new(" simkl ", "trakt", "secret").unwrap();
        assert_eq!(creds.simkl_client_id, "simkl");

        assert!(Credentials::new("simkl", "", "secret").is_err());
    }

    #[test]
    fn test_debug_masks_secret() {
        let creds = Credentials::new("simkl", "trakt", "abcdefgh1234").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("abcdefgh1234"));
        assert!(debug.contains("abcd****"));
    }
}
