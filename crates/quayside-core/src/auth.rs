//! Credentials for administrative sessions

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Wrapper for sensitive configuration values
///
/// Serializes as a redacted placeholder so credentials never leak into logs
/// or persisted configuration dumps.
#[derive(Debug, Clone)]
pub struct SensitiveString(SecretString);

impl SensitiveString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for SensitiveString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SensitiveString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for SensitiveString {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str("***REDACTED***")
    }
}

impl<'de> Deserialize<'de> for SensitiveString {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

/// Credentials used when opening an administrative session to a broker node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    /// Username for the management session
    pub username: String,
    /// Password, redacted on serialization
    pub password: SensitiveString,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SensitiveString::new(password),
        }
    }
}
