//! Resolved client configuration.
//!
//! [`ClientConfig::resolve`] turns the raw key/secret/region strings from the
//! settings surface into the immutable value the remote clients are built
//! from. Resolution is pure and cannot fail.

use serde::{Deserialize, Serialize};

/// Static credentials resolved from volume settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key id.
    pub key_id: String,

    /// Secret access key.
    /// Never serialized.
    #[serde(skip_serializing)]
    pub secret: String,
}

impl Credentials {
    /// Creates new static credentials.
    pub fn new(key_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            secret: secret.into(),
        }
    }

    /// Returns a masked version of the key id for logging.
    ///
    /// Shows only the first 4 characters followed by asterisks.
    pub fn key_id_masked(&self) -> String {
        if self.key_id.len() <= 4 {
            "*".repeat(self.key_id.len())
        } else {
            format!("{}***", &self.key_id[..4])
        }
    }
}

/// Immutable configuration for building remote clients.
///
/// Constructed once per adapter instance and never re-resolved; one-off
/// operations like bucket discovery build their own instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Static credentials, or `None` to defer to ambient credential
    /// discovery (environment variables, instance roles, shared files).
    pub credentials: Option<Credentials>,

    /// Region the client talks to. May be empty when the caller supplies a
    /// region out of band.
    pub region: String,
}

impl ClientConfig {
    /// Resolves raw settings strings into a client configuration.
    ///
    /// If either `key_id` or `secret` is empty the configuration carries no
    /// credentials at all, so the client falls back to its ambient credential
    /// chain; empty strings are never sent upstream. The latest stable API
    /// contract is always used, applied at client construction.
    pub fn resolve(key_id: &str, secret: &str, region: &str) -> Self {
        let credentials = if key_id.is_empty() || secret.is_empty() {
            None
        } else {
            Some(Credentials::new(key_id, secret))
        };

        Self {
            credentials,
            region: region.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_with_both_parts_embeds_them_verbatim() {
        let config = ClientConfig::resolve("AKIATEST", "s3cr3t", "eu-west-1");
        let credentials = config.credentials.expect("credentials should be set");
        assert_eq!(credentials.key_id, "AKIATEST");
        assert_eq!(credentials.secret, "s3cr3t");
        assert_eq!(config.region, "eu-west-1");
    }

    #[test]
    fn resolve_with_missing_part_omits_credentials() {
        assert!(ClientConfig::resolve("", "", "us-east-1").credentials.is_none());
        assert!(ClientConfig::resolve("AKIATEST", "", "us-east-1").credentials.is_none());
        assert!(ClientConfig::resolve("", "s3cr3t", "us-east-1").credentials.is_none());
    }

    #[test]
    fn resolve_keeps_an_empty_region() {
        let config = ClientConfig::resolve("", "", "");
        assert_eq!(config.region, "");
    }

    #[test]
    fn key_id_masking() {
        let credentials = Credentials::new("AKIATEST12345", "secret");
        assert_eq!(credentials.key_id_masked(), "AKIA***");

        let short = Credentials::new("ABC", "secret");
        assert_eq!(short.key_id_masked(), "***");
    }

    #[test]
    fn secret_is_never_serialized() {
        let credentials = Credentials::new("AKIATEST", "s3cr3t");
        let json = serde_json::to_value(&credentials).unwrap();
        assert!(json.get("secret").is_none());
        assert_eq!(json["key_id"], "AKIATEST");
    }
}
