//! API key access gate.
//!
//! The gate is a pure membership check against a credential set fixed at
//! startup. It holds no mutable state, so one instance is shared by every
//! request handler.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::settings::Settings;

/// Identity reported for every caller while authentication is disabled.
pub const DEV_MODE_IDENTITY: &str = "dev-mode";

/// Number of key characters that may appear in logs.
const KEY_LOG_PREFIX_CHARS: usize = 8;

/// Reasons a presented credential is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing API key. Provide X-API-Key header.")]
    MissingCredential,

    #[error("Invalid API key.")]
    InvalidCredential,
}

/// Ordered, duplicate-free set of accepted API keys.
///
/// An empty set means authentication is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    keys: Vec<String>,
}

impl CredentialSet {
    /// Build a set from keys, dropping empty strings and repeats.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().map(Into::<String>::into).collect()
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_keys_list())
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Exact string membership.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl FromIterator<String> for CredentialSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut keys: Vec<String> = Vec::new();
        for key in iter {
            if !key.is_empty() && !keys.contains(&key) {
                keys.push(key);
            }
        }
        Self { keys }
    }
}

/// Who an accepted request is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Authentication is disabled; every caller is accepted.
    Development,
    /// Caller presented a configured key.
    ApiKey(String),
}

impl Identity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => DEV_MODE_IDENTITY,
            Self::ApiKey(key) => key,
        }
    }

    /// Loggable form of the identity; keys are cut to a short prefix.
    pub fn redacted(&self) -> String {
        match self {
            Self::Development => DEV_MODE_IDENTITY.to_string(),
            Self::ApiKey(key) => key_prefix(key),
        }
    }
}

fn key_prefix(key: &str) -> String {
    let prefix: String = key.chars().take(KEY_LOG_PREFIX_CHARS).collect();
    format!("{prefix}…")
}

/// Stateless API key check.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    credentials: Arc<CredentialSet>,
}

impl AccessGate {
    pub fn new(credentials: CredentialSet) -> Self {
        Self {
            credentials: Arc::new(credentials),
        }
    }

    /// Whether any key is configured.
    pub fn is_enabled(&self) -> bool {
        !self.credentials.is_empty()
    }

    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Check a presented credential.
    ///
    /// An empty presented value counts as missing.
    pub fn authorize(&self, presented: Option<&str>) -> Result<Identity, AuthError> {
        if self.credentials.is_empty() {
            return Ok(Identity::Development);
        }

        let Some(key) = presented.filter(|k| !k.is_empty()) else {
            warn!(reason = "missing", "Rejected request without API key");
            return Err(AuthError::MissingCredential);
        };

        if self.credentials.contains(key) {
            Ok(Identity::ApiKey(key.to_string()))
        } else {
            warn!(
                reason = "invalid",
                key_prefix = %key_prefix(key),
                "Rejected request with unknown API key"
            );
            Err(AuthError::InvalidCredential)
        }
    }

    /// Check a credential taken from raw header bytes.
    ///
    /// Keys are compared as UTF-8. Bytes that are not valid UTF-8 cannot
    /// match any configured key, but are still accepted in development mode.
    pub fn authorize_bytes(&self, presented: Option<&[u8]>) -> Result<Identity, AuthError> {
        match presented.map(std::str::from_utf8) {
            None => self.authorize(None),
            Some(Ok(key)) => self.authorize(Some(key)),
            Some(Err(_)) if self.credentials.is_empty() => Ok(Identity::Development),
            Some(Err(_)) => {
                warn!(reason = "invalid", "Rejected request with non-UTF-8 API key");
                Err(AuthError::InvalidCredential)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(keys: &[&str]) -> AccessGate {
        AccessGate::new(CredentialSet::new(keys.iter().copied()))
    }

    #[test]
    fn test_credential_set_drops_empty_and_duplicates() {
        let set = CredentialSet::new(["a", "", "b", "a"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_credential_set_from_settings() {
        let settings = Settings::new("t", "m", "p").with_api_keys("key-1, key-2");
        let set = CredentialSet::from_settings(&settings);
        assert!(set.contains("key-1"));
        assert!(set.contains("key-2"));
        assert!(!set.contains(" key-2"));
    }

    #[test]
    fn test_empty_set_accepts_everything() {
        let gate = gate(&[]);
        assert!(!gate.is_enabled());
        assert_eq!(gate.authorize(None), Ok(Identity::Development));
        assert_eq!(gate.authorize(Some("")), Ok(Identity::Development));
        assert_eq!(gate.authorize(Some("anything")), Ok(Identity::Development));
        assert_eq!(Identity::Development.as_str(), "dev-mode");
    }

    #[test]
    fn test_missing_credential() {
        let gate = gate(&["secret-key"]);
        assert_eq!(gate.authorize(None), Err(AuthError::MissingCredential));
        assert_eq!(gate.authorize(Some("")), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_invalid_credential() {
        let gate = gate(&["secret-key"]);
        assert_eq!(
            gate.authorize(Some("wrong")),
            Err(AuthError::InvalidCredential)
        );
        // Exact equality only.
        assert_eq!(
            gate.authorize(Some("secret-key ")),
            Err(AuthError::InvalidCredential)
        );
        assert_eq!(
            gate.authorize(Some("SECRET-KEY")),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_member_is_accepted_with_its_identity() {
        let gate = gate(&["key-a", "key-b"]);
        let identity = gate.authorize(Some("key-b")).unwrap();
        assert_eq!(identity, Identity::ApiKey("key-b".to_string()));
        assert_eq!(identity.as_str(), "key-b");
    }

    #[test]
    fn test_dev_mode_token_is_not_a_bypass() {
        let gate = gate(&["real-key"]);
        for _ in 0..10 {
            assert_eq!(gate.authorize(Some("real-key")).map(|_| ()), Ok(()));
            assert_eq!(
                gate.authorize(Some(DEV_MODE_IDENTITY)),
                Err(AuthError::InvalidCredential)
            );
        }
        assert_eq!(gate.credentials().len(), 1);
    }

    #[test]
    fn test_authorize_matches_membership_for_all_small_inputs() {
        let universe = ["k1", "k2", "k3"];
        let presented = [None, Some(""), Some("k1"), Some("k2"), Some("k3"), Some("zz")];

        for mask in 0u8..8 {
            let keys: Vec<&str> = universe
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, k)| *k)
                .collect();
            let gate = gate(&keys);
            let before = gate.credentials().clone();

            for value in presented {
                let accepted = gate.authorize(value).is_ok();
                let expected = keys.is_empty() || value.is_some_and(|v| keys.contains(&v));
                assert_eq!(accepted, expected, "keys={keys:?} value={value:?}");
            }
            assert_eq!(gate.credentials(), &before);
        }
    }

    #[test]
    fn test_authorize_bytes_accepts_utf8_key() {
        let gate = gate(&["clé"]);
        assert_eq!(
            gate.authorize_bytes(Some("clé".as_bytes())),
            Ok(Identity::ApiKey("clé".to_string()))
        );
        assert_eq!(
            gate.authorize_bytes(Some(b"cle")),
            Err(AuthError::InvalidCredential)
        );
        assert_eq!(gate.authorize_bytes(None), Err(AuthError::MissingCredential));
        assert_eq!(gate.authorize_bytes(Some(b"")), Err(AuthError::MissingCredential));
    }

    #[test]
    fn test_authorize_bytes_non_utf8() {
        let invalid: &[u8] = &[0x63, 0xff, 0xfe];
        assert_eq!(
            gate(&[]).authorize_bytes(Some(invalid)),
            Ok(Identity::Development)
        );
        assert_eq!(
            gate(&["real-key"]).authorize_bytes(Some(invalid)),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn test_identity_redaction() {
        let identity = Identity::ApiKey("abcdefghijklmnop".to_string());
        assert_eq!(identity.redacted(), "abcdefgh…");
        assert_eq!(Identity::Development.redacted(), "dev-mode");
    }
}
