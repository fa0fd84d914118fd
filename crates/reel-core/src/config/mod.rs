//! Remote document store configuration.
//!
//! Provides `FirebaseConfig`, the client-safe project settings the remote
//! favorites store needs. These values ship with public clients; secret
//! credentials must never be stored here.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::{is_http_url, normalize_text_option};

const FIRESTORE_API_HOST: &str = "https://firestore.googleapis.com";
const DEFAULT_DATABASE: &str = "(default)";

pub const ENV_API_KEY: &str = "REEL_FIREBASE_API_KEY";
pub const ENV_AUTH_DOMAIN: &str = "REEL_FIREBASE_AUTH_DOMAIN";
pub const ENV_PROJECT_ID: &str = "REEL_FIREBASE_PROJECT_ID";
pub const ENV_STORAGE_BUCKET: &str = "REEL_FIREBASE_STORAGE_BUCKET";
pub const ENV_MESSAGING_SENDER_ID: &str = "REEL_FIREBASE_MESSAGING_SENDER_ID";
pub const ENV_APP_ID: &str = "REEL_FIREBASE_APP_ID";
pub const ENV_MEASUREMENT_ID: &str = "REEL_FIREBASE_MEASUREMENT_ID";
pub const ENV_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";

/// Firebase project settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub auth_domain: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub storage_bucket: Option<String>,
    #[serde(default)]
    pub messaging_sender_id: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub measurement_id: Option<String>,
    /// `host:port` of a local Firestore emulator, overriding the public API
    #[serde(default)]
    pub emulator_host: Option<String>,
}

impl FirebaseConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, trimming values and dropping blanks.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| normalize_text_option(lookup(name));
        Self {
            api_key: read(ENV_API_KEY),
            auth_domain: read(ENV_AUTH_DOMAIN),
            project_id: read(ENV_PROJECT_ID),
            storage_bucket: read(ENV_STORAGE_BUCKET),
            messaging_sender_id: read(ENV_MESSAGING_SENDER_ID),
            app_id: read(ENV_APP_ID),
            measurement_id: read(ENV_MEASUREMENT_ID),
            emulator_host: read(ENV_EMULATOR_HOST),
        }
    }

    /// Names of required environment variables that are not set.
    pub fn missing_required_vars(&self) -> Vec<&'static str> {
        [
            (ENV_API_KEY, &self.api_key),
            (ENV_AUTH_DOMAIN, &self.auth_domain),
            (ENV_PROJECT_ID, &self.project_id),
        ]
        .into_iter()
        .filter(|(_, value)| normalize_text_option((*value).clone()).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_configured(&self) -> bool {
        self.missing_required_vars().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_required_vars();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::NotConfigured(format!(
                "missing required Firebase environment variables: {}",
                missing.join(", ")
            )))
        }
    }

    /// Root URL for document paths in the project's default database.
    pub fn firestore_documents_url(&self) -> Result<String> {
        let project_id = normalize_text_option(self.project_id.clone())
            .ok_or_else(|| Error::NotConfigured(format!("{ENV_PROJECT_ID} is not set")))?;

        let host = match normalize_text_option(self.emulator_host.clone()) {
            Some(host) if is_http_url(&host) => host.trim_end_matches('/').to_string(),
            Some(host) => format!("http://{}", host.trim_end_matches('/')),
            None => FIRESTORE_API_HOST.to_string(),
        };

        Ok(format!(
            "{host}/v1/projects/{}/databases/{DEFAULT_DATABASE}/documents",
            urlencoding::encode(&project_id)
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn from_lookup_trims_and_drops_blank_values() {
        let config = FirebaseConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, " key "),
            (ENV_AUTH_DOMAIN, "   "),
            (ENV_PROJECT_ID, "demo-reel"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.auth_domain, None);
        assert_eq!(config.project_id.as_deref(), Some("demo-reel"));
    }

    #[test]
    fn missing_required_vars_lists_names() {
        let config = FirebaseConfig::from_lookup(lookup_from(&[(ENV_PROJECT_ID, "demo")]));
        assert_eq!(
            config.missing_required_vars(),
            vec![ENV_API_KEY, ENV_AUTH_DOMAIN]
        );
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains(ENV_AUTH_DOMAIN));
    }

    #[test]
    fn complete_config_validates() {
        let config = FirebaseConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "key"),
            (ENV_AUTH_DOMAIN, "demo.firebaseapp.com"),
            (ENV_PROJECT_ID, "demo"),
        ]));
        assert!(config.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn documents_url_targets_public_api() {
        let config = FirebaseConfig {
            project_id: Some("demo-reel".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.firestore_documents_url().unwrap(),
            "https://firestore.googleapis.com/v1/projects/demo-reel/databases/(default)/documents"
        );
    }

    #[test]
    fn documents_url_prefers_emulator_host() {
        let config = FirebaseConfig {
            project_id: Some("demo-reel".to_string()),
            emulator_host: Some("localhost:8080".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.firestore_documents_url().unwrap(),
            "http://localhost:8080/v1/projects/demo-reel/databases/(default)/documents"
        );
    }

    #[test]
    fn documents_url_requires_project() {
        assert!(FirebaseConfig::default().firestore_documents_url().is_err());
    }

    #[test]
    fn config_rejects_unknown_fields() {
        let error = serde_json::from_str::<FirebaseConfig>(r#"{"projectId":"x"}"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }
}
