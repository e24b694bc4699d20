//! Google-specific parameters carried in each command's `remote_config`.

use anyhow::Result;

/// Which Google account's session to use for a calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleRemoteConfig {
    pub google_account: String,
}

impl TryFrom<&serde_json::Map<String, serde_json::Value>> for GoogleRemoteConfig {
    type Error = anyhow::Error;

    fn try_from(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let google_account = map
            .get("google_account")
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing required field: google_account"))?
            .to_string();

        Ok(Self { google_account })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_google_account() {
        let map = json!({ "google_account": "me@gmail.com" })
            .as_object()
            .cloned()
            .unwrap();
        let config = GoogleRemoteConfig::try_from(&map).unwrap();
        assert_eq!(config.google_account, "me@gmail.com");
    }

    #[test]
    fn test_missing_account_is_an_error() {
        let map = serde_json::Map::new();
        let err = GoogleRemoteConfig::try_from(&map).unwrap_err();
        assert!(err.to_string().contains("google_account"));
    }
}
