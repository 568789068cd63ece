//! Third-party guild integrations.

use serde::{Deserialize, Serialize};

use crate::user::User;
use crate::Timestamp;

/// Account details of an integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A third-party integration attached to a guild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Integration {
    /// The integration's id.
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Integration kind, e.g. `"twitch"` or `"youtube"`.
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub syncing: bool,

    /// Role granted to subscribers of this integration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,

    #[serde(default)]
    pub expire_behavior: u8,

    #[serde(default)]
    pub expire_grace_period: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(default)]
    pub account: IntegrationAccount,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<Timestamp>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_decodes() {
        let raw = r#"{
            "id": "33",
            "name": "stream-sync",
            "type": "twitch",
            "enabled": true,
            "account": {"id": "tw-1", "name": "streamer"}
        }"#;
        let integration: Integration = serde_json::from_str(raw).unwrap();
        assert_eq!(integration.kind, "twitch");
        assert_eq!(integration.account.name, "streamer");
    }
}
