//! User accounts.

use serde::{Deserialize, Serialize};

/// A user account as seen by the gateway.
///
/// Webhook-sent messages may carry a partial author, so everything but
/// the id and username is optional or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's id.
    pub id: String,

    /// The user's username.
    #[serde(default)]
    pub username: String,

    /// The four-digit discriminator, when the service still assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,

    /// Avatar hash, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,

    /// Whether the account is an official system account.
    #[serde(default)]
    pub system: bool,

    /// Public account flags bitmask.
    #[serde(default)]
    pub public_flags: u64,

    /// Premium subscription tier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_type: Option<u8>,

    /// Preferred locale, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl User {
    /// Mention token for this user.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Display handle in `username#discriminator` form, or the bare
    /// username when no discriminator is assigned.
    #[must_use]
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention() {
        let user = User {
            id: "123".to_string(),
            username: "ann".to_string(),
            ..Default::default()
        };
        assert_eq!(user.mention(), "<@123>");
    }

    #[test]
    fn test_tag_with_and_without_discriminator() {
        let mut user = User {
            id: "1".to_string(),
            username: "ann".to_string(),
            ..Default::default()
        };
        assert_eq!(user.tag(), "ann");

        user.discriminator = Some("0420".to_string());
        assert_eq!(user.tag(), "ann#0420");
    }

    #[test]
    fn test_partial_author_decodes() {
        let user: User = serde_json::from_str(r#"{"id":"42","username":"hook"}"#).unwrap();
        assert!(!user.bot);
        assert!(user.avatar.is_none());
    }
}
