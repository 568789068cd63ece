//! Guilds and their member resources.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::presence::Presence;
use crate::user::User;
use crate::voice::VoiceState;
use crate::Timestamp;

/// A guild role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// The role's id.
    pub id: String,

    /// The role's display name.
    #[serde(default)]
    pub name: String,

    /// Whether an integration manages this role.
    #[serde(default)]
    pub managed: bool,

    /// Whether members may mention this role.
    #[serde(default)]
    pub mentionable: bool,

    /// Whether the role is shown separately in the member list.
    #[serde(default)]
    pub hoist: bool,

    /// Display color as an integer RGB value.
    #[serde(default)]
    pub color: u32,

    /// Sort position; higher positions render first.
    #[serde(default)]
    pub position: i32,

    /// Permission bitmask carried as a string on the wire.
    #[serde(default)]
    pub permissions: String,
}

impl Role {
    /// Mention token for this role.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@&{}>", self.id)
    }
}

impl Eq for Role {}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        // Guild ordering: position first, id as the stable tiebreak.
        self.position
            .cmp(&other.position)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A guild member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Guild the membership belongs to. Injected by the gateway on
    /// member frames, absent when nested inside other resources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,

    /// When the member joined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<Timestamp>,

    /// Guild-local nickname, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick: Option<String>,

    #[serde(default)]
    pub deaf: bool,

    #[serde(default)]
    pub mute: bool,

    /// The underlying user. Absent on partial member records attached to
    /// message frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    /// Ids of the roles assigned to this member.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// When the member started boosting, if they do.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium_since: Option<Timestamp>,

    /// Whether the member has not yet passed membership screening.
    #[serde(default)]
    pub pending: bool,
}

impl Member {
    /// Mention token for this member, using the nickname form.
    #[must_use]
    pub fn mention(&self) -> String {
        match &self.user {
            Some(user) => format!("<@!{}>", user.id),
            None => String::new(),
        }
    }

    /// Nickname when set, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.nick.as_deref() {
            Some(nick) if !nick.is_empty() => nick,
            _ => self.user.as_ref().map_or("", |u| u.username.as_str()),
        }
    }
}

/// A custom emoji.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    /// Emoji id; unicode emoji have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Emoji name, or the literal unicode character.
    #[serde(default)]
    pub name: String,

    /// Roles allowed to use the emoji.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(default)]
    pub require_colons: bool,

    #[serde(default)]
    pub managed: bool,

    #[serde(default)]
    pub animated: bool,

    #[serde(default)]
    pub available: bool,
}

impl Emoji {
    /// Chat-message form of the emoji.
    #[must_use]
    pub fn message_format(&self) -> String {
        match &self.id {
            Some(id) if self.animated => format!("<a:{}:{}>", self.name, id),
            Some(id) => format!("<:{}:{}>", self.name, id),
            None => self.name.clone(),
        }
    }

    /// `name:id` form used when addressing the emoji in requests, or the
    /// bare name for unicode emoji.
    #[must_use]
    pub fn api_name(&self) -> String {
        match &self.id {
            Some(id) => format!("{}:{}", self.name, id),
            None => self.name.clone(),
        }
    }
}

/// A guild ban.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ban {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub user: User,
}

/// A guild.
///
/// Gateway guild-create frames carry the full resource including
/// members, channels, and realtime state; later frames may carry only a
/// partial shell (for instance an unavailable-guild marker).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    /// The guild's id.
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// When the current user joined, only on guild-create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<Timestamp>,

    /// Whether the guild is above the large-member threshold, in which
    /// case members arrive through member-chunk frames instead.
    #[serde(default)]
    pub large: bool,

    /// Set when the guild is unavailable due to an outage.
    #[serde(default)]
    pub unavailable: bool,

    #[serde(default)]
    pub member_count: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emojis: Vec<Emoji>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Channel>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presences: Vec<Presence>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice_states: Vec<VoiceState>,

    /// Enabled guild feature flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mention() {
        let role = Role {
            id: "7".to_string(),
            name: "mods".to_string(),
            ..Default::default()
        };
        assert_eq!(role.mention(), "<@&7>");
    }

    #[test]
    fn test_role_ordering() {
        let mut roles = vec![
            Role {
                id: "2".to_string(),
                position: 5,
                ..Default::default()
            },
            Role {
                id: "1".to_string(),
                position: 5,
                ..Default::default()
            },
            Role {
                id: "3".to_string(),
                position: 1,
                ..Default::default()
            },
        ];
        roles.sort();
        let ids: Vec<&str> = roles.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[test]
    fn test_member_display_name() {
        let mut member = Member {
            user: Some(User {
                id: "1".to_string(),
                username: "ann".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(member.display_name(), "ann");

        member.nick = Some("annie".to_string());
        assert_eq!(member.display_name(), "annie");
    }

    #[test]
    fn test_emoji_formats() {
        let unicode = Emoji {
            name: "🔥".to_string(),
            ..Default::default()
        };
        assert_eq!(unicode.message_format(), "🔥");
        assert_eq!(unicode.api_name(), "🔥");

        let custom = Emoji {
            id: Some("99".to_string()),
            name: "blob".to_string(),
            animated: true,
            ..Default::default()
        };
        assert_eq!(custom.message_format(), "<a:blob:99>");
        assert_eq!(custom.api_name(), "blob:99");
    }

    #[test]
    fn test_unavailable_guild_shell_decodes() {
        let guild: Guild = serde_json::from_str(r#"{"id":"10","unavailable":true}"#).unwrap();
        assert!(guild.unavailable);
        assert!(guild.roles.is_empty());
    }
}
