//! Per-user realtime presence.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Online status of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnlineStatus {
    Online,
    Idle,
    Dnd,
    Invisible,
    #[default]
    Offline,
}

/// The kind of an activity.
///
/// Open enumeration, same scheme as `ChannelType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ActivityType {
    Playing,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
    Unknown(u8),
}

impl From<u8> for ActivityType {
    fn from(value: u8) -> Self {
        match value {
            0 => ActivityType::Playing,
            1 => ActivityType::Streaming,
            2 => ActivityType::Listening,
            3 => ActivityType::Watching,
            4 => ActivityType::Custom,
            5 => ActivityType::Competing,
            other => ActivityType::Unknown(other),
        }
    }
}

impl From<ActivityType> for u8 {
    fn from(kind: ActivityType) -> u8 {
        match kind {
            ActivityType::Playing => 0,
            ActivityType::Streaming => 1,
            ActivityType::Listening => 2,
            ActivityType::Watching => 3,
            ActivityType::Custom => 4,
            ActivityType::Competing => 5,
            ActivityType::Unknown(other) => other,
        }
    }
}

impl Default for ActivityType {
    fn default() -> Self {
        ActivityType::Playing
    }
}

/// Start and end of an activity, unix milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityTimestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
}

/// A single activity inside a presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: ActivityType,

    /// Stream URL, only for streaming activities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<ActivityTimestamps>,
}

/// Per-platform status breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<OnlineStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<OnlineStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<OnlineStatus>,
}

/// A user's realtime presence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presence {
    pub user: User,

    #[serde(default)]
    pub status: OnlineStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<Activity>,

    /// Guild scope, present on presence-update frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_status: Option<ClientStatus>,
}
