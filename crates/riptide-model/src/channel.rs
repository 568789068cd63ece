//! Channels and threads.

use serde::{Deserialize, Serialize};

use crate::user::User;
use crate::Timestamp;

/// The kind of a channel.
///
/// The enumeration is open: kinds introduced by the service after this
/// library was built round-trip through [`ChannelType::Unknown`] instead
/// of failing the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelType {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildNews,
    GuildStore,
    NewsThread,
    PublicThread,
    PrivateThread,
    StageVoice,
    Unknown(u8),
}

impl From<u8> for ChannelType {
    fn from(value: u8) -> Self {
        match value {
            0 => ChannelType::GuildText,
            1 => ChannelType::Dm,
            2 => ChannelType::GuildVoice,
            3 => ChannelType::GroupDm,
            4 => ChannelType::GuildCategory,
            5 => ChannelType::GuildNews,
            6 => ChannelType::GuildStore,
            10 => ChannelType::NewsThread,
            11 => ChannelType::PublicThread,
            12 => ChannelType::PrivateThread,
            13 => ChannelType::StageVoice,
            other => ChannelType::Unknown(other),
        }
    }
}

impl From<ChannelType> for u8 {
    fn from(kind: ChannelType) -> u8 {
        match kind {
            ChannelType::GuildText => 0,
            ChannelType::Dm => 1,
            ChannelType::GuildVoice => 2,
            ChannelType::GroupDm => 3,
            ChannelType::GuildCategory => 4,
            ChannelType::GuildNews => 5,
            ChannelType::GuildStore => 6,
            ChannelType::NewsThread => 10,
            ChannelType::PublicThread => 11,
            ChannelType::PrivateThread => 12,
            ChannelType::StageVoice => 13,
            ChannelType::Unknown(other) => other,
        }
    }
}

impl Default for ChannelType {
    fn default() -> Self {
        ChannelType::GuildText
    }
}

impl ChannelType {
    /// Whether this is any of the thread kinds.
    #[must_use]
    pub fn is_thread(self) -> bool {
        matches!(
            self,
            ChannelType::NewsThread | ChannelType::PublicThread | ChannelType::PrivateThread
        )
    }

    /// Whether this channel carries voice.
    #[must_use]
    pub fn is_voice(self) -> bool {
        matches!(self, ChannelType::GuildVoice | ChannelType::StageVoice)
    }
}

/// A permission overwrite on a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Role or user id the overwrite applies to.
    pub id: String,
    /// 0 = role, 1 = member.
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub allow: String,
    #[serde(default)]
    pub deny: String,
}

/// Thread-specific channel metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadMetadata {
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub auto_archive_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_timestamp: Option<Timestamp>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub invitable: bool,
}

/// A member of a thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadMember {
    /// Thread id. Omitted inside guild-create payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_timestamp: Option<Timestamp>,
    #[serde(default)]
    pub flags: u64,
}

/// A guild or private channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// The channel's id.
    pub id: String,

    /// Owning guild, absent for private channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,

    /// Channel name; private channels have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    #[serde(rename = "type", default)]
    pub kind: ChannelType,

    /// Id of the most recent message, used for read-state tracking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<String>,

    #[serde(default)]
    pub nsfw: bool,

    /// Sort position within the guild channel list.
    #[serde(default)]
    pub position: i32,

    /// Voice bitrate, zero for text channels.
    #[serde(default)]
    pub bitrate: u32,

    /// Voice user cap, zero for unlimited.
    #[serde(default)]
    pub user_limit: u32,

    /// Slowmode interval in seconds.
    #[serde(default)]
    pub rate_limit_per_user: u32,

    /// Recipients of a group DM.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Parent category, or parent text channel for threads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permission_overwrites: Vec<PermissionOverwrite>,

    /// Creator of a thread or group DM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_metadata: Option<ThreadMetadata>,

    /// Current user's thread membership, present on some thread frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<ThreadMember>,
}

impl Channel {
    /// Mention token for this channel.
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}
