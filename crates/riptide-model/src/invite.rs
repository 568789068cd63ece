//! Guild and channel invites.

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::guild::Guild;
use crate::user::User;
use crate::Timestamp;

/// An invite to a guild or channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    /// The invite code, unique per invite.
    pub code: String,

    /// Partial guild the invite points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild: Option<Guild>,

    /// Partial channel the invite points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inviter: Option<User>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,

    /// Lifetime in seconds, zero for never-expiring invites.
    #[serde(default)]
    pub max_age: u32,

    /// Use cap, zero for unlimited.
    #[serde(default)]
    pub max_uses: u32,

    #[serde(default)]
    pub uses: u32,

    /// Whether the invite grants temporary membership.
    #[serde(default)]
    pub temporary: bool,
}
