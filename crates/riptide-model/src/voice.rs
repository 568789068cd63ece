//! Voice connection state.

use serde::{Deserialize, Serialize};

use crate::guild::Member;

/// A user's voice connection state within a guild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,

    /// Channel the user is connected to, absent when they disconnect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,

    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,

    /// Voice session id, distinct from the gateway session id.
    #[serde(default)]
    pub session_id: String,

    #[serde(default)]
    pub deaf: bool,

    #[serde(default)]
    pub mute: bool,

    #[serde(default)]
    pub self_deaf: bool,

    #[serde(default)]
    pub self_mute: bool,

    #[serde(default)]
    pub self_stream: bool,

    #[serde(default)]
    pub self_video: bool,

    #[serde(default)]
    pub suppress: bool,
}

impl VoiceState {
    /// Whether the state represents a disconnect from voice.
    #[must_use]
    pub fn is_disconnect(&self) -> bool {
        self.channel_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnect_detection() {
        let state: VoiceState =
            serde_json::from_str(r#"{"user_id":"1","session_id":"abc"}"#).unwrap();
        assert!(state.is_disconnect());

        let state: VoiceState =
            serde_json::from_str(r#"{"user_id":"1","channel_id":"5","session_id":"abc"}"#).unwrap();
        assert!(!state.is_disconnect());
    }
}
