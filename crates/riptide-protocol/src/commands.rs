//! Outbound gateway commands and control payloads.
//!
//! These are the bodies the client sends under control op codes, plus
//! the server-side control bodies (`Hello`) the session consumes during
//! the handshake.

use serde::{Deserialize, Serialize};

use riptide_model::presence::{Activity, OnlineStatus};

/// Body of the server's `Hello` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hello {
    /// Interval at which the client must heartbeat, in milliseconds.
    pub heartbeat_interval: u64,
}

/// Client properties reported on identify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    pub os: String,
    pub browser: String,
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: env!("CARGO_PKG_NAME").to_string(),
            device: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Body of the `Identify` command, starting a fresh session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identify {
    /// Authentication token.
    pub token: String,

    pub properties: IdentifyProperties,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress: Option<bool>,

    /// Member-count threshold above which offline members are withheld.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large_threshold: Option<u32>,

    /// `[shard_id, shard_count]` pair for sharded connections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<[u32; 2]>,

    /// Event-group subscription bitmask.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<u64>,
}

/// Body of the `Resume` command, continuing a prior session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub token: String,
    pub session_id: String,
    /// Last sequence number processed before the connection dropped.
    pub seq: u64,
}

/// Body of the `UpdatePresence` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePresence {
    /// When the client went idle, unix milliseconds; `None` when active.
    #[serde(default)]
    pub since: Option<u64>,

    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default)]
    pub status: OnlineStatus,

    #[serde(default)]
    pub afk: bool,
}

/// Body of the `RequestGuildMembers` command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestGuildMembers {
    pub guild_id: String,

    /// Username prefix filter; empty requests all members.
    #[serde(default)]
    pub query: String,

    /// Maximum members to return, zero for no limit.
    #[serde(default)]
    pub limit: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presences: Option<bool>,

    /// Specific members to fetch instead of a query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<Vec<String>>,

    /// Echoed back on the resulting chunk frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::encode;
    use crate::opcode::OpCode;

    #[test]
    fn test_identify_wire_form() {
        let identify = Identify {
            token: "tok".to_string(),
            properties: IdentifyProperties {
                os: "linux".to_string(),
                browser: "riptide".to_string(),
                device: "riptide".to_string(),
            },
            compress: None,
            large_threshold: Some(250),
            shard: None,
            intents: None,
        };
        let frame = encode(OpCode::Identify, &identify).unwrap();
        assert!(frame.starts_with(r#"{"op":2,"d":{"#));
        assert!(frame.contains(r#""token":"tok""#));
        assert!(frame.contains(r#""large_threshold":250"#));
        // Unset optionals stay off the wire.
        assert!(!frame.contains("shard"));
    }

    #[test]
    fn test_resume_wire_form() {
        let resume = Resume {
            token: "tok".to_string(),
            session_id: "sess-9".to_string(),
            seq: 312,
        };
        let frame = encode(OpCode::Resume, &resume).unwrap();
        assert!(frame.starts_with(r#"{"op":6,"d":{"#));
        assert!(frame.contains(r#""session_id":"sess-9""#));
        assert!(frame.contains(r#""seq":312"#));
    }

    #[test]
    fn test_hello_decodes() {
        let hello: Hello = serde_json::from_str(r#"{"heartbeat_interval":41250}"#).unwrap();
        assert_eq!(hello.heartbeat_interval, 41250);
    }
}
