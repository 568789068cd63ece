//! Application commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of an application command option.
///
/// Open enumeration, same scheme as `ChannelType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ApplicationCommandOptionType {
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Unknown(u8),
}

impl From<u8> for ApplicationCommandOptionType {
    fn from(value: u8) -> Self {
        match value {
            1 => ApplicationCommandOptionType::SubCommand,
            2 => ApplicationCommandOptionType::SubCommandGroup,
            3 => ApplicationCommandOptionType::String,
            4 => ApplicationCommandOptionType::Integer,
            5 => ApplicationCommandOptionType::Boolean,
            6 => ApplicationCommandOptionType::User,
            7 => ApplicationCommandOptionType::Channel,
            8 => ApplicationCommandOptionType::Role,
            other => ApplicationCommandOptionType::Unknown(other),
        }
    }
}

impl From<ApplicationCommandOptionType> for u8 {
    fn from(kind: ApplicationCommandOptionType) -> u8 {
        match kind {
            ApplicationCommandOptionType::SubCommand => 1,
            ApplicationCommandOptionType::SubCommandGroup => 2,
            ApplicationCommandOptionType::String => 3,
            ApplicationCommandOptionType::Integer => 4,
            ApplicationCommandOptionType::Boolean => 5,
            ApplicationCommandOptionType::User => 6,
            ApplicationCommandOptionType::Channel => 7,
            ApplicationCommandOptionType::Role => 8,
            ApplicationCommandOptionType::Unknown(other) => other,
        }
    }
}

impl Default for ApplicationCommandOptionType {
    fn default() -> Self {
        ApplicationCommandOptionType::String
    }
}

/// A fixed choice offered for a command option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandOptionChoice {
    pub name: String,
    /// String or number, depending on the option type.
    #[serde(default)]
    pub value: Value,
}

/// A single option of an application command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandOption {
    #[serde(rename = "type", default)]
    pub kind: ApplicationCommandOptionType,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<ApplicationCommandOptionChoice>,

    /// Nested options for sub-commands and groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ApplicationCommandOption>,
}

/// An application command definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    /// The command's id.
    pub id: String,

    #[serde(default)]
    pub application_id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Autoincrementing version id bumped on updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ApplicationCommandOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_with_nested_options() {
        let raw = r#"{
            "id": "1",
            "application_id": "2",
            "name": "config",
            "description": "configure things",
            "options": [{
                "type": 1,
                "name": "set",
                "description": "set a value",
                "options": [{"type": 3, "name": "key", "description": "which key", "required": true}]
            }]
        }"#;
        let command: ApplicationCommand = serde_json::from_str(raw).unwrap();
        assert_eq!(command.options.len(), 1);
        assert_eq!(
            command.options[0].kind,
            ApplicationCommandOptionType::SubCommand
        );
        assert!(command.options[0].options[0].required);
    }
}
