use std::borrow::Cow;

/// Messages delivered to the resource by the host dispatcher.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(tag = "method", rename_all = "snake_case"))]
pub enum InputMessage {
    /// A chat/console command. `source` is the issuing player id, or a value below 1 for
    /// the server console and RCON.
    Command {
        source: i64,
        name: String,
        #[cfg_attr(feature = "json", serde(default))]
        args: Vec<String>,
        #[cfg_attr(feature = "json", serde(default))]
        raw: String,
    },
    /// A call to one of the exports from another resource.
    Export {
        correlation_id: String,
        name: String,
        #[cfg_attr(feature = "json", serde(default))]
        args: Vec<ExportArg>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum ExportArg {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl ExportArg {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(value) => value.parse().ok(),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(value) => Some(*value != 0),
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(tag = "method", rename_all = "snake_case"))]
pub enum OutputMessage {
    ClientEvent {
        event: String,
        player: u64,
        activation: bool,
    },
    ExportResult {
        correlation_id: String,
        result: bool,
    },
    /// Carries the `correlation_id` of the export call that failed, when there is one.
    GenericError {
        #[cfg_attr(
            feature = "json",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        correlation_id: Option<String>,
        description: Cow<'static, str>,
    },
}
