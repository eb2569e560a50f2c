use std::borrow::Cow;
use std::error::Error;
use std::fmt::Display;

use crate::api::message::OutputMessage;

impl From<PassiveError> for OutputMessage {
    fn from(val: PassiveError) -> Self {
        OutputMessage::GenericError {
            correlation_id: None,
            description: Cow::Owned(val.to_string()),
        }
    }
}

impl PassiveError {
    /// Error reply addressed to the caller waiting on `correlation_id`.
    pub fn reply_to(self, correlation_id: String) -> OutputMessage {
        OutputMessage::GenericError {
            correlation_id: Some(correlation_id),
            description: Cow::Owned(self.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassiveError {
    DeserializationFailure,
    UnknownCommand(String),
    UnknownExport(String),
    InvalidArguments(String),
}

impl Display for PassiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeserializationFailure => f.write_str("Message could not be deserialized"),
            Self::UnknownCommand(name) => write!(f, "Unknown command '{name}'"),
            Self::UnknownExport(name) => write!(f, "Unknown export '{name}'"),
            Self::InvalidArguments(name) => write!(f, "Invalid arguments for export '{name}'"),
        }
    }
}

impl Error for PassiveError {}

pub type PassiveResult<T> = Result<T, PassiveError>;
