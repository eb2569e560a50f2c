use std::error::Error;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationError {
    /// The target id does not resolve to a connected player.
    UnknownPlayer(i64),
    /// The issuing player lacks the self-change permission.
    UnauthorizedSelfToggle,
    /// The command was issued by the console or RCON.
    ConsoleOriginRejected,
}

impl Display for ActivationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPlayer(id) => write!(f, "Player {id} is not connected"),
            Self::UnauthorizedSelfToggle => {
                f.write_str("Player is not allowed to change their own activation")
            }
            Self::ConsoleOriginRejected => {
                f.write_str("This command can only be used by players on the server")
            }
        }
    }
}

impl Error for ActivationError {}

pub type ActivationResult = Result<bool, ActivationError>;

/// Result of a self toggle. The command channel has no way back to the issuer, so this only
/// feeds logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Mutated(bool),
    Rejected(ActivationError),
}

impl ToggleOutcome {
    pub fn is_mutated(&self) -> bool {
        matches!(self, Self::Mutated(_))
    }
}
