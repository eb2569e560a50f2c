use crate::{
    api::message::OutputMessage,
    server::context::{PlayerContext, PlayerId},
};

/// Services provided by the game server the resource runs in.
pub trait HostRuntime: Send + Sync + 'static {
    /// Resolves a connected player. Ids below 1 never resolve.
    fn player(&self, id: i64) -> Option<PlayerContext>;

    /// Integer convar lookup, `default` when unset or unparsable.
    fn convar_int(&self, name: &str, default: i64) -> i64;

    fn is_ace_allowed(&self, player: PlayerId, ace: &str) -> bool;

    /// Triggers a client event on every connected player.
    fn broadcast(&self, event: ClientEvent<'_>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientEvent<'a> {
    pub name: &'a str,
    pub player: PlayerId,
    pub activation: bool,
}

impl From<ClientEvent<'_>> for OutputMessage {
    fn from(val: ClientEvent<'_>) -> Self {
        OutputMessage::ClientEvent {
            event: val.name.to_string(),
            player: val.player,
            activation: val.activation,
        }
    }
}
