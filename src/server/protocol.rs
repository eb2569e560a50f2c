use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, PoisonError, RwLock},
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    api::{
        message::OutputMessage,
        schema::{Schema, Serialize},
    },
    server::{
        context::{PlayerContext, PlayerId},
        host::{ClientEvent, HostRuntime},
    },
};

struct Session {
    name: String,
    tx: UnboundedSender<Vec<u8>>,
}

/// Connected players and the channels their client events are written to.
#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<PlayerId, Session>>,
}

impl SessionManager {
    pub fn connect(&self, player_id: PlayerId, name: impl Into<String>) -> UnboundedReceiver<Vec<u8>> {
        let (tx, rx) = mpsc::unbounded_channel::<Vec<u8>>();
        let name = name.into();
        log::debug!("Player connected. Id: {player_id}, Name: {name}");

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(player_id, Session { name, tx });

        rx
    }

    pub fn disconnect(&self, player_id: PlayerId) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&player_id)
            .is_some();
        if removed {
            log::debug!("Player disconnected. Id: {player_id}");
        }
        removed
    }

    pub fn player(&self, player_id: PlayerId) -> Option<PlayerContext> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&player_id)
            .map(|session| PlayerContext::new(player_id, session.name.as_str()))
    }

    pub fn connected(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Writes `raw_message` to every connected player. Closed receivers are skipped.
    pub fn send_all(&self, raw_message: Vec<u8>) {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        for (p_id, session) in sessions.iter() {
            if session.tx.send(raw_message.clone()).is_err() {
                log::trace!("Dropped client event, receiver closed. PlayerId: {p_id}");
            }
        }
    }
}

/// Server convars, stored as text like the host does.
#[derive(Default)]
pub struct ConvarTable {
    values: RwLock<HashMap<String, String>>,
}

impl ConvarTable {
    pub fn set(&self, name: &str, value: impl ToString) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value.to_string());
    }

    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }
}

#[derive(Default)]
pub struct AcePolicy {
    grants: RwLock<HashMap<PlayerId, HashSet<String>>>,
}

impl AcePolicy {
    pub fn allow(&self, player_id: PlayerId, ace: &str) {
        self.grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(player_id)
            .or_default()
            .insert(ace.to_string());
    }

    pub fn revoke(&self, player_id: PlayerId, ace: &str) {
        if let Some(aces) = self
            .grants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&player_id)
        {
            aces.remove(ace);
        }
    }

    pub fn is_allowed(&self, player_id: PlayerId, ace: &str) -> bool {
        self.grants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&player_id)
            .is_some_and(|aces| aces.contains(ace))
    }
}

/// In-process host: sessions, convars and ACEs kept in memory, client events encoded with `S`.
pub struct LocalHost<S: Schema> {
    _schema: S,
    sessions: Arc<SessionManager>,
    convars: ConvarTable,
    aces: AcePolicy,
}

impl<S: Schema> LocalHost<S> {
    pub fn new(schema: S) -> Self {
        Self {
            _schema: schema,
            sessions: Arc::new(SessionManager::default()),
            convars: ConvarTable::default(),
            aces: AcePolicy::default(),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn convars(&self) -> &ConvarTable {
        &self.convars
    }

    pub fn aces(&self) -> &AcePolicy {
        &self.aces
    }
}

impl<S> HostRuntime for LocalHost<S>
where
    S: Schema,
    OutputMessage: Serialize<S>,
{
    fn player(&self, id: i64) -> Option<PlayerContext> {
        let id = PlayerId::try_from(id).ok().filter(|id| *id >= 1)?;
        self.sessions.player(id)
    }

    fn convar_int(&self, name: &str, default: i64) -> i64 {
        self.convars.get_int(name, default)
    }

    fn is_ace_allowed(&self, player: PlayerId, ace: &str) -> bool {
        self.aces.is_allowed(player, ace)
    }

    fn broadcast(&self, event: ClientEvent<'_>) {
        let message: OutputMessage = event.into();
        self.sessions
            .send_all(<OutputMessage as Serialize<S>>::serialize(&message));
    }
}
