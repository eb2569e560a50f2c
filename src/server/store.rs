use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::server::{
    context::PlayerId,
    error::{ActivationError, ActivationResult, ToggleOutcome},
    host::{ClientEvent, HostRuntime},
    settings::Settings,
};

/// Passive activation of every player that has an explicit value.
///
/// Entries are never removed, not even when the player disconnects. A player that reconnects
/// under the same id keeps their last value, and the map grows with every distinct id seen.
///
/// Writers are serialized from mutation through notification, so clients receive changes in
/// the order they were applied. The map itself is unlocked while the host broadcasts.
pub struct ActivationStore<H: HostRuntime> {
    host: Arc<H>,
    settings: Arc<Settings>,
    activations: RwLock<HashMap<PlayerId, bool>>,
    writer: Mutex<()>,
}

impl<H: HostRuntime> ActivationStore<H> {
    pub fn new(host: Arc<H>, settings: Arc<Settings>) -> Self {
        Self {
            host,
            settings,
            activations: RwLock::new(HashMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Activation for players without an override. Read from the convar on every call.
    pub fn default_activation(&self) -> bool {
        self.host.convar_int(&self.settings.default_convar, 0) != 0
    }

    pub fn effective_activation(&self, id: PlayerId) -> bool {
        let stored = self.read().get(&id).copied();
        stored.unwrap_or_else(|| self.default_activation())
    }

    pub fn override_of(&self, id: PlayerId) -> Option<bool> {
        self.read().get(&id).copied()
    }

    pub fn overrides(&self) -> usize {
        self.read().len()
    }

    /// Sets the activation of a connected player and notifies everyone.
    ///
    /// Fails with [`ActivationError::UnknownPlayer`] without touching the map when `id` does
    /// not resolve through the host.
    pub fn set_activation(&self, id: i64, activation: bool) -> ActivationResult {
        let Some(player) = self.host.player(id) else {
            log::debug!("Skipping passive change of unknown player. Id: {id}");
            return Err(ActivationError::UnknownPlayer(id));
        };

        let _writer = self.writer();
        self.write().insert(player.id(), activation);
        self.notify(player.id(), activation);
        log::info!(
            "Passive Activation of '{}' ({}) is now {activation}",
            player.name(),
            player.id()
        );

        Ok(activation)
    }

    /// Flips the activation of the issuing player.
    ///
    /// Connectivity is only checked through `source`; the new value is written without
    /// resolving the player again.
    pub fn toggle_own(&self, source: i64, capability: impl Fn(PlayerId) -> bool) -> ToggleOutcome {
        let id = match PlayerId::try_from(source) {
            Ok(id) if id >= 1 => id,
            _ => {
                log::warn!("This command can only be used by players on the server");
                return ToggleOutcome::Rejected(ActivationError::ConsoleOriginRejected);
            }
        };

        if !capability(id) {
            log::trace!("Player {id} is not allowed to change their passive activation");
            return ToggleOutcome::Rejected(ActivationError::UnauthorizedSelfToggle);
        }

        let default = self.default_activation();
        let _writer = self.writer();
        let activation = {
            let mut activations = self.write();
            let current = activations.entry(id).or_insert(default);
            *current = !*current;
            *current
        };

        self.notify(id, activation);
        log::info!("Player {id} set their activation to {activation}");

        ToggleOutcome::Mutated(activation)
    }

    fn notify(&self, player: PlayerId, activation: bool) {
        self.host.broadcast(ClientEvent {
            name: self.settings.event_name.as_str(),
            player,
            activation,
        });
    }

    fn writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PlayerId, bool>> {
        self.activations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PlayerId, bool>> {
        self.activations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock, Weak};

    use super::*;
    use crate::server::{context::PlayerContext, host::testing::RecordingHost};

    const EVENT: &str = "simplepassive:activationChanged";

    fn store(host: RecordingHost) -> (Arc<RecordingHost>, ActivationStore<RecordingHost>) {
        let host = Arc::new(host);
        let store = ActivationStore::new(Arc::clone(&host), Arc::new(Settings::default()));
        (host, store)
    }

    #[test]
    fn falls_back_to_live_default() {
        let (host, store) = store(RecordingHost::default());

        assert!(!store.effective_activation(5));
        host.set_default(1);
        assert!(store.effective_activation(5));
        host.set_default(-3);
        assert!(store.effective_activation(5));
        host.set_default(0);
        assert!(!store.effective_activation(5));
        assert_eq!(store.overrides(), 0);
    }

    #[test]
    fn override_wins_over_default() {
        let (host, store) = store(RecordingHost::default().with_player(5, "alice"));

        assert_eq!(store.set_activation(5, false), Ok(false));
        host.set_default(1);

        assert!(!store.effective_activation(5));
        assert_eq!(store.override_of(5), Some(false));
    }

    #[test]
    fn set_on_unknown_player_does_nothing() {
        let (host, store) = store(RecordingHost::default().with_player(5, "alice"));

        assert_eq!(
            store.set_activation(9, true),
            Err(ActivationError::UnknownPlayer(9))
        );
        assert_eq!(
            store.set_activation(-1, true),
            Err(ActivationError::UnknownPlayer(-1))
        );

        assert_eq!(store.overrides(), 0);
        assert!(host.events().is_empty());
    }

    #[test]
    fn set_notifies_once() {
        let (host, store) = store(RecordingHost::default().with_player(5, "alice"));

        assert_eq!(store.set_activation(5, true), Ok(true));

        assert!(store.effective_activation(5));
        assert_eq!(host.events(), vec![(EVENT.to_string(), 5, true)]);
    }

    #[test]
    fn set_same_value_still_notifies() {
        let (host, store) = store(RecordingHost::default().with_player(5, "alice"));

        store.set_activation(5, true).unwrap();
        store.set_activation(5, true).unwrap();

        assert_eq!(host.events().len(), 2);
    }

    #[test]
    fn double_toggle_restores_value() {
        let (host, store) = store(RecordingHost::default());
        host.set_default(1);

        assert_eq!(store.toggle_own(4, |_| true), ToggleOutcome::Mutated(false));
        assert_eq!(store.toggle_own(4, |_| true), ToggleOutcome::Mutated(true));

        assert!(store.effective_activation(4));
        assert_eq!(
            host.events(),
            vec![(EVENT.to_string(), 4, false), (EVENT.to_string(), 4, true)]
        );
    }

    #[test]
    fn console_toggle_is_rejected() {
        let (host, store) = store(RecordingHost::default());

        for source in [0, -1, i64::MIN] {
            assert_eq!(
                store.toggle_own(source, |_| true),
                ToggleOutcome::Rejected(ActivationError::ConsoleOriginRejected)
            );
        }

        assert_eq!(store.overrides(), 0);
        assert!(host.events().is_empty());
    }

    #[test]
    fn unauthorized_toggle_is_silent() {
        let (host, store) = store(RecordingHost::default());

        let outcome = store.toggle_own(4, |id| id == 5);

        assert_eq!(
            outcome,
            ToggleOutcome::Rejected(ActivationError::UnauthorizedSelfToggle)
        );
        assert_eq!(store.override_of(4), None);
        assert!(host.events().is_empty());
    }

    #[test]
    fn toggle_trusts_source_without_resolving() {
        let (host, store) = store(RecordingHost::default().with_player(4, "bob"));
        host.drop_player(4);

        assert_eq!(store.toggle_own(4, |_| true), ToggleOutcome::Mutated(true));
        assert_eq!(
            store.set_activation(4, false),
            Err(ActivationError::UnknownPlayer(4))
        );
        assert_eq!(store.override_of(4), Some(true));
    }

    #[test]
    fn overrides_survive_disconnect() {
        let (host, store) = store(RecordingHost::default().with_player(5, "alice"));

        store.set_activation(5, true).unwrap();
        host.drop_player(5);

        assert!(store.effective_activation(5));
        assert_eq!(store.overrides(), 1);
    }

    #[test]
    fn admin_then_self_toggle_scenario() {
        let (host, store) = store(RecordingHost::default().with_player(12, "carol"));

        assert!(!store.effective_activation(12));

        assert_eq!(store.set_activation(12, true), Ok(true));
        assert!(store.effective_activation(12));
        assert_eq!(host.events(), vec![(EVENT.to_string(), 12, true)]);

        assert_eq!(store.toggle_own(12, |_| true), ToggleOutcome::Mutated(false));
        assert!(!store.effective_activation(12));
        assert_eq!(
            host.events(),
            vec![(EVENT.to_string(), 12, true), (EVENT.to_string(), 12, false)]
        );
    }

    #[test]
    fn concurrent_writers_broadcast_in_mutation_order() {
        let mut host = RecordingHost::default();
        for id in 1..=4 {
            host = host.with_player(id, "racer");
        }
        let (host, store) = store(host);
        let store = Arc::new(store);

        let writers: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for round in 0..200 {
                        let id = 1 + (round % 4) as i64;
                        if worker % 2 == 0 {
                            store.set_activation(id, (worker + round) % 3 == 0).unwrap();
                        } else {
                            store.toggle_own(id, |_| true);
                        }
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let events = host.events();
        assert_eq!(events.len(), 8 * 200);
        for id in 1..=4u64 {
            let last = events.iter().rev().find(|(_, p, _)| *p == id).unwrap();
            assert_eq!(last.2, store.effective_activation(id));
        }
    }

    /// Reads the store back from inside `broadcast`.
    #[derive(Default)]
    struct ProbeHost {
        store: OnceLock<Weak<ActivationStore<ProbeHost>>>,
        seen: Mutex<Vec<bool>>,
    }

    impl HostRuntime for ProbeHost {
        fn player(&self, id: i64) -> Option<PlayerContext> {
            PlayerId::try_from(id)
                .ok()
                .map(|id| PlayerContext::new(id, "probe"))
        }

        fn convar_int(&self, _name: &str, default: i64) -> i64 {
            default
        }

        fn is_ace_allowed(&self, _player: PlayerId, _ace: &str) -> bool {
            true
        }

        fn broadcast(&self, event: ClientEvent<'_>) {
            let store = self.store.get().and_then(Weak::upgrade).unwrap();
            self.seen
                .lock()
                .unwrap()
                .push(store.effective_activation(event.player));
        }
    }

    #[test]
    fn mutation_is_visible_when_notified() {
        let host = Arc::new(ProbeHost::default());
        let store = Arc::new(ActivationStore::new(
            Arc::clone(&host),
            Arc::new(Settings::default()),
        ));
        host.store.set(Arc::downgrade(&store)).unwrap();

        store.set_activation(3, true).unwrap();
        store.toggle_own(3, |_| true);
        store.toggle_own(3, |_| true);

        assert_eq!(*host.seen.lock().unwrap(), vec![true, false, true]);
    }
}
