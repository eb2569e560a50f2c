use std::sync::Arc;

use crate::{
    api::{
        error::{PassiveError, PassiveResult},
        message::{ExportArg, InputMessage, OutputMessage},
        schema::{Deserialize, Schema, Serialize},
    },
    server::{
        context::PlayerId, error::ToggleOutcome, host::HostRuntime, settings::Settings,
        store::ActivationStore,
    },
};

pub mod context;
pub mod error;
pub mod host;
pub mod protocol;
pub mod settings;
pub mod store;

/// Routes commands and export calls from the host to the activation store.
pub struct PassiveServer<H, S>
where
    H: HostRuntime,
    S: Schema,
{
    host: Arc<H>,
    _schema: S,
    settings: Arc<Settings>,
    store: ActivationStore<H>,
}

impl<H, S> PassiveServer<H, S>
where
    H: HostRuntime,
    S: Schema,
{
    pub fn new(host: Arc<H>, schema: S) -> Self {
        let settings = Arc::new(Settings::default());
        Self {
            store: ActivationStore::new(Arc::clone(&host), Arc::clone(&settings)),
            host,
            _schema: schema,
            settings,
        }
    }

    /// Replaces the registered names. Starts from an empty store.
    pub fn with_settings(self, settings: Settings) -> Self {
        let settings = Arc::new(settings);
        Self {
            store: ActivationStore::new(Arc::clone(&self.host), Arc::clone(&settings)),
            host: self.host,
            _schema: self._schema,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &ActivationStore<H> {
        &self.store
    }

    /// Handles a command issued in chat or from the console. Arguments and raw text are not
    /// used by any command of this resource.
    pub fn command(
        &self,
        name: &str,
        source: i64,
        _args: &[String],
        _raw: &str,
    ) -> PassiveResult<ToggleOutcome> {
        if name != self.settings.command_name {
            return Err(PassiveError::UnknownCommand(name.to_string()));
        }

        let ace = self.settings.change_self_ace.as_str();
        Ok(self
            .store
            .toggle_own(source, |id| self.host.is_ace_allowed(id, ace)))
    }

    /// `setPlayerActivation` export. `false` when `id` is not a connected player.
    pub fn set_player_activation(&self, id: i64, activation: bool) -> bool {
        self.store.set_activation(id, activation).is_ok()
    }

    /// `getPlayerActivation` export.
    pub fn get_player_activation(&self, id: i64) -> bool {
        match PlayerId::try_from(id) {
            Ok(id) => self.store.effective_activation(id),
            Err(_) => self.store.default_activation(),
        }
    }

    pub fn call_export(&self, name: &str, args: &[ExportArg]) -> PassiveResult<bool> {
        if name == self.settings.set_export_name {
            match args {
                [id, activation, ..] => {
                    let id = id.as_int();
                    let activation = activation.as_bool();
                    match (id, activation) {
                        (Some(id), Some(activation)) => {
                            Ok(self.set_player_activation(id, activation))
                        }
                        _ => Err(PassiveError::InvalidArguments(name.to_string())),
                    }
                }
                _ => Err(PassiveError::InvalidArguments(name.to_string())),
            }
        } else if name == self.settings.get_export_name {
            args.first()
                .and_then(ExportArg::as_int)
                .map(|id| self.get_player_activation(id))
                .ok_or_else(|| PassiveError::InvalidArguments(name.to_string()))
        } else {
            Err(PassiveError::UnknownExport(name.to_string()))
        }
    }

    /// Decodes and routes one message from the host dispatcher. Returns the encoded reply, if
    /// the message has one. Commands never reply.
    pub fn process_message(&self, raw_message: &[u8]) -> Option<Vec<u8>>
    where
        InputMessage: Deserialize<S>,
        OutputMessage: Serialize<S>,
    {
        let message = match <InputMessage as Deserialize<S>>::deserialize(raw_message) {
            Ok(message) => message,
            Err(err) => {
                log::error!("Ignored message due to deserialization failure");
                return Some(Self::encode(err.into()));
            }
        };

        match message {
            InputMessage::Command {
                source,
                name,
                args,
                raw,
            } => {
                match self.command(name.as_str(), source, &args, raw.as_str()) {
                    Ok(outcome) => log::trace!(
                        "Command processed. Name: {name}, Mutated: {}, Outcome: {outcome:?}",
                        outcome.is_mutated()
                    ),
                    Err(err) => log::debug!("Command skipped. Source: {source}, Error: {err}"),
                }
                None
            }
            InputMessage::Export {
                correlation_id,
                name,
                args,
            } => match self.call_export(name.as_str(), &args) {
                Ok(result) => Some(Self::encode(OutputMessage::ExportResult {
                    correlation_id,
                    result,
                })),
                Err(err) => {
                    log::error!("Export call failed. Name: {name}, Error: {err}");
                    Some(Self::encode(err.reply_to(correlation_id)))
                }
            },
        }
    }

    fn encode(message: OutputMessage) -> Vec<u8>
    where
        OutputMessage: Serialize<S>,
    {
        <OutputMessage as Serialize<S>>::serialize(&message)
    }
}
