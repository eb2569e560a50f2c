/// Names the resource registers with the host. Defaults match the stock resource manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Deserialize))]
#[cfg_attr(feature = "json", serde(default))]
pub struct Settings {
    /// Integer convar holding the activation of players without an override.
    pub default_convar: String,
    /// ACE permission required by `togglepassive`.
    pub change_self_ace: String,
    pub event_name: String,
    pub command_name: String,
    pub set_export_name: String,
    pub get_export_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_convar: "simplepassive_default".to_string(),
            change_self_ace: "simplepassive.changeself".to_string(),
            event_name: "simplepassive:activationChanged".to_string(),
            command_name: "togglepassive".to_string(),
            set_export_name: "setPlayerActivation".to_string(),
            get_export_name: "getPlayerActivation".to_string(),
        }
    }
}
