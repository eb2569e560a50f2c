// Server side of a passive mode resource for multiplayer game servers.

// Every connected player has a passive flag. Players without an explicit value fall back
// to a default read live from a convar, so changing the convar affects them immediately.

// Two entrypoints change the flag:
// - The `setPlayerActivation` export, meant for trusted resources (admin menus, scripts).
//   The target must be a connected player.
// - The `togglepassive` command, issued by a player for themselves and gated by an ACE permission.

// Every change is broadcast to all connected players as a client event.

// Sessions, transport, permission evaluation and convars belong to the host runtime and are
// reached through the `HostRuntime` trait. `LocalHost` is an in-process implementation.

pub mod api;
pub mod server;

pub use server::{
    PassiveServer,
    context::PlayerContext,
    error::{ActivationError, ToggleOutcome},
    host::{ClientEvent, HostRuntime},
    protocol::{AcePolicy, ConvarTable, LocalHost, SessionManager},
    settings::Settings,
    store::ActivationStore,
};
