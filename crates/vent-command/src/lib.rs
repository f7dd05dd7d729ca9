pub mod config;
pub mod controller;
pub mod dispatch;
pub mod hooks;
pub mod host;
pub mod inputs;
pub mod session;
pub mod subscriptions;
pub mod transaction;
pub mod types;

pub use config::{CommandConfig, ConfigError, CountLimits, VentDefaults};
pub use controller::VentCommand;
pub use dispatch::dispatch;
pub use hooks::{CommandContext, CommandHooks};
pub use host::{CommandHost, SubscriptionId};
pub use inputs::{
    apply_visibility, initial_dialog, read_kind, read_seed, read_spec, InputError, InputModel,
};
pub use session::{SessionState, TRANSITION_HISTORY};
pub use subscriptions::Subscriptions;
pub use transaction::{bracketed, AttemptError, AttemptSpan};
pub use types::*;
