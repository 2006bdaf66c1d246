//! procdeck-app - Application state and orchestration for procdeck
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management, the Engine abstraction for shared orchestration, the registry
//! poller, the event bus, lifecycle command bookkeeping, the terminal
//! session, and configuration loading.

pub mod actions;
pub mod bus;
pub mod config;
pub mod config_editor;
pub mod dispatcher;
pub mod engine;
pub mod handler;
pub mod input_key;
pub mod log_menu;
pub mod message;
pub mod notifications;
pub mod poller;
pub mod process;
pub mod registry;
pub mod signals;
pub mod state;
pub mod tag_colors;
pub mod terminal;
pub mod upload;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Re-export primary types
pub use bus::{BusEvent, Channel, EventBus, SubscriptionId};
pub use config::Settings;
pub use dispatcher::{ActionKind, CommandOutcome, Dispatcher};
pub use engine::Engine;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use registry::{RegistryState, Snapshot};
pub use state::{AppState, UiMode};
pub use tag_colors::{TagColor, TagColorMap, PALETTE};
pub use terminal::{SessionId, TerminalSession, TerminalStatus};
