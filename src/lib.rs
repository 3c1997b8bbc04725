// Library interface for the slash-command suggestion subsystem
// Exposes the modules a host editor wires together

pub mod config;
pub mod editor;
pub mod input;
pub mod model;
pub mod suggestion;
pub mod view;

pub use config::{ConfigError, SuggestionConfig};
pub use editor::{Chain, DocumentEditor, Editor, Transaction};
pub use input::commands::{slash_commands, CommandAction, CommandDescriptor};
pub use input::registry::ItemRegistry;
pub use model::document::TextRange;
pub use suggestion::lifecycle::{LifecycleState, PopupLifecycle, TeardownError};
pub use suggestion::plugin::SuggestionPlugin;
