//! Command descriptors, the item registry and trigger detection

pub mod commands;
pub mod registry;
pub mod trigger;
