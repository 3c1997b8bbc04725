//! Ordered, immutable command list the suggestion menu draws from
//!
//! The registry is a value, not a global: hosts build one from any list of
//! descriptors (or take the built-in slash commands) and hand clones to every
//! session that needs it.

use crate::input::commands::{slash_commands, CommandDescriptor};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: Arc<[CommandDescriptor]>,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new(slash_commands())
    }
}

impl ItemRegistry {
    pub fn new(items: Vec<CommandDescriptor>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// All descriptors in registry order
    pub fn items(&self) -> &[CommandDescriptor] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a descriptor by exact name
    pub fn find_by_name(&self, name: &str) -> Option<&CommandDescriptor> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Descriptors whose name starts with `query`, ignoring case, in registry order
    pub fn filter(&self, query: &str) -> Vec<CommandDescriptor> {
        filter_items(&self.items, query)
    }
}

/// Prefix filter over any descriptor slice
///
/// No scoring, no cap: the result is the input restricted to matches.
pub fn filter_items(items: &[CommandDescriptor], query: &str) -> Vec<CommandDescriptor> {
    items
        .iter()
        .filter(|item| item.matches(query))
        .cloned()
        .collect()
}
