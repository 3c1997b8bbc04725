//! Document-side types: blocks, edit events, undo history, embed nodes

pub mod content;
pub mod document;
pub mod event;
pub mod nodes;
