//! Default UI-side implementations of the suggestion boundaries

pub mod command_list;
pub mod popup;
