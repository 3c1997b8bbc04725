//! Suggestion sessions: trigger tracking, popup lifecycle and renderer boundary

pub mod lifecycle;
pub mod plugin;
pub mod renderer;
