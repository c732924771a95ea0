//! UI components.

pub mod zoom_flow;
