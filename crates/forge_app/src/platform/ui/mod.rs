pub mod commands;
pub mod notify;
pub mod panel;
pub mod render;
