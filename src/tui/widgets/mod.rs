//! TUI widgets

pub mod feed;
pub mod help;
pub mod mode_bar;
pub mod spinner;
