//! dropfeed: newly listed products from a CSV feed, grouped by day or week

pub mod cli;
pub mod config;
pub mod parsers;
pub mod services;
pub mod tui;
pub mod types;
