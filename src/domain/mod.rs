//! Core domain types and the analytics engine.

pub mod analysis;
pub mod bar;
pub mod calendar;
pub mod config_validation;
pub mod drawdown;
pub mod equity;
pub mod error;
pub mod indicator;
pub mod returns;
