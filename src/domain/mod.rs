//! Core domain types and decision logic.

pub mod bar;
pub mod history;
pub mod indicator;
pub mod position_state;
pub mod order;
pub mod event;
pub mod strategy;
pub mod signal;
pub mod run;
pub mod config_validation;
pub mod error;
