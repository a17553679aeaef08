//! CLI command implementations.

pub mod catalog;
pub mod close_form;
pub mod invoke;
