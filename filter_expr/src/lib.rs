//! # Filter expression grammar
//!
//! The textual filter form is a JSON nested array:
//!
//! ```text
//! []                                        no filter
//! ["all", [">", ["get", "population"], 1000000], ["has", ["get", "name"]]]
//! ```
//!
//! This crate owns the operator table, the field/data type model and the
//! validator that decides whether a candidate expression can be trusted.

pub mod config;
pub mod grammar;
#[macro_use]
pub mod logging;
pub mod validation;

// Re-export key types for library consumers
pub use grammar::{DataType, FieldDef, LogicalOp, Operator};
pub use validation::{validate, validate_str, ValidationError, ValidationResult};
