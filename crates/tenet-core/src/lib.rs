//! Tenet Core - Foundational types for the Tenet rule engine
//!
//! This crate provides the types that all other Tenet crates depend on:
//! - `TenetError` and the `Result` alias
//! - `Literal` - owned scalar values for inclusion lists and config

mod error;
mod literal;

pub use error::{Result, TenetError};
pub use literal::Literal;
