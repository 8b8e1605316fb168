//! Generates Rust checker types for prost event messages.
//!
//! A [`schema::SchemaSet`] describes the messages and enums of an event API.
//! [`codegen::generate`] turns it into one Rust source artifact per schema
//! file: a `*Checker` per message with one optional match-slot per field, a
//! `*Checker` per enum, and one `*ListMatcher` per repeated element type.
//! The generated code depends on the `eventcheck` runtime crate.

pub mod classify;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod naming;
pub mod path_de;
pub mod schema;

#[cfg(test)]
mod fixtures;

pub use codegen::{Artifacts, generate};
pub use config::GenConfig;
pub use error::{GenError, LoadError};
