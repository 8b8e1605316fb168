//! The checkers `eventcheck-gen` emits for `schemas/`, compiled against
//! hand-written event types in the shape prost generates for them.

pub mod api;

/// Generated at build time; see `build.rs`.
pub mod checks {
    include!(concat!(env!("OUT_DIR"), "/checks.rs"));
}
