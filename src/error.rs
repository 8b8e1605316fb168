//! Generation-fatal errors. Any of these stops the whole run; no artifact of
//! a failed run is kept.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("{message}.{field}: unrecognized field kind `{kind}`")]
    UnrecognizedKind {
        message: String,
        field: String,
        kind: String,
    },

    #[error(
        "{message}.{field}: map<{key}, {value}> is not supported (want a singular map with string keys and string values)"
    )]
    UnsupportedMap {
        message: String,
        field: String,
        key: String,
        value: String,
    },

    #[error("{message}.{field}: `{type_name}` is not a known {expected}")]
    MissingReference {
        message: String,
        field: String,
        type_name: String,
        expected: &'static str,
    },

    #[error("generated type `{identifier}` would be defined for both {first} and {second}")]
    IdentifierCollision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("`{name}` is defined more than once (first in `{first}`, again in `{second}`)")]
    DuplicateDefinition {
        name: String,
        first: String,
        second: String,
    },
}

/// Failure to read a schema or configuration file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: at JSON path {at} → {message}", path.display())]
    Parse {
        path: PathBuf,
        at: String,
        message: String,
    },
}
