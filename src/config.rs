//! Generator settings. Defaults suit prost types living at `crate::api`.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Crate the generated code imports matchers from.
    pub runtime_crate: String,
    /// Module path of the event types, imported as `api`.
    pub types_path: String,
    /// Derive `serde::Serialize`/`Deserialize` on generated checkers.
    pub derive_serde: bool,
    /// Repeated-string fields holding `key=value` labels, checked as a map.
    pub label_fields: Vec<LabelField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelField {
    pub message: String,
    pub field: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            runtime_crate: "eventcheck".to_string(),
            types_path: "crate::api".to_string(),
            derive_serde: true,
            label_fields: vec![LabelField {
                message: "Pod".to_string(),
                field: "labels".to_string(),
            }],
        }
    }
}

impl GenConfig {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        crate::path_de::load_json(path)
    }

    pub fn is_label_field(&self, message: &str, field: &str) -> bool {
        self.label_fields
            .iter()
            .any(|entry| entry.message == message && entry.field == field)
    }
}
