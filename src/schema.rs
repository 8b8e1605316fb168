// In-memory schema model. Pure data, built once per run and never mutated.
//
// Field kinds stay raw strings here (`"uint32"`, `"message"`, `"map"`, ...);
// deciding what they mean is the classifier's job, so an unknown kind
// surfaces as a generation error instead of a deserialization failure.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Every input grouping of one run, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSet {
    pub files: Vec<SchemaFile>,
}

/// One input grouping; becomes one output artifact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Definition {
    Message(MessageSchema),
    Enum(EnumSchema),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSchema {
    /// Dotted for nested messages: `Outer.Inner`.
    pub name: String,
    /// Declaration order; drives output order only.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumSchema {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    #[default]
    Singular,
    Repeated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub label: Label,
    /// Referenced message/enum for `message` and `enum` kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Key and value kinds of a `map` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Oneof group this field is an alternative of.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oneof: Option<String>,
}

/// A field together with the message that declares it.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    pub message: &'a MessageSchema,
    pub field: &'a FieldSchema,
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDERS
// ————————————————————————————————————————————————————————————————————————————

impl SchemaFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), definitions: Vec::new() }
    }
    pub fn message(mut self, message: MessageSchema) -> Self {
        self.definitions.push(Definition::Message(message));
        self
    }
    pub fn enumeration(mut self, schema: EnumSchema) -> Self {
        self.definitions.push(Definition::Enum(schema));
        self
    }
}

impl MessageSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new() }
    }
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }
    pub fn field_refs(&self) -> impl Iterator<Item = FieldRef<'_>> {
        self.fields.iter().map(move |field| FieldRef { message: self, field })
    }
}

impl EnumSchema {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            label: Label::Singular,
            type_name: None,
            key: None,
            value: None,
            oneof: None,
        }
    }
    /// A `message` field referencing `type_name`.
    pub fn message(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, "message").type_name(type_name)
    }
    /// An `enum` field referencing `type_name`.
    pub fn enumeration(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, "enum").type_name(type_name)
    }
    pub fn map(name: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = Self::new(name, "map");
        field.key = Some(key.into());
        field.value = Some(value.into());
        field
    }
    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
    pub fn repeated(mut self) -> Self {
        self.label = Label::Repeated;
        self
    }
    pub fn oneof(mut self, group: impl Into<String>) -> Self {
        self.oneof = Some(group.into());
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INDEX
// ————————————————————————————————————————————————————————————————————————————

/// Name → definition lookup across the whole schema set.
///
/// Messages and enums share one namespace since both produce a `*Checker`
/// type; a repeated name is a [`GenError::DuplicateDefinition`].
#[derive(Debug)]
pub struct SchemaIndex<'a> {
    definitions: IndexMap<&'a str, (&'a str, &'a Definition)>,
}

impl<'a> SchemaIndex<'a> {
    pub fn build(set: &'a SchemaSet) -> Result<Self, GenError> {
        let mut definitions = IndexMap::new();
        for file in &set.files {
            for definition in &file.definitions {
                match definitions.entry(definition.name()) {
                    Entry::Occupied(entry) => {
                        let (first, _): &(&str, &Definition) = entry.get();
                        return Err(GenError::DuplicateDefinition {
                            name: definition.name().to_string(),
                            first: first.to_string(),
                            second: file.name.clone(),
                        });
                    }
                    Entry::Vacant(entry) => {
                        entry.insert((file.name.as_str(), definition));
                    }
                }
            }
        }
        Ok(Self { definitions })
    }

    pub fn message(&self, name: &str) -> Option<&'a MessageSchema> {
        match self.definition(name) {
            Some(Definition::Message(message)) => Some(message),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<&'a EnumSchema> {
        match self.definition(name) {
            Some(Definition::Enum(schema)) => Some(schema),
            _ => None,
        }
    }

    fn definition(&self, name: &str) -> Option<&'a Definition> {
        self.definitions.get(name).map(|&(_, definition)| definition)
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Message(message) => &message.name,
            Definition::Enum(schema) => &schema.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_file_deserializes_from_json() {
        let json = serde_json::json!({
            "name": "process",
            "definitions": [
                {"message": {"name": "Process", "fields": [
                    {"name": "pid", "kind": "uint32"},
                    {"name": "arguments", "kind": "string", "label": "repeated"},
                    {"name": "parent", "kind": "message", "type_name": "Process"},
                    {"name": "annotations", "kind": "map", "key": "string", "value": "string"}
                ]}},
                {"enum": {"name": "Action", "values": ["ACTION_UNSPECIFIED", "ACTION_POST"]}}
            ]
        });
        let file: SchemaFile = serde_json::from_value(json).unwrap();
        assert_eq!(file.definitions.len(), 2);
        let Definition::Message(process) = &file.definitions[0] else {
            panic!("expected a message");
        };
        assert_eq!(process.fields[1].label, Label::Repeated);
        assert_eq!(process.fields[2].type_name.as_deref(), Some("Process"));
        assert_eq!(process.fields[3].key.as_deref(), Some("string"));
    }

    #[test]
    fn index_resolves_by_kind() {
        let set = SchemaSet {
            files: vec![
                SchemaFile::new("a")
                    .message(MessageSchema::new("Process"))
                    .enumeration(EnumSchema::new("Action", ["ACTION_UNSPECIFIED"])),
            ],
        };
        let index = SchemaIndex::build(&set).unwrap();
        assert!(index.message("Process").is_some());
        assert!(index.enumeration("Process").is_none());
        assert!(index.enumeration("Action").is_some());
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn duplicate_names_across_files_are_rejected() {
        let set = SchemaSet {
            files: vec![
                SchemaFile::new("a").message(MessageSchema::new("Process")),
                SchemaFile::new("b").enumeration(EnumSchema::new("Process", ["X"])),
            ],
        };
        let err = SchemaIndex::build(&set).unwrap_err();
        assert!(matches!(err, GenError::DuplicateDefinition { ref first, ref second, .. }
            if first == "a" && second == "b"));
    }

    #[test]
    fn field_refs_point_back_at_their_message() {
        let message = MessageSchema::new("Process")
            .field(FieldSchema::new("pid", "uint32"))
            .field(FieldSchema::new("binary", "string"));
        let names: Vec<_> = message
            .field_refs()
            .map(|r| format!("{}.{}", r.message.name, r.field.name))
            .collect();
        assert_eq!(names, vec!["Process.pid", "Process.binary"]);
    }
}
