//! Field classifier: raw field descriptor → (kind, cardinality, inner schema).
//!
//! Pure and deterministic. Anything it does not recognize is a
//! [`GenError`]; there is no fallback kind, since a checker that silently
//! ignores a field would look like an enforced constraint.

use std::fmt;

use crate::config::GenConfig;
use crate::error::GenError;
use crate::schema::{EnumSchema, FieldRef, Label, MessageSchema, SchemaIndex};

/// The value types a primitive slot or list element can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Double,
    String,
    Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Double,
    String,
    Bytes,
    Enum,
    Message,
    Timestamp,
    Duration,
    /// `google.protobuf.*Value`: an optional primitive.
    Wrapper(Primitive),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSource {
    /// A real `map<string, string>` field.
    Entries,
    /// An allow-listed repeated string of `key=value` labels.
    Labels,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    List,
    Map(MapSource),
    /// Alternative of the named oneof group.
    OneofVariant(String),
}

#[derive(Debug, Clone, Copy)]
pub enum Inner<'a> {
    Message(&'a MessageSchema),
    Enum(&'a EnumSchema),
}

#[derive(Debug, Clone)]
pub struct Classification<'a> {
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub inner: Option<Inner<'a>>,
    /// Set for boxed primitives: absence is observable and fails a set check.
    pub optional: bool,
}

pub struct Classifier<'a> {
    index: &'a SchemaIndex<'a>,
    config: &'a GenConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(index: &'a SchemaIndex<'a>, config: &'a GenConfig) -> Self {
        Self { index, config }
    }

    pub fn classify(&self, field_ref: FieldRef<'a>) -> Result<Classification<'a>, GenError> {
        let FieldRef { message, field } = field_ref;

        if self.config.is_label_field(&message.name, &field.name) {
            if field.kind != "string" || field.label != Label::Repeated {
                return Err(GenError::UnsupportedMap {
                    message: message.name.clone(),
                    field: field.name.clone(),
                    key: "string".to_string(),
                    value: describe_label_field(&field.kind, field.label),
                });
            }
            return Ok(Classification {
                kind: FieldKind::String,
                cardinality: Cardinality::Map(MapSource::Labels),
                inner: None,
                optional: false,
            });
        }

        if field.kind == "map" {
            let key = field.key.as_deref().unwrap_or("?");
            let value = field.value.as_deref().unwrap_or("?");
            let plain = field.label == Label::Singular && field.oneof.is_none();
            if key != "string" || value != "string" || !plain {
                return Err(GenError::UnsupportedMap {
                    message: message.name.clone(),
                    field: field.name.clone(),
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            return Ok(Classification {
                kind: FieldKind::String,
                cardinality: Cardinality::Map(MapSource::Entries),
                inner: None,
                optional: false,
            });
        }

        let (kind, inner) = self.resolve_kind(field_ref)?;
        let cardinality = match (&field.oneof, field.label) {
            (None, Label::Singular) => Cardinality::Singular,
            (None, Label::Repeated) => Cardinality::List,
            (Some(group), Label::Singular) => Cardinality::OneofVariant(group.clone()),
            (Some(group), Label::Repeated) => {
                return Err(GenError::UnrecognizedKind {
                    message: message.name.clone(),
                    field: field.name.clone(),
                    kind: format!("repeated {} in oneof `{group}`", field.kind),
                });
            }
        };

        Ok(Classification {
            kind,
            cardinality,
            inner,
            optional: matches!(kind, FieldKind::Wrapper(_)),
        })
    }

    fn resolve_kind(&self, field_ref: FieldRef<'a>) -> Result<(FieldKind, Option<Inner<'a>>), GenError> {
        let FieldRef { message, field } = field_ref;
        let kind = match field.kind.as_str() {
            "bool" => FieldKind::Bool,
            "int32" | "sint32" | "sfixed32" => FieldKind::Int32,
            "int64" | "sint64" | "sfixed64" => FieldKind::Int64,
            "uint32" | "fixed32" => FieldKind::UInt32,
            "uint64" | "fixed64" => FieldKind::UInt64,
            "float" => FieldKind::Float,
            "double" => FieldKind::Double,
            "string" => FieldKind::String,
            "bytes" => FieldKind::Bytes,
            "enum" => {
                let type_name = self.type_name(field_ref, "enum")?;
                let schema = self.index.enumeration(type_name).ok_or_else(|| {
                    missing(field_ref, type_name, "enum")
                })?;
                return Ok((FieldKind::Enum, Some(Inner::Enum(schema))));
            }
            "message" => {
                let type_name = self.type_name(field_ref, "message")?;
                if let Some(kind) = well_known(type_name) {
                    return Ok((kind, None));
                }
                let schema = self.index.message(type_name).ok_or_else(|| {
                    missing(field_ref, type_name, "message")
                })?;
                return Ok((FieldKind::Message, Some(Inner::Message(schema))));
            }
            other => {
                return Err(GenError::UnrecognizedKind {
                    message: message.name.clone(),
                    field: field.name.clone(),
                    kind: other.to_string(),
                });
            }
        };
        Ok((kind, None))
    }

    fn type_name(&self, field_ref: FieldRef<'a>, expected: &'static str) -> Result<&'a str, GenError> {
        field_ref
            .field
            .type_name
            .as_deref()
            .map(|name| name.strip_prefix('.').unwrap_or(name))
            .ok_or_else(|| missing(field_ref, "", expected))
    }
}

fn missing(field_ref: FieldRef<'_>, type_name: &str, expected: &'static str) -> GenError {
    GenError::MissingReference {
        message: field_ref.message.name.clone(),
        field: field_ref.field.name.clone(),
        type_name: type_name.to_string(),
        expected,
    }
}

fn well_known(type_name: &str) -> Option<FieldKind> {
    let kind = match type_name {
        "google.protobuf.Timestamp" => FieldKind::Timestamp,
        "google.protobuf.Duration" => FieldKind::Duration,
        "google.protobuf.BoolValue" => FieldKind::Wrapper(Primitive::Bool),
        "google.protobuf.Int32Value" => FieldKind::Wrapper(Primitive::Int32),
        "google.protobuf.Int64Value" => FieldKind::Wrapper(Primitive::Int64),
        "google.protobuf.UInt32Value" => FieldKind::Wrapper(Primitive::UInt32),
        "google.protobuf.UInt64Value" => FieldKind::Wrapper(Primitive::UInt64),
        "google.protobuf.FloatValue" => FieldKind::Wrapper(Primitive::Float),
        "google.protobuf.DoubleValue" => FieldKind::Wrapper(Primitive::Double),
        "google.protobuf.StringValue" => FieldKind::Wrapper(Primitive::String),
        "google.protobuf.BytesValue" => FieldKind::Wrapper(Primitive::Bytes),
        _ => return None,
    };
    Some(kind)
}

fn describe_label_field(kind: &str, label: Label) -> String {
    match label {
        Label::Repeated => format!("repeated {kind}"),
        Label::Singular => kind.to_string(),
    }
}

impl Primitive {
    pub fn rust_type(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int32 => "i32",
            Primitive::Int64 => "i64",
            Primitive::UInt32 => "u32",
            Primitive::UInt64 => "u64",
            Primitive::Float => "f32",
            Primitive::Double => "f64",
            Primitive::String => "String",
            Primitive::Bytes => "Vec<u8>",
        }
    }

    /// Prefix of the list matcher named after this element type.
    pub fn camel(self) -> &'static str {
        match self {
            Primitive::Bool => "Bool",
            Primitive::Int32 => "Int32",
            Primitive::Int64 => "Int64",
            Primitive::UInt32 => "UInt32",
            Primitive::UInt64 => "UInt64",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
            Primitive::String => "String",
            Primitive::Bytes => "Bytes",
        }
    }

    /// Whether values are `Copy` in the generated code.
    pub fn is_copy(self) -> bool {
        !matches!(self, Primitive::String | Primitive::Bytes)
    }
}

impl FieldKind {
    /// The primitive an exact-equality slot holds, if this kind has one.
    pub fn primitive(self) -> Option<Primitive> {
        match self {
            FieldKind::Bool => Some(Primitive::Bool),
            FieldKind::Int32 => Some(Primitive::Int32),
            FieldKind::Int64 => Some(Primitive::Int64),
            FieldKind::UInt32 => Some(Primitive::UInt32),
            FieldKind::UInt64 => Some(Primitive::UInt64),
            FieldKind::Float => Some(Primitive::Float),
            FieldKind::Double => Some(Primitive::Double),
            FieldKind::Wrapper(primitive) => Some(primitive),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Wrapper(primitive) => write!(f, "wrapper({})", primitive.rust_type()),
            other => write!(f, "{}", format!("{other:?}").to_lowercase()),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Singular => write!(f, "singular"),
            Cardinality::List => write!(f, "list"),
            Cardinality::Map(MapSource::Entries) => write!(f, "map<string, string>"),
            Cardinality::Map(MapSource::Labels) => write!(f, "labels (key=value)"),
            Cardinality::OneofVariant(group) => write!(f, "oneof {group}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EnumSchema, FieldSchema, SchemaFile, SchemaSet};

    fn set(fields: Vec<FieldSchema>) -> SchemaSet {
        let mut message = MessageSchema::new("Pod");
        message.fields = fields;
        SchemaSet {
            files: vec![
                SchemaFile::new("test")
                    .message(message)
                    .message(MessageSchema::new("Container"))
                    .enumeration(EnumSchema::new("Action", ["ACTION_UNSPECIFIED"])),
            ],
        }
    }

    fn classify_all(fields: Vec<FieldSchema>) -> Result<Vec<(FieldKind, Cardinality, bool)>, GenError> {
        let set = set(fields);
        let index = SchemaIndex::build(&set)?;
        let config = GenConfig::default();
        let classifier = Classifier::new(&index, &config);
        let index_message = index.message("Pod").unwrap();
        index_message
            .field_refs()
            .map(|r| classifier.classify(r).map(|c| (c.kind, c.cardinality, c.optional)))
            .collect()
    }

    fn one(field: FieldSchema) -> Result<(FieldKind, Cardinality, bool), GenError> {
        classify_all(vec![field]).map(|mut all| all.remove(0))
    }

    #[test]
    fn primitive_kinds_fold_encodings() {
        let kinds = classify_all(vec![
            FieldSchema::new("a", "sint32"),
            FieldSchema::new("b", "fixed64"),
            FieldSchema::new("c", "sfixed64"),
            FieldSchema::new("d", "double"),
        ])
        .unwrap();
        let kinds: Vec<_> = kinds.into_iter().map(|(k, _, _)| k).collect();
        assert_eq!(
            kinds,
            vec![FieldKind::Int32, FieldKind::UInt64, FieldKind::Int64, FieldKind::Double]
        );
    }

    #[test]
    fn wrappers_collapse_to_optional_primitive() {
        let (kind, cardinality, optional) =
            one(FieldSchema::message("uid", "google.protobuf.UInt32Value")).unwrap();
        assert_eq!(kind, FieldKind::Wrapper(Primitive::UInt32));
        assert_eq!(cardinality, Cardinality::Singular);
        assert!(optional);
    }

    #[test]
    fn temporal_well_known_types() {
        let (kind, _, optional) = one(FieldSchema::message("start", ".google.protobuf.Timestamp")).unwrap();
        assert_eq!(kind, FieldKind::Timestamp);
        assert!(!optional);
        let (kind, _, _) = one(FieldSchema::message("took", "google.protobuf.Duration")).unwrap();
        assert_eq!(kind, FieldKind::Duration);
    }

    #[test]
    fn references_resolve() {
        let set = set(vec![
            FieldSchema::message("container", "Container"),
            FieldSchema::enumeration("action", "Action").repeated(),
        ]);
        let index = SchemaIndex::build(&set).unwrap();
        let config = GenConfig::default();
        let classifier = Classifier::new(&index, &config);
        let pod = index.message("Pod").unwrap();
        let classes: Vec<_> = pod.field_refs().map(|r| classifier.classify(r).unwrap()).collect();
        assert!(matches!(classes[0].inner, Some(Inner::Message(m)) if m.name == "Container"));
        assert!(matches!(classes[1].inner, Some(Inner::Enum(e)) if e.name == "Action"));
        assert_eq!(classes[1].cardinality, Cardinality::List);
    }

    #[test]
    fn oneof_alternatives_keep_their_kind() {
        let (kind, cardinality, _) =
            one(FieldSchema::message("container", "Container").oneof("workload")).unwrap();
        assert_eq!(kind, FieldKind::Message);
        assert_eq!(cardinality, Cardinality::OneofVariant("workload".to_string()));
    }

    #[test]
    fn string_maps_are_accepted() {
        let (kind, cardinality, _) = one(FieldSchema::map("annotations", "string", "string")).unwrap();
        assert_eq!(kind, FieldKind::String);
        assert_eq!(cardinality, Cardinality::Map(MapSource::Entries));
    }

    #[test]
    fn non_string_maps_abort() {
        let err = one(FieldSchema::map("ports", "string", "uint32")).unwrap_err();
        assert!(matches!(err, GenError::UnsupportedMap { ref value, .. } if value == "uint32"));
        let err = one(FieldSchema::map("ports", "int64", "string")).unwrap_err();
        assert!(matches!(err, GenError::UnsupportedMap { ref key, .. } if key == "int64"));
    }

    #[test]
    fn repeated_or_oneof_maps_abort() {
        let err = one(FieldSchema::map("annotations", "string", "string").repeated()).unwrap_err();
        assert!(matches!(err, GenError::UnsupportedMap { ref field, .. } if field == "annotations"));
        let err = one(FieldSchema::map("annotations", "string", "string").oneof("meta")).unwrap_err();
        assert!(matches!(err, GenError::UnsupportedMap { .. }));
    }

    #[test]
    fn allow_listed_labels_become_a_map() {
        let (kind, cardinality, _) = one(FieldSchema::new("labels", "string").repeated()).unwrap();
        assert_eq!(kind, FieldKind::String);
        assert_eq!(cardinality, Cardinality::Map(MapSource::Labels));
    }

    #[test]
    fn labels_are_never_inferred() {
        let set = SchemaSet {
            files: vec![SchemaFile::new("t").message(
                MessageSchema::new("Container").field(FieldSchema::new("labels", "string").repeated()),
            )],
        };
        let index = SchemaIndex::build(&set).unwrap();
        let config = GenConfig::default();
        let classifier = Classifier::new(&index, &config);
        let container = index.message("Container").unwrap();
        let class = classifier.classify(container.field_refs().next().unwrap()).unwrap();
        assert_eq!(class.cardinality, Cardinality::List);
    }

    #[test]
    fn allow_listed_field_with_wrong_shape_aborts() {
        let err = one(FieldSchema::new("labels", "string")).unwrap_err();
        assert!(matches!(err, GenError::UnsupportedMap { .. }));
    }

    #[test]
    fn unknown_kinds_abort() {
        let err = one(FieldSchema::new("weird", "group")).unwrap_err();
        assert!(matches!(err, GenError::UnrecognizedKind { ref kind, .. } if kind == "group"));
    }

    #[test]
    fn missing_references_abort() {
        let err = one(FieldSchema::message("node", "Node")).unwrap_err();
        assert!(matches!(err, GenError::MissingReference { ref type_name, .. } if type_name == "Node"));
        // an enum name used as a message is just as missing
        let err = one(FieldSchema::message("action", "Action")).unwrap_err();
        assert!(matches!(err, GenError::MissingReference { expected: "message", .. }));
        let err = one(FieldSchema::new("action", "enum")).unwrap_err();
        assert!(matches!(err, GenError::MissingReference { expected: "enum", .. }));
    }

    #[test]
    fn classification_is_deterministic() {
        let fields = vec![
            FieldSchema::new("name", "string"),
            FieldSchema::message("container", "Container").oneof("w"),
            FieldSchema::new("labels", "string").repeated(),
        ];
        assert_eq!(
            format!("{:?}", classify_all(fields.clone()).unwrap()),
            format!("{:?}", classify_all(fields).unwrap())
        );
    }
}
