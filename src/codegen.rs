//! Checker code generation: SchemaSet → Rust source artifacts.
//!
//! A run classifies every field of every message up front, so a schema the
//! classifier rejects produces no output at all. Emission then walks files,
//! definitions and fields in declaration order; list matchers are emitted
//! into the artifact whose message first needs them. Identical input yields
//! byte-identical artifacts.

mod checker;
mod conversion;
mod enums;
mod list_matcher;
mod writer;

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info};

pub use list_matcher::{ElementType, ListMatcherRegistry};
pub use writer::Writer;

use crate::classify::{Cardinality, Classification, Classifier, FieldKind, Inner, Primitive};
use crate::config::GenConfig;
use crate::error::GenError;
use crate::naming;
use crate::schema::{Definition, EnumSchema, FieldSchema, MessageSchema, SchemaIndex, SchemaSet};

/// Artifact name (`<module>.rs`, `mod.rs`) → generated Rust text, in output order.
pub type Artifacts = IndexMap<String, String>;

pub const MOD_ARTIFACT: &str = "mod.rs";

// ————————————————————————————————————————————————————————————————————————————
// PLAN
// ————————————————————————————————————————————————————————————————————————————

pub(crate) struct FieldPlan<'a> {
    pub schema: &'a FieldSchema,
    pub class: Classification<'a>,
    pub leaf: Leaf<'a>,
}

/// What a single value of a field is checked with, references resolved.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Leaf<'a> {
    Exact(Primitive),
    Wrapper(Primitive),
    String,
    Bytes,
    Enum(&'a EnumSchema),
    Message(&'a MessageSchema),
    Timestamp,
    Duration,
}

impl<'a> Leaf<'a> {
    /// `None` for an enum or message kind whose reference did not resolve.
    fn of(class: &Classification<'a>) -> Option<Self> {
        let leaf = match (class.kind, class.inner) {
            (FieldKind::Enum, Some(Inner::Enum(schema))) => Leaf::Enum(schema),
            (FieldKind::Message, Some(Inner::Message(schema))) => Leaf::Message(schema),
            (FieldKind::Enum | FieldKind::Message, _) => return None,
            (FieldKind::String, _) => Leaf::String,
            (FieldKind::Bytes, _) => Leaf::Bytes,
            (FieldKind::Timestamp, _) => Leaf::Timestamp,
            (FieldKind::Duration, _) => Leaf::Duration,
            (FieldKind::Wrapper(primitive), _) => Leaf::Wrapper(primitive),
            (kind, _) => Leaf::Exact(kind.primitive()?),
        };
        Some(leaf)
    }
}

impl FieldPlan<'_> {
    pub fn ident(&self) -> String {
        naming::field_ident(&self.schema.name)
    }

    pub fn label(&self) -> String {
        literal(&self.schema.name)
    }
}

pub(crate) struct MessagePlan<'a> {
    pub schema: &'a MessageSchema,
    pub fields: Vec<FieldPlan<'a>>,
}

enum PlanItem<'a> {
    Message(MessagePlan<'a>),
    Enum(&'a EnumSchema),
}

struct FilePlan<'a> {
    source: &'a str,
    module: String,
    items: Vec<PlanItem<'a>>,
}

impl<'a> MessagePlan<'a> {
    pub fn checker_name(&self) -> String {
        naming::checker_name(&self.schema.name)
    }

    pub fn type_path(&self) -> String {
        naming::type_path(&self.schema.name)
    }

    /// Oneof groups in order of first appearance, with their alternatives.
    pub fn oneof_groups(&self) -> IndexMap<&str, Vec<&FieldPlan<'a>>> {
        let mut groups: IndexMap<&str, Vec<&FieldPlan<'a>>> = IndexMap::new();
        for field in &self.fields {
            if let Cardinality::OneofVariant(group) = &field.class.cardinality {
                groups.entry(group.as_str()).or_default().push(field);
            }
        }
        groups
    }

    /// Element types of the list fields, in declaration order.
    fn list_elements(&self) -> impl Iterator<Item = ElementType> + '_ {
        self.fields.iter().filter_map(ElementType::of)
    }
}

/// What a generated type is defined for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Definition(String),
    List(ElementType),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Definition(name) => write!(f, "`{name}`"),
            Origin::List(element) => write!(f, "lists of {element}"),
        }
    }
}

/// Generated type names of one run. Distinct schema names can flatten to
/// the same identifier (`Foo.Bar` and `FooBar`, a message named `String`
/// and `repeated string`); every name must have exactly one origin.
#[derive(Default)]
struct Identifiers {
    claimed: IndexMap<String, Origin>,
}

impl Identifiers {
    fn claim(&mut self, identifier: String, origin: Origin) -> Result<(), GenError> {
        match self.claimed.entry(identifier) {
            Entry::Occupied(entry) if *entry.get() == origin => Ok(()),
            Entry::Occupied(entry) => Err(GenError::IdentifierCollision {
                identifier: entry.key().clone(),
                first: entry.get().to_string(),
                second: origin.to_string(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(origin);
                Ok(())
            }
        }
    }
}

fn plan<'a>(set: &'a SchemaSet, classifier: &Classifier<'a>) -> Result<Vec<FilePlan<'a>>, GenError> {
    let mut identifiers = Identifiers::default();
    let mut modules: IndexMap<String, usize> = IndexMap::new();
    let mut files = Vec::with_capacity(set.files.len());
    for file in &set.files {
        let mut module = naming::module_name(&file.name);
        let seen = modules.entry(module.clone()).or_insert(0);
        *seen += 1;
        if *seen > 1 {
            module = format!("{module}_{seen}");
        }

        let mut items = Vec::with_capacity(file.definitions.len());
        for definition in &file.definitions {
            identifiers.claim(
                naming::checker_name(definition.name()),
                Origin::Definition(definition.name().to_string()),
            )?;
            match definition {
                Definition::Enum(schema) => items.push(PlanItem::Enum(schema)),
                Definition::Message(schema) => {
                    let fields = schema
                        .field_refs()
                        .map(|field_ref| -> Result<FieldPlan<'a>, GenError> {
                            let class = classifier.classify(field_ref)?;
                            let leaf = Leaf::of(&class).ok_or_else(|| GenError::MissingReference {
                                message: schema.name.clone(),
                                field: field_ref.field.name.clone(),
                                type_name: field_ref.field.type_name.clone().unwrap_or_default(),
                                expected: "message or enum",
                            })?;
                            Ok(FieldPlan {
                                schema: field_ref.field,
                                class,
                                leaf,
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    let message = MessagePlan { schema, fields };
                    for element in message.list_elements() {
                        identifiers.claim(element.matcher_name(), Origin::List(element))?;
                    }
                    items.push(PlanItem::Message(message));
                }
            }
        }
        files.push(FilePlan {
            source: &file.name,
            module,
            items,
        });
    }
    Ok(files)
}

// ————————————————————————————————————————————————————————————————————————————
// GENERATION
// ————————————————————————————————————————————————————————————————————————————

/// One generation run. Owns the list-matcher registry, so nothing is
/// shared between runs.
pub struct Codegen<'c> {
    config: &'c GenConfig,
    registry: ListMatcherRegistry,
}

impl<'c> Codegen<'c> {
    pub fn new(config: &'c GenConfig) -> Self {
        Self {
            config,
            registry: ListMatcherRegistry::new(),
        }
    }

    pub fn run(mut self, set: &SchemaSet) -> Result<Artifacts, GenError> {
        let index = SchemaIndex::build(set)?;
        let classifier = Classifier::new(&index, self.config);
        let files = plan(set, &classifier)?;

        let mut artifacts = Artifacts::new();
        for file in &files {
            let text = self.emit_file(file);
            let name = format!("{}.rs", file.module);
            info!(artifact = %name, source = file.source, bytes = text.len(), "generated artifact");
            artifacts.insert(name, text);
        }
        artifacts.insert(MOD_ARTIFACT.to_string(), emit_mod(&files));

        info!(
            artifacts = artifacts.len(),
            definitions = index.len(),
            list_matchers = self.registry.len(),
            "generation finished"
        );
        Ok(artifacts)
    }

    fn emit_file(&mut self, file: &FilePlan<'_>) -> String {
        let mut w = Writer::new();
        emit_header(&mut w, file.source, self.config);
        for item in &file.items {
            w.blank();
            match item {
                PlanItem::Enum(schema) => {
                    enums::emit(&mut w, schema, self.config);
                    debug!(checker = %naming::checker_name(&schema.name), "emitted enum checker");
                }
                PlanItem::Message(message) => {
                    checker::emit(&mut w, message, self.config);
                    debug!(
                        checker = %message.checker_name(),
                        fields = message.fields.len(),
                        "emitted checker"
                    );
                    for element in message.list_elements() {
                        if self.registry.claim(&element) {
                            w.blank();
                            list_matcher::emit(&mut w, &element, self.config);
                            debug!(matcher = %element.matcher_name(), "emitted list matcher");
                        }
                    }
                }
            }
        }
        w.into_string()
    }
}

/// Generate every artifact for `set`.
pub fn generate(set: &SchemaSet, config: &GenConfig) -> Result<Artifacts, GenError> {
    Codegen::new(config).run(set)
}

const GENERATED_NOTICE: &str = "// Code generated by eventcheck-gen. DO NOT EDIT.";

fn emit_header(w: &mut Writer, source: &str, config: &GenConfig) {
    w.line(GENERATED_NOTICE);
    w.line(format!("// source: {source}"));
    w.blank();
    w.line("#[allow(unused_imports)]");
    w.line("use super::*;");
    w.line("#[allow(unused_imports)]");
    w.line("use std::collections::BTreeMap;");
    w.line("#[allow(unused_imports)]");
    w.line(format!("use {}::prelude::*;", config.runtime_crate));
    if config.types_path == "api" || config.types_path.ends_with("::api") {
        w.line(format!("use {};", config.types_path));
    } else {
        w.line(format!("use {} as api;", config.types_path));
    }
}

fn emit_mod(files: &[FilePlan<'_>]) -> String {
    let mut w = Writer::new();
    w.line(GENERATED_NOTICE);
    w.blank();
    for file in files {
        w.line(format!("mod {};", file.module));
    }
    w.blank();
    for file in files {
        w.line(format!("pub use {}::*;", file.module));
    }
    w.into_string()
}

/// `#[derive(..)]` line, plus the serde derives when enabled.
pub(crate) fn derive_line(config: &GenConfig, traits: &[&str]) -> String {
    let mut traits = traits.to_vec();
    if config.derive_serde {
        traits.extend(["serde::Serialize", "serde::Deserialize"]);
    }
    format!("#[derive({})]", traits.join(", "))
}

/// A Rust string literal for `text`.
pub(crate) fn literal(text: &str) -> String {
    format!("{text:?}")
}
