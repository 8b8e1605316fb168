use std::fmt;

use indexmap::IndexSet;

use super::{FieldPlan, Leaf, Writer, derive_line, literal};
use crate::classify::{Cardinality, Primitive};
use crate::config::GenConfig;
use crate::naming;

/// Element type of a repeated field; one list matcher exists per value.
///
/// Wrapper elements fold into their primitive, so `repeated uint32` and
/// `repeated google.protobuf.UInt32Value` share `UInt32ListMatcher`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    Primitive(Primitive),
    Enum(String),
    Message(String),
    Timestamp,
    Duration,
}

impl ElementType {
    pub(crate) fn of(field: &FieldPlan<'_>) -> Option<Self> {
        if field.class.cardinality != Cardinality::List {
            return None;
        }
        let element = match field.leaf {
            Leaf::Exact(primitive) | Leaf::Wrapper(primitive) => Self::Primitive(primitive),
            Leaf::String => Self::Primitive(Primitive::String),
            Leaf::Bytes => Self::Primitive(Primitive::Bytes),
            Leaf::Enum(schema) => Self::Enum(schema.name.clone()),
            Leaf::Message(schema) => Self::Message(schema.name.clone()),
            Leaf::Timestamp => Self::Timestamp,
            Leaf::Duration => Self::Duration,
        };
        Some(element)
    }

    pub fn matcher_name(&self) -> String {
        match self {
            Self::Primitive(primitive) => format!("{}ListMatcher", primitive.camel()),
            Self::Enum(name) | Self::Message(name) => format!("{}ListMatcher", naming::type_base(name)),
            Self::Timestamp => "TimestampListMatcher".to_string(),
            Self::Duration => "DurationListMatcher".to_string(),
        }
    }

    /// Type of one expected element.
    fn checker_type(&self) -> String {
        match self {
            Self::Primitive(Primitive::String) => "StringMatcher".to_string(),
            Self::Primitive(Primitive::Bytes) => "BytesMatcher".to_string(),
            Self::Primitive(primitive) => primitive.rust_type().to_string(),
            Self::Enum(name) | Self::Message(name) => naming::checker_name(name),
            Self::Timestamp => "TimestampMatcher".to_string(),
            Self::Duration => "DurationMatcher".to_string(),
        }
    }

    /// Type of one observed element as stored in the event.
    fn observed_type(&self) -> String {
        match self {
            Self::Primitive(primitive) => primitive.rust_type().to_string(),
            Self::Enum(_) => "i32".to_string(),
            Self::Message(name) => naming::type_path(name),
            Self::Timestamp => "prost_types::Timestamp".to_string(),
            Self::Duration => "prost_types::Duration".to_string(),
        }
    }

    /// Body of the per-element closure, with `check` and `value` bound.
    fn element_check(&self) -> String {
        let label = literal("element");
        match self {
            Self::Primitive(Primitive::String | Primitive::Bytes) => {
                format!("check.check({label}, value)")
            }
            Self::Primitive(_) => format!("check_value({label}, check, value)"),
            Self::Enum(_) => "check.check(*value)".to_string(),
            Self::Message(_) => "check.check(value)".to_string(),
            Self::Timestamp | Self::Duration => format!("check.check({label}, Some(value))"),
        }
    }

    /// Expression turning `value: &observed` into an exact element checker.
    /// Temporal elements have none.
    fn conversion(&self) -> Option<String> {
        let expr = match self {
            Self::Primitive(Primitive::String) => "StringMatcher::full(value.as_str())".to_string(),
            Self::Primitive(Primitive::Bytes) => "BytesMatcher::full(value.clone())".to_string(),
            Self::Primitive(_) => "*value".to_string(),
            Self::Enum(name) => format!("{}::from_value(*value)", naming::checker_name(name)),
            Self::Message(name) => format!("{}::from_value(value)", naming::checker_name(name)),
            Self::Timestamp | Self::Duration => return None,
        };
        Some(expr)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => f.write_str(primitive.rust_type()),
            Self::Enum(name) => write!(f, "enum `{name}`"),
            Self::Message(name) => write!(f, "message `{name}`"),
            Self::Timestamp => f.write_str("Timestamp"),
            Self::Duration => f.write_str("Duration"),
        }
    }
}

/// Which list matchers a run has already emitted.
#[derive(Debug, Default)]
pub struct ListMatcherRegistry {
    emitted: IndexSet<ElementType>,
}

impl ListMatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time `element` is seen; the caller then emits it.
    pub fn claim(&mut self, element: &ElementType) -> bool {
        if self.emitted.contains(element) {
            return false;
        }
        self.emitted.insert(element.clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.emitted.len()
    }
}

pub(super) fn emit(w: &mut Writer, element: &ElementType, config: &GenConfig) {
    let name = element.matcher_name();
    let checker = element.checker_type();
    let observed = element.observed_type();

    w.line(format!("/// Matches a list of `{observed}` with a [`ListOperator`]."));
    w.line(derive_line(config, &["Debug", "Clone", "Default"]));
    if config.derive_serde {
        w.line("#[serde(default)]");
    }
    w.block(format!("pub struct {name}"), |w| {
        w.line("pub operator: ListOperator,");
        w.line(format!("pub values: Vec<{checker}>,"));
    });
    w.blank();
    w.block(format!("impl {name}"), |w| {
        w.block("pub fn new() -> Self", |w| w.line("Self::default()"));
        w.blank();
        w.block("pub fn with_operator(mut self, operator: ListOperator) -> Self", |w| {
            w.line("self.operator = operator;");
            w.line("self");
        });
        w.blank();
        w.block(
            format!("pub fn with_values(mut self, values: impl IntoIterator<Item = {checker}>) -> Self"),
            |w| {
                w.line("self.values = values.into_iter().collect();");
                w.line("self");
            },
        );
        w.blank();
        w.block(
            format!("pub fn check(&self, observed: &[{observed}]) -> Result<(), CheckError>"),
            |w| {
                w.line(format!(
                    "let check = |check: &{checker}, value: &{observed}| {};",
                    element.element_check()
                ));
                let matcher = literal(&name);
                w.block("match self.operator", |w| {
                    for (operator, function) in [
                        ("Ordered", "check_ordered"),
                        ("Unordered", "check_unordered"),
                        ("Subset", "check_subset"),
                    ] {
                        w.line(format!(
                            "ListOperator::{operator} => {function}({matcher}, &self.values, observed, check),"
                        ));
                    }
                });
            },
        );
        if let Some(conversion) = element.conversion() {
            w.blank();
            w.line("/// An `Ordered` matcher accepting exactly `values`.");
            w.block(format!("pub fn from_values(values: &[{observed}]) -> Self"), |w| {
                w.block("Self", |w| {
                    w.line("operator: ListOperator::Ordered,");
                    w.line(format!(
                        "values: values.iter().map(|value| {conversion}).collect(),"
                    ));
                });
            });
        }
    });
}
