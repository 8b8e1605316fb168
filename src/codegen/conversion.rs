//! `from_value`: a checker that matches exactly the given event.
//!
//! Timestamp and duration slots are left unset; an exact temporal matcher
//! would only ever match the event it was built from.

use super::checker::Observed;
use super::list_matcher::ElementType;
use super::{FieldPlan, Leaf, MessagePlan, Writer};
use crate::classify::{Cardinality, MapSource};
use crate::naming;

/// Slot value for a singular field, or `None` for temporal kinds.
fn leaf_value(field: &FieldPlan<'_>, observed: &Observed) -> Option<String> {
    let value = match field.leaf {
        Leaf::Exact(_) => format!("Some({})", observed.by_value()),
        Leaf::Wrapper(primitive) => match observed {
            Observed::Field(ident) if primitive.is_copy() => format!("event.{ident}"),
            Observed::Field(ident) => format!("event.{ident}.clone()"),
            Observed::Bound if primitive.is_copy() => "Some(*value)".to_string(),
            Observed::Bound => "Some(value.clone())".to_string(),
        },
        Leaf::String => format!("Some(StringMatcher::full({}.as_str()))", observed.place()),
        Leaf::Bytes => format!("Some(BytesMatcher::full({}.clone()))", observed.place()),
        Leaf::Enum(schema) => format!(
            "Some({}::from_value({}))",
            naming::checker_name(&schema.name),
            observed.by_value()
        ),
        Leaf::Message(schema) => {
            let checker = naming::checker_name(&schema.name);
            match observed {
                Observed::Field(ident) => format!(
                    "event.{ident}.as_ref().map(|value| Box::new({checker}::from_value(value)))"
                ),
                Observed::Bound => format!("Some(Box::new({checker}::from_value(value)))"),
            }
        }
        Leaf::Timestamp | Leaf::Duration => return None,
    };
    Some(value)
}

/// Slot value for a non-oneof field, or `None` when the slot stays unset.
fn field_value(field: &FieldPlan<'_>) -> Option<String> {
    let ident = field.ident();
    match &field.class.cardinality {
        Cardinality::List => {
            let element = ElementType::of(field)?;
            if matches!(element, ElementType::Timestamp | ElementType::Duration) {
                return None;
            }
            Some(format!("Some({}::from_values(&event.{ident}))", element.matcher_name()))
        }
        Cardinality::Map(MapSource::Entries) => Some(format!(
            "Some(event.{ident}.iter().map(|(key, value)| (key.clone(), StringMatcher::full(value.as_str()))).collect())"
        )),
        Cardinality::Map(MapSource::Labels) => Some(format!(
            "Some(label_pairs(&event.{ident}).map(|(key, value)| (key.to_string(), StringMatcher::full(value))).collect())"
        )),
        Cardinality::Singular => leaf_value(field, &Observed::Field(ident)),
        Cardinality::OneofVariant(_) => None,
    }
}

pub(super) fn emit_from_value(w: &mut Writer, message: &MessagePlan<'_>, event_type: &str) {
    let assignments: Vec<(&FieldPlan<'_>, String)> = message
        .fields
        .iter()
        .filter_map(|field| field_value(field).map(|value| (field, value)))
        .collect();
    let groups = message.oneof_groups();

    w.line("/// A checker matching exactly `event`.");
    w.block(format!("pub fn from_value(event: &{event_type}) -> Self"), |w| {
        if assignments.is_empty() && groups.is_empty() {
            w.line("let _ = event;");
            skipped_fields(w, message);
            w.line("Self::new()");
            return;
        }
        w.line("let mut checker = Self::new();");
        for (field, value) in &assignments {
            w.line(format!("checker.{} = {value};", field.ident()));
        }
        skipped_fields(w, message);
        for (group, variants) in &groups {
            let path = naming::oneof_path(&message.schema.name, group);
            w.block(format!("match &event.{}", naming::field_ident(group)), |w| {
                for field in variants {
                    let variant = naming::variant_name(&field.schema.name);
                    match leaf_value(field, &Observed::Bound) {
                        Some(value) => w.line(format!(
                            "Some({path}::{variant}(value)) => checker.{} = {value},",
                            field.ident()
                        )),
                        None => w.line(format!("Some({path}::{variant}(_)) => {{}}")),
                    }
                }
                w.line("None => {}");
            });
        }
        w.line("checker");
    });
}

fn skipped_fields(w: &mut Writer, message: &MessagePlan<'_>) {
    let skipped: Vec<&str> = message
        .fields
        .iter()
        .filter(|field| !matches!(field.class.cardinality, Cardinality::OneofVariant(_)))
        .filter(|field| field_value(field).is_none())
        .map(|field| field.schema.name.as_str())
        .collect();
    if !skipped.is_empty() {
        w.line(format!("// not converted: {}", skipped.join(", ")));
    }
}
