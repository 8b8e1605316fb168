//! Per-message checker: struct of optional match-slots, builders, `check`.

use super::list_matcher::ElementType;
use super::{FieldPlan, Leaf, MessagePlan, Writer, conversion, derive_line, literal};
use crate::classify::{Cardinality, MapSource};
use crate::config::GenConfig;
use crate::naming;

/// Where a field's observed value comes from in generated code.
pub(super) enum Observed {
    /// A direct field of the event: `event.<ident>`.
    Field(String),
    /// The payload bound by a oneof arm: `value`, already a reference.
    Bound,
}

impl Observed {
    pub fn by_ref(&self) -> String {
        match self {
            Self::Field(ident) => format!("&event.{ident}"),
            Self::Bound => "value".to_string(),
        }
    }

    pub fn by_value(&self) -> String {
        match self {
            Self::Field(ident) => format!("event.{ident}"),
            Self::Bound => "*value".to_string(),
        }
    }

    /// The value as a place expression, for method calls.
    pub fn place(&self) -> String {
        match self {
            Self::Field(ident) => format!("event.{ident}"),
            Self::Bound => "value".to_string(),
        }
    }

    /// `Option<&T>` of the observed value.
    pub fn optional_ref(&self) -> String {
        match self {
            Self::Field(ident) => format!("event.{ident}.as_ref()"),
            Self::Bound => "Some(value)".to_string(),
        }
    }
}

/// Type held by a field's match-slot (inside the `Option`).
pub(super) fn slot_type(field: &FieldPlan<'_>) -> String {
    if let Some(element) = ElementType::of(field) {
        return element.matcher_name();
    }
    if let Cardinality::Map(_) = field.class.cardinality {
        return "BTreeMap<String, StringMatcher>".to_string();
    }
    match field.leaf {
        Leaf::Exact(primitive) | Leaf::Wrapper(primitive) => primitive.rust_type().to_string(),
        Leaf::String => "StringMatcher".to_string(),
        Leaf::Bytes => "BytesMatcher".to_string(),
        Leaf::Enum(schema) => naming::checker_name(&schema.name),
        Leaf::Message(schema) => format!("Box<{}>", naming::checker_name(&schema.name)),
        Leaf::Timestamp => "TimestampMatcher".to_string(),
        Leaf::Duration => "DurationMatcher".to_string(),
    }
}

/// Argument type of the field's builder; messages are boxed by the builder.
fn builder_type(field: &FieldPlan<'_>) -> String {
    match (&field.class.cardinality, field.leaf) {
        (Cardinality::Singular | Cardinality::OneofVariant(_), Leaf::Message(schema)) => {
            naming::checker_name(&schema.name)
        }
        _ => slot_type(field),
    }
}

/// Check expression for a singular value, yielding `Result<(), CheckError>`.
/// `check` is bound to a reference to the slot's content.
fn leaf_check(field: &FieldPlan<'_>, observed: &Observed) -> String {
    let label = field.label();
    let nested = format!(".map_err(|err| CheckError::nested({label}, err))");
    match field.leaf {
        Leaf::Exact(_) => format!("check_value({label}, check, {})", observed.by_ref()),
        Leaf::Wrapper(_) => format!("check_wrapper({label}, check, {})", observed.optional_ref()),
        Leaf::String | Leaf::Bytes => format!("check.check({label}, {})", observed.by_ref()),
        Leaf::Enum(_) => format!("check.check({}){nested}", observed.by_value()),
        Leaf::Message(_) => format!("check.check({}){nested}", observed.by_ref()),
        Leaf::Timestamp | Leaf::Duration => {
            format!("check.check({label}, {})", observed.optional_ref())
        }
    }
}

pub(super) fn emit(w: &mut Writer, message: &MessagePlan<'_>, config: &GenConfig) {
    let name = message.checker_name();
    let event_type = message.type_path();

    if message.fields.is_empty() {
        w.line(format!("/// Checks `{event_type}` events. The message has no fields to constrain."));
    } else {
        w.line(format!("/// Checks `{event_type}` events."));
        w.line("///");
        w.line("/// Unset slots match anything; set slots are checked in declaration order");
        w.line("/// and the first failure is returned.");
    }
    w.line(derive_line(config, &["Debug", "Clone", "Default"]));
    if config.derive_serde {
        w.line("#[serde(default)]");
    }
    w.block(format!("pub struct {name}"), |w| {
        for field in &message.fields {
            if config.derive_serde {
                w.line(serde_field_attr(field));
            }
            w.line(format!("pub {}: Option<{}>,", field.ident(), slot_type(field)));
        }
    });
    w.blank();
    w.block(format!("impl {name}"), |w| {
        w.block("pub fn new() -> Self", |w| w.line("Self::default()"));
        for field in &message.fields {
            w.blank();
            emit_builder(w, field);
        }
        w.blank();
        emit_check(w, message, &name, &event_type);
        w.blank();
        conversion::emit_from_value(w, message, &event_type);
        for (group, variants) in message.oneof_groups() {
            w.blank();
            emit_variant_name(w, message, group, &variants);
        }
    });
}

fn serde_field_attr(field: &FieldPlan<'_>) -> String {
    let ident = field.ident();
    let serialized = ident.strip_prefix("r#").unwrap_or(&ident);
    if serialized == field.schema.name {
        "#[serde(skip_serializing_if = \"Option::is_none\")]".to_string()
    } else {
        format!(
            "#[serde(rename = {}, skip_serializing_if = \"Option::is_none\")]",
            field.label()
        )
    }
}

fn emit_builder(w: &mut Writer, field: &FieldPlan<'_>) {
    let ident = field.ident();
    let stem = naming::method_stem(&field.schema.name);
    let argument = builder_type(field);
    let value = if argument == slot_type(field) {
        "check".to_string()
    } else {
        "Box::new(check)".to_string()
    };
    w.block(format!("pub fn with_{stem}(mut self, check: {argument}) -> Self"), |w| {
        w.line(format!("self.{ident} = Some({value});"));
        w.line("self");
    });
}

fn emit_check(w: &mut Writer, message: &MessagePlan<'_>, name: &str, event_type: &str) {
    w.block(
        format!("pub fn check(&self, event: &{event_type}) -> Result<(), CheckError>"),
        |w| {
            if message.fields.is_empty() {
                w.line("let _ = event;");
            }
            for field in &message.fields {
                w.block(format!("if let Some(check) = &self.{}", field.ident()), |w| {
                    emit_field_check(w, message, field, name);
                });
            }
            w.line("Ok(())");
        },
    );
}

fn emit_field_check(w: &mut Writer, message: &MessagePlan<'_>, field: &FieldPlan<'_>, checker: &str) {
    let label = field.label();
    let ident = field.ident();
    match &field.class.cardinality {
        Cardinality::List => {
            w.line(format!(
                "check.check(&event.{ident}).map_err(|err| CheckError::nested({label}, err))?;"
            ));
        }
        Cardinality::Map(MapSource::Entries) => {
            w.line(format!("check_map({label}, check, &event.{ident})?;"));
        }
        Cardinality::Map(MapSource::Labels) => {
            w.line(format!(
                "check_labels({}, {label}, check, &event.{ident})?;",
                literal(checker)
            ));
        }
        Cardinality::Singular => match field.leaf {
            Leaf::Message(schema) => {
                let expected = literal(&naming::checker_name(&schema.name));
                w.block(format!("match event.{ident}.as_ref()"), |w| {
                    w.line(format!(
                        "Some(value) => {}?,",
                        leaf_check(field, &Observed::Bound)
                    ));
                    w.line(format!("None => return Err(CheckError::absent({label}, {expected})),"));
                });
            }
            _ => {
                w.line(format!("{}?;", leaf_check(field, &Observed::Field(ident))));
            }
        },
        Cardinality::OneofVariant(group) => {
            let path = naming::oneof_path(&message.schema.name, group);
            let variant = naming::variant_name(&field.schema.name);
            let helper = variant_helper(group);
            w.block(format!("match &event.{}", naming::field_ident(group)), |w| {
                w.line(format!(
                    "Some({path}::{variant}(value)) => {}?,",
                    leaf_check(field, &Observed::Bound)
                ));
                w.block("other =>", |w| {
                    w.block_with("return Err(CheckError::wrong_variant(", "));", |w| {
                        w.line(format!("{},", literal(checker)));
                        w.line(format!("{label},"));
                        w.line(format!("{},", literal(&variant)));
                        w.line(format!("Self::{helper}(other),"));
                    });
                });
            });
        }
    }
}

fn variant_helper(group: &str) -> String {
    format!("{}_variant", naming::method_stem(group))
}

/// Name of the observed variant of a oneof group, `"none"` if unset.
fn emit_variant_name(w: &mut Writer, message: &MessagePlan<'_>, group: &str, variants: &[&FieldPlan<'_>]) {
    let path = naming::oneof_path(&message.schema.name, group);
    w.block(
        format!(
            "fn {}(value: &Option<{path}>) -> &'static str",
            variant_helper(group)
        ),
        |w| {
            w.block("match value", |w| {
                for field in variants {
                    let variant = naming::variant_name(&field.schema.name);
                    w.line(format!("Some({path}::{variant}(_)) => {},", literal(&variant)));
                }
                w.line("None => \"none\",");
            });
        },
    );
}

#[cfg(test)]
mod tests {
    use crate::codegen::generate;
    use crate::config::GenConfig;
    use crate::fixtures;

    fn process_rs() -> String {
        let artifacts = generate(&fixtures::events(), &GenConfig::default()).unwrap();
        artifacts["process.rs"].clone()
    }

    fn events_rs() -> String {
        let artifacts = generate(&fixtures::events(), &GenConfig::default()).unwrap();
        artifacts["events.rs"].clone()
    }

    #[test]
    fn slots_are_optional() {
        let text = process_rs();
        assert!(text.contains("pub struct ProcessChecker {"));
        assert!(text.contains("pub pid: Option<u32>,"));
        assert!(text.contains("pub binary: Option<StringMatcher>,"));
        assert!(text.contains("pub arguments: Option<StringListMatcher>,"));
        assert!(text.contains("pub parent: Option<Box<ProcessChecker>>,"));
        assert!(text.contains("pub start_time: Option<TimestampMatcher>,"));
        assert!(text.contains("pub labels: Option<BTreeMap<String, StringMatcher>>,"));
        assert!(text.contains("pub r#type: Option<ActionChecker>,"));
    }

    #[test]
    fn builders_consume_and_return_self() {
        let text = process_rs();
        assert!(text.contains("pub fn with_pid(mut self, check: u32) -> Self {"));
        assert!(text.contains("pub fn with_parent(mut self, check: ProcessChecker) -> Self {"));
        assert!(text.contains("self.parent = Some(Box::new(check));"));
        assert!(text.contains("pub fn with_type(mut self, check: ActionChecker) -> Self {"));
    }

    #[test]
    fn primitive_and_wrapper_checks() {
        let text = process_rs();
        assert!(text.contains("check_wrapper(\"pid\", check, event.pid.as_ref())?;"));
        assert!(text.contains("check_value(\"refcnt\", check, &event.refcnt)?;"));
        assert!(text.contains("check.check(\"binary\", &event.binary)?;"));
        assert!(text.contains("check.check(\"start_time\", event.start_time.as_ref())?;"));
    }

    #[test]
    fn absent_nested_message_fails() {
        let text = process_rs();
        assert!(text.contains("match event.parent.as_ref() {"));
        assert!(text.contains(
            "Some(value) => check.check(value).map_err(|err| CheckError::nested(\"parent\", err))?,"
        ));
        assert!(text.contains("None => return Err(CheckError::absent(\"parent\", \"ProcessChecker\")),"));
    }

    #[test]
    fn maps_and_labels() {
        let text = process_rs();
        assert!(text.contains("check_map(\"annotations\", check, &event.annotations)?;"));
        assert!(text.contains("check_labels(\"PodChecker\", \"labels\", check, &event.labels)?;"));
    }

    #[test]
    fn oneof_dispatch_reports_wrong_variant() {
        let text = events_rs();
        assert!(text.contains("pub process_exec: Option<Box<ProcessExecChecker>>,"));
        assert!(text.contains("match &event.event {"));
        assert!(text.contains(
            "Some(api::get_events_response::Event::ProcessExec(value)) => check.check(value).map_err(|err| CheckError::nested(\"process_exec\", err))?,"
        ));
        assert!(text.contains("Self::event_variant(other),"));
        assert!(text.contains(
            "fn event_variant(value: &Option<api::get_events_response::Event>) -> &'static str {"
        ));
        assert!(text.contains("Some(api::get_events_response::Event::ProcessKprobe(_)) => \"ProcessKprobe\","));
        assert!(text.contains("None => \"none\","));
    }

    #[test]
    fn enum_fields_nest_their_errors() {
        let text = events_rs();
        assert!(text.contains("check.check(event.action).map_err(|err| CheckError::nested(\"action\", err))?;"));
    }

    #[test]
    fn keyword_fields_are_renamed_for_serde() {
        let text = process_rs();
        assert!(text.contains("#[serde(skip_serializing_if = \"Option::is_none\")]\n    pub pid"));
        // `r#type` already serializes as "type"
        assert!(text.contains("#[serde(skip_serializing_if = \"Option::is_none\")]\n    pub r#type"));
    }

    #[test]
    fn empty_messages_still_check() {
        let text = events_rs();
        assert!(text.contains("pub struct ProcessLoaderChecker {\n}"));
        assert!(text.contains("let _ = event;"));
    }
}
