use super::{Writer, derive_line, literal};
use crate::config::GenConfig;
use crate::naming;
use crate::schema::EnumSchema;

/// Emit `<Enum>Checker`: a newtype over the raw `i32` an event carries.
///
/// The raw value is kept as-is, so a checker built from an event with a value
/// outside the enum still matches that event. Serialized by value name, or by
/// number for values without one.
pub(super) fn emit(w: &mut Writer, schema: &EnumSchema, config: &GenConfig) {
    let name = naming::checker_name(&schema.name);
    let event_type = naming::type_path(&schema.name);
    let checker = literal(&name);

    w.line(format!("/// Checks a `{event_type}` value."));
    w.line(derive_line(config, &["Debug", "Clone", "Copy", "PartialEq", "Eq"]));
    if config.derive_serde {
        w.line("#[serde(try_from = \"String\", into = \"String\")]");
    }
    w.line(format!("pub struct {name}(i32);"));
    w.blank();
    w.block(format!("impl {name}"), |w| {
        w.block(format!("pub fn new(value: {event_type}) -> Self"), |w| {
            w.line("Self(value as i32)");
        });
        w.blank();
        w.block("pub fn from_value(value: i32) -> Self", |w| w.line("Self(value)"));
        w.blank();
        w.block("pub fn value(&self) -> i32", |w| w.line("self.0"));
        w.blank();
        w.line("/// Value name, or the number for values the enum does not define.");
        w.block("pub fn name(&self) -> String", |w| w.line("Self::describe(self.0)"));
        w.blank();
        w.block("pub fn check(&self, observed: i32) -> Result<(), CheckError>", |w| {
            w.block("if self.0 == observed", |w| w.line("return Ok(());"));
            w.block_with("Err(CheckError::EnumMismatch {", "})", |w| {
                w.line(format!("checker: {checker},"));
                w.line("observed: Self::describe(observed),");
                w.line("expected: self.name(),");
            });
        });
        w.blank();
        w.block("fn describe(value: i32) -> String", |w| {
            w.block(format!("match {event_type}::try_from(value)"), |w| {
                w.line("Ok(known) => known.as_str_name().to_string(),");
                w.line("Err(_) => value.to_string(),");
            });
        });
    });
    w.blank();
    w.block(format!("impl From<{event_type}> for {name}"), |w| {
        w.block(format!("fn from(value: {event_type}) -> Self"), |w| w.line("Self::new(value)"));
    });
    w.blank();
    w.block(format!("impl From<{name}> for String"), |w| {
        w.block(format!("fn from(checker: {name}) -> Self"), |w| w.line("checker.name()"));
    });
    w.blank();
    w.block(format!("impl TryFrom<String> for {name}"), |w| {
        w.line("type Error = String;");
        w.blank();
        w.block("fn try_from(name: String) -> Result<Self, Self::Error>", |w| {
            w.block(format!("if let Some(value) = {event_type}::from_str_name(&name)"), |w| {
                w.line("return Ok(Self::new(value));");
            });
            w.line("name.parse::<i32>()");
            w.line("    .map(Self)");
            w.line(format!(
                "    .map_err(|_| format!(\"unknown {} value {{name:?}}\"))",
                schema.name
            ));
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(config: &GenConfig) -> String {
        let mut w = Writer::new();
        let schema = EnumSchema::new("Action", ["ACTION_UNSPECIFIED", "ACTION_POST"]);
        emit(&mut w, &schema, config);
        w.into_string()
    }

    #[test]
    fn enum_checker_wraps_raw_value() {
        let text = emitted(&GenConfig::default());
        assert!(text.contains("pub struct ActionChecker(i32);"));
        assert!(text.contains("pub fn new(value: api::Action) -> Self {"));
        assert!(text.contains("match api::Action::try_from(value) {"));
        assert!(text.contains("checker: \"ActionChecker\","));
        assert!(text.contains("#[serde(try_from = \"String\", into = \"String\")]"));
    }

    #[test]
    fn serde_attributes_need_serde_derives() {
        let config = GenConfig {
            derive_serde: false,
            ..GenConfig::default()
        };
        let text = emitted(&config);
        assert!(!text.contains("serde"));
        assert!(text.contains("#[derive(Debug, Clone, Copy, PartialEq, Eq)]"));
    }

    #[test]
    fn nested_enums_use_module_paths() {
        let mut w = Writer::new();
        emit(&mut w, &EnumSchema::new("KprobeArgument.Kind", ["KIND_UNSPECIFIED"]), &GenConfig::default());
        let text = w.into_string();
        assert!(text.contains("pub struct KprobeArgumentKindChecker(i32);"));
        assert!(text.contains("api::kprobe_argument::Kind::from_str_name(&name)"));
    }
}
