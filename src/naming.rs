//! Rust identifiers for schema names, following prost's conventions so the
//! generated code lines up with prost-generated event types.
use std::collections::HashSet;

use once_cell::sync::Lazy;

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
        "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move",
        "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type",
        "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
        "override", "priv", "typeof", "unsized", "virtual", "yield",
    ]
    .into_iter()
    .collect()
});

// Keywords that cannot be raw identifiers; prost appends `_` instead.
const NON_RAW_KEYWORDS: [&str; 4] = ["self", "super", "crate", "Self"];

pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `process_exec` → `ProcessExec`; already-camel names pass through.
pub fn upper_camel(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Struct field identifier for a schema field name.
pub fn field_ident(name: &str) -> String {
    let ident = snake_case(name);
    if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if KEYWORDS.contains(ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// Method-name fragment for a field: never raw.
pub fn method_stem(name: &str) -> String {
    snake_case(name)
}

/// `Outer.Inner` → `OuterInner`.
pub fn type_base(name: &str) -> String {
    name.split('.').map(upper_camel).collect()
}

pub fn checker_name(name: &str) -> String {
    format!("{}Checker", type_base(name))
}

/// Path of an event type below the `api` alias: `Outer.Inner` → `api::outer::Inner`.
pub fn type_path(name: &str) -> String {
    let mut parents: Vec<&str> = name.split('.').collect();
    let last = parents.pop().unwrap_or(name);
    let mut path = String::from("api::");
    for parent in parents {
        path.push_str(&field_ident(parent));
        path.push_str("::");
    }
    path.push_str(&upper_camel(last));
    path
}

/// Path of the enum prost generates for a oneof group of `message`.
pub fn oneof_path(message: &str, group: &str) -> String {
    let mut path = String::from("api::");
    for segment in message.split('.') {
        path.push_str(&field_ident(segment));
        path.push_str("::");
    }
    path.push_str(&upper_camel(group));
    path
}

pub fn variant_name(field: &str) -> String {
    upper_camel(field)
}

/// Module name for an artifact produced from an input grouping.
pub fn module_name(file: &str) -> String {
    let stem = file.rsplit('/').next().unwrap_or(file);
    let stem = stem.strip_suffix(".json").unwrap_or(stem);
    let mut ident = snake_case(stem);
    if ident.is_empty() {
        ident.push_str("schema");
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(ident.as_str()) || NON_RAW_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}
