//! Runs the generator over `schemas/` and writes its artifacts to `OUT_DIR`,
//! plus `checks.rs`, which mounts each generated module the way the
//! generated `mod.rs` does.
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use eventcheck_gen::codegen::MOD_ARTIFACT;
use eventcheck_gen::schema::{SchemaFile, SchemaSet};
use eventcheck_gen::{GenConfig, generate};

const SCHEMAS: [&str; 2] = ["schemas/process.json", "schemas/events.json"];

fn main() -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(SCHEMAS.len());
    for schema in SCHEMAS {
        println!("cargo::rerun-if-changed={schema}");
        let file: SchemaFile = eventcheck_gen::path_de::load_json(Path::new(schema))?;
        files.push(file);
    }
    let artifacts = generate(&SchemaSet { files }, &GenConfig::default())?;

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").context("OUT_DIR is not set")?);
    let mut mounts = String::new();
    let mut reexports = String::new();
    for (name, text) in &artifacts {
        let path = out_dir.join(name);
        std::fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        if name == MOD_ARTIFACT {
            continue;
        }
        let module = name.trim_end_matches(".rs");
        writeln!(
            mounts,
            "pub mod {module} {{\n    include!(concat!(env!(\"OUT_DIR\"), \"/{name}\"));\n}}"
        )?;
        writeln!(reexports, "pub use {module}::*;")?;
    }
    let path = out_dir.join("checks.rs");
    std::fs::write(&path, mounts + &reexports)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
