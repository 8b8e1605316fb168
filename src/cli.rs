//! CLI: schema files → (checker modules | classification view)
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use crate::classify::Classifier;
use crate::config::GenConfig;
use crate::schema::{Definition, SchemaFile, SchemaIndex, SchemaSet};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate structural checkers for prost event types from message schemas
#[derive(Parser, Debug)]
#[command(name = "eventcheck-gen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate one checker module per schema file, plus `mod.rs`
    Generate(GenerateOut),
    /// print the classification of every field (debug view)
    Classify(ClassifyOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more schema files (JSON). May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// generator configuration file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// crate the generated code imports matchers from
    #[arg(long)]
    runtime_crate: Option<String>,

    /// module path of the prost event types, imported as `api`
    #[arg(long)]
    types_path: Option<String>,

    /// do not derive serde on generated types
    #[arg(long, default_value_t = false)]
    no_serde: bool,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output directory (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ClassifyOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> anyhow::Result<GenConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => GenConfig::load(path)?,
            None => GenConfig::default(),
        };
        if let Some(runtime_crate) = self.runtime_crate.as_ref() {
            config.runtime_crate = runtime_crate.clone();
        }
        if let Some(types_path) = self.types_path.as_ref() {
            config.types_path = types_path.clone();
        }
        if self.no_serde {
            config.derive_serde = false;
        }
        debug!(?config, "resolved configuration");
        Ok(config)
    }

    fn load_schema_set(&self) -> anyhow::Result<SchemaSet> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut files = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let mut file: SchemaFile = crate::path_de::load_json(&source_path)?;
            if file.name.is_empty() {
                file.name = file_stem(&source_path);
            }
            debug!(path = %source_path.display(), definitions = file.definitions.len(), "loaded schema file");
            files.push(file);
        }
        Ok(SchemaSet { files })
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                let config = target.input_settings.load_config()?;
                let set = target.input_settings.load_schema_set()?;
                let artifacts = crate::codegen::generate(&set, &config)?;

                if let Some(out) = target.out.as_ref() {
                    std::fs::create_dir_all(out)
                        .with_context(|| format!("failed to create {}", out.display()))?;
                    for (name, text) in &artifacts {
                        let path = out.join(name);
                        std::fs::write(&path, text)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        eprintln!("{} {}", "wrote".green().bold(), path.display());
                    }
                } else {
                    for (name, text) in &artifacts {
                        println!("// ==> {name} <==");
                        println!("{text}");
                    }
                }
            }
            Command::Classify(target) => {
                let config = target.input_settings.load_config()?;
                let set = target.input_settings.load_schema_set()?;
                let index = SchemaIndex::build(&set)?;
                let classifier = Classifier::new(&index, &config);

                let mut failures = 0usize;
                for file in &set.files {
                    println!("{}", file.name.bold());
                    for definition in &file.definitions {
                        let Definition::Message(message) = definition else {
                            println!("  {} {}", "enum".cyan(), definition.name());
                            continue;
                        };
                        println!("  {} {}", "message".cyan(), message.name);
                        for field_ref in message.field_refs() {
                            match classifier.classify(field_ref) {
                                Ok(class) => {
                                    let optional = if class.optional { " (optional)" } else { "" };
                                    println!(
                                        "    {:<24} {} {}{}",
                                        field_ref.field.name,
                                        class.kind.to_string().green(),
                                        class.cardinality,
                                        optional.dimmed()
                                    );
                                }
                                Err(error) => {
                                    failures += 1;
                                    println!("    {:<24} {}", field_ref.field.name, error.to_string().red());
                                }
                            }
                        }
                    }
                }
                if failures > 0 {
                    bail!("{failures} field(s) could not be classified");
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
