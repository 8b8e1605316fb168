//! The process-event schema set shared by the generator tests and the
//! `eventcheck-conformance` crate, which compiles and runs its output.

use std::path::Path;

use crate::path_de::from_str_with_path;
use crate::schema::{SchemaFile, SchemaSet};

const PROCESS: &str = include_str!("../conformance/schemas/process.json");
const EVENTS: &str = include_str!("../conformance/schemas/events.json");

pub fn process() -> SchemaFile {
    from_str_with_path(PROCESS, Path::new("process.json")).unwrap()
}

pub fn events() -> SchemaSet {
    let events = from_str_with_path(EVENTS, Path::new("events.json")).unwrap();
    SchemaSet {
        files: vec![process(), events],
    }
}
