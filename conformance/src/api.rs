//! Event types as prost emits them for the schemas in `schemas/`: wrapper
//! fields are `Option<prim>`, enums are `i32`, a recursive message field is
//! boxed and a oneof group is an enum in a module named after its message.
use std::collections::HashMap;

use eventcheck::prost_types;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum Action {
    Unspecified = 0,
    Post = 1,
    Sigkill = 2,
}

impl Action {
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Action::Unspecified => "ACTION_UNSPECIFIED",
            Action::Post => "ACTION_POST",
            Action::Sigkill => "ACTION_SIGKILL",
        }
    }

    pub fn from_str_name(value: &str) -> Option<Self> {
        match value {
            "ACTION_UNSPECIFIED" => Some(Self::Unspecified),
            "ACTION_POST" => Some(Self::Post),
            "ACTION_SIGKILL" => Some(Self::Sigkill),
            _ => None,
        }
    }
}

impl TryFrom<i32> for Action {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, i32> {
        match value {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Post),
            2 => Ok(Self::Sigkill),
            other => Err(other),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pod {
    pub namespace: String,
    pub name: String,
    pub labels: Vec<String>,
    pub annotations: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Process {
    pub exec_id: String,
    pub pid: Option<u32>,
    pub binary: String,
    pub arguments: Vec<String>,
    pub start_time: Option<prost_types::Timestamp>,
    pub pod: Option<Pod>,
    pub parent: Option<Box<Process>>,
    pub refcnt: u32,
    pub interpreter_hash: Vec<u8>,
    pub r#type: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessExec {
    pub process: Option<Process>,
    pub parent: Option<Process>,
    pub ancestors: Vec<Process>,
    pub ancestors_binaries: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessExit {
    pub process: Option<Process>,
    pub signal: String,
    pub status: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessKprobe {
    pub process: Option<Process>,
    pub function_name: String,
    pub action: i32,
    pub stack_trace: Vec<u64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessLoader {}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetEventsResponse {
    pub event: Option<get_events_response::Event>,
    pub node_name: String,
    pub time: Option<prost_types::Timestamp>,
}

pub mod get_events_response {
    #[derive(Clone, Debug, PartialEq)]
    pub enum Event {
        ProcessExec(super::ProcessExec),
        ProcessExit(super::ProcessExit),
        ProcessKprobe(super::ProcessKprobe),
        ProcessLoader(super::ProcessLoader),
    }
}
