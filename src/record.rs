use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A task description and the day of week in which to do it.
///
/// On the wire this is a JSON object with exactly the case-sensitive keys
/// `Task` and `Day`. Both are required when decoding; any other keys are
/// ignored.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Todo {
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Day")]
    pub day: String,
}

impl Todo {
    pub fn new(task: &str, day: &str) -> Self {
        Self {
            task: task.to_string(),
            day: day.to_string(),
        }
    }

    /// Serialize into JSON bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::Serialization)
    }
}

impl fmt::Display for Todo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {}}}", self.task, self.day)
    }
}

/// Deserialize JSON bytes into a `Todo`.
pub fn decode(bytes: &[u8]) -> Result<Todo> {
    serde_json::from_slice(bytes).map_err(Error::Deserialization)
}
