use serde::{Deserialize, Serialize};

/// A single todo entry. Replaced wholesale on update, never field-merged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}
