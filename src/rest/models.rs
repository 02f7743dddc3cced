use serde::{Deserialize, Serialize};

use crate::model::TodoItem;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TodoResponse {
    pub fn new(id: u64, item: TodoItem) -> Self {
        Self {
            id,
            title: item.title,
            description: item.description,
            completed: item.completed,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
