//! Request and response DTOs for todo endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::todo::TodoRecord;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /todos`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PUT /todos/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

/// A todo as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<TodoRecord> for TodoResponse {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            completed: record.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_description_is_optional() {
        let json = r#"{"title": "write tests"}"#;
        let req: CreateTodoRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "write tests");
        assert!(req.description.is_none());
    }

    #[test]
    fn create_request_requires_title() {
        let json = r#"{"description": "no title"}"#;
        assert!(serde_json::from_str::<CreateTodoRequest>(json).is_err());
    }

    #[test]
    fn response_serializes_null_description() {
        let response = TodoResponse {
            id: "0190a3c2-0000-7000-8000-000000000000".to_string(),
            title: "t".to_string(),
            description: None,
            completed: true,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["description"].is_null());
        assert_eq!(json["completed"], true);
    }
}
