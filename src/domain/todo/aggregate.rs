//! Todo aggregate entity.
//!
//! A todo owns its identity, text, and completion status. Completion only
//! changes through [`Todo::mark_completed`] and [`Todo::mark_uncompleted`].

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, TodoId, ValidationError};

use super::{CompletionStatus, TodoError};

/// Maximum length for todo title (matches the column bound).
pub const MAX_TITLE_LENGTH: usize = 255;

/// Plain serializable representation of a todo.
///
/// This is what repositories persist and what use cases hand back to
/// callers. The id is kept in its canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// Todo aggregate.
///
/// # Invariants
///
/// - `id` is minted once in [`Todo::new`] and never regenerated
/// - `title` is 1-255 characters, non-blank
/// - completing an already completed todo (or reopening an open one) fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: String,
    description: Option<String>,
    status: CompletionStatus,
}

impl Todo {
    /// Create a new incomplete todo with a freshly minted id.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty or too long
    pub fn new(title: impl Into<String>, description: Option<String>) -> Result<Self, TodoError> {
        let title = title.into();
        Self::validate_title(&title)?;

        Ok(Self {
            id: TodoId::new(),
            title,
            description,
            status: CompletionStatus::Incomplete,
        })
    }

    /// Reconstitute a todo from persistence (no validation).
    pub fn reconstitute(
        id: TodoId,
        title: String,
        description: Option<String>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status: CompletionStatus::from_completed(completed),
        }
    }

    /// Rebuild a todo from its record, keeping the stored id.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the record id is not a UUID
    pub fn from_record(record: TodoRecord) -> Result<Self, TodoError> {
        let id = record.id.parse::<TodoId>().map_err(|e| {
            TodoError::from(ValidationError::invalid_format("id", e.to_string()))
        })?;
        Ok(Self::reconstitute(
            id,
            record.title,
            record.description,
            record.completed,
        ))
    }

    /// Convert to the plain record representation.
    pub fn to_record(&self) -> TodoRecord {
        TodoRecord {
            id: self.id.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the todo ID.
    pub fn id(&self) -> &TodoId {
        &self.id
    }

    /// Returns the todo title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the todo description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the completion status.
    pub fn status(&self) -> CompletionStatus {
        self.status
    }

    /// Returns true if the todo is completed.
    pub fn completed(&self) -> bool {
        self.status.is_completed()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace title and description, whatever the completion status.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty or too long
    pub fn update(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), TodoError> {
        let title = title.into();
        Self::validate_title(&title)?;

        self.title = title;
        self.description = description;
        Ok(())
    }

    /// Mark the todo as completed.
    ///
    /// # Errors
    ///
    /// - `AlreadyCompleted` if the todo is already completed
    pub fn mark_completed(&mut self) -> Result<(), TodoError> {
        self.status = self
            .status
            .advance(CompletionStatus::Completed)
            .map_err(|_| TodoError::AlreadyCompleted(self.id))?;
        Ok(())
    }

    /// Reopen a completed todo.
    ///
    /// # Errors
    ///
    /// - `NotCompleted` if the todo is not completed
    pub fn mark_uncompleted(&mut self) -> Result<(), TodoError> {
        self.status = self
            .status
            .advance(CompletionStatus::Incomplete)
            .map_err(|_| TodoError::NotCompleted(self.id))?;
        Ok(())
    }

    fn validate_title(title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        let length = title.chars().count();
        if length > MAX_TITLE_LENGTH {
            return Err(ValidationError::too_long("title", MAX_TITLE_LENGTH, length));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Todo {
        Todo::new("write tests", Some("for usecases".to_string())).unwrap()
    }

    #[test]
    fn new_todo_starts_incomplete() {
        let todo = sample();
        assert_eq!(todo.title(), "write tests");
        assert_eq!(todo.description(), Some("for usecases"));
        assert!(!todo.completed());
        assert_eq!(todo.status(), CompletionStatus::Incomplete);
    }

    #[test]
    fn new_todos_get_distinct_ids() {
        let a = sample();
        let b = sample();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn new_rejects_blank_title() {
        let result = Todo::new("   ", None);
        assert!(matches!(result, Err(TodoError::ValidationFailed { .. })));
    }

    #[test]
    fn new_rejects_overlong_title() {
        let result = Todo::new("x".repeat(MAX_TITLE_LENGTH + 1), None);
        assert!(matches!(result, Err(TodoError::ValidationFailed { .. })));
    }

    #[test]
    fn new_accepts_title_at_limit() {
        assert!(Todo::new("x".repeat(MAX_TITLE_LENGTH), None).is_ok());
    }

    #[test]
    fn update_replaces_title_and_description() {
        let mut todo = sample();
        todo.update("new title", None).unwrap();
        assert_eq!(todo.title(), "new title");
        assert_eq!(todo.description(), None);
    }

    #[test]
    fn update_is_allowed_on_completed_todo() {
        let mut todo = sample();
        todo.mark_completed().unwrap();
        todo.update("still editable", Some("yes".to_string())).unwrap();
        assert_eq!(todo.title(), "still editable");
        assert!(todo.completed());
    }

    #[test]
    fn update_with_blank_title_leaves_todo_unchanged() {
        let mut todo = sample();
        assert!(todo.update("", None).is_err());
        assert_eq!(todo.title(), "write tests");
        assert_eq!(todo.description(), Some("for usecases"));
    }

    #[test]
    fn mark_completed_twice_fails_and_stays_completed() {
        let mut todo = sample();
        todo.mark_completed().unwrap();

        let result = todo.mark_completed();

        assert_eq!(result, Err(TodoError::AlreadyCompleted(*todo.id())));
        assert!(todo.completed());
    }

    #[test]
    fn mark_uncompleted_on_open_todo_fails_and_stays_open() {
        let mut todo = sample();

        let result = todo.mark_uncompleted();

        assert_eq!(result, Err(TodoError::NotCompleted(*todo.id())));
        assert!(!todo.completed());
    }

    #[test]
    fn mark_uncompleted_reopens_completed_todo() {
        let mut todo = sample();
        todo.mark_completed().unwrap();
        todo.mark_uncompleted().unwrap();
        assert!(!todo.completed());
    }

    #[test]
    fn record_keeps_canonical_id_string() {
        let todo = sample();
        let record = todo.to_record();
        assert_eq!(record.id, todo.id().to_string());
        assert_eq!(record.id.len(), 36);
    }

    #[test]
    fn from_record_rejects_invalid_id() {
        let record = TodoRecord {
            id: "nope".to_string(),
            title: "t".to_string(),
            description: None,
            completed: false,
        };
        assert!(matches!(
            Todo::from_record(record),
            Err(TodoError::ValidationFailed { ref field, .. }) if field == "id"
        ));
    }

    #[test]
    fn record_serializes_with_flat_fields() {
        let record = sample().to_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "write tests");
        assert_eq!(json["description"], "for usecases");
        assert_eq!(json["completed"], false);
    }

    proptest! {
        #[test]
        fn from_record_preserves_every_field(
            title in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,60}",
            description in proptest::option::of(".{0,80}"),
            completed in any::<bool>(),
        ) {
            let mut todo = Todo::new(title, description).unwrap();
            if completed {
                todo.mark_completed().unwrap();
            }

            let rebuilt = Todo::from_record(todo.to_record()).unwrap();

            prop_assert_eq!(rebuilt, todo);
        }
    }
}
