use serde::{Deserialize, Serialize};
use std::fmt;
use validator::{Validate, ValidationError};

/// The two kinds of owned resources the ownership guard knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    List,
    Item,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResourceKind::List => f.write_str("list"),
            ResourceKind::Item => f.write_str("item"),
        }
    }
}

/// A to-do list. The owner lives in the store, not in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoList {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
}

/// An entry of a to-do list. Ownership always comes from the parent list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoItem {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
}

/// Input for creating a list.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Partial update of a list. At least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_list_update"))]
pub struct ListUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl ListUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Input for creating an item.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ItemInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    pub done: bool,
}

/// Partial update of an item. At least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_item_update"))]
pub struct ItemUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.done.is_none()
    }
}

fn validate_list_update(update: &ListUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::new("empty_update"));
    }
    Ok(())
}

fn validate_item_update(update: &ItemUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::new("empty_update"));
    }
    Ok(())
}

/// Wrapper for collection responses: `{"data": [...]}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: Vec<T>,
}

/// Returned by create endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: i32,
}

/// Returned by update and delete endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}
