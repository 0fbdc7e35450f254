use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Longest author name accepted on create/update, in characters
pub const NAME_MAX_LEN: usize = 120;

pub type FieldErrors = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummaryDto {
    pub id: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<NaiveDateTime>,
}

/// Single-author representation including the expanded book relation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorWithBooksDto {
    pub id: i32,
    pub name: String,
    pub books: Vec<BookSummaryDto>,
    /// Only present when the caller asked for hypermedia links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDto {
    pub relation: String,
    pub href: String,
    pub method: String,
}

/// Body of create and update requests. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCreationDto {
    pub name: String,
}

impl AuthorCreationDto {
    /// Check field rules and return the DTO with its name trimmed
    pub fn validated(self) -> Result<Self, FieldErrors> {
        let name = self.name.trim();
        let mut errors = FieldErrors::new();

        if name.is_empty() {
            errors.insert("name".to_string(), "This field is required".to_string());
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.insert(
                "name".to_string(),
                format!("Must be at most {} characters", NAME_MAX_LEN),
            );
        }

        if errors.is_empty() {
            Ok(Self { name: name.to_string() })
        } else {
            Err(errors)
        }
    }
}
