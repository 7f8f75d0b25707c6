//! Board, column, card, share and comment types shared by every layer.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::KanbanError;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl BoardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardStatus::Active => "active",
            BoardStatus::Completed => "completed",
            BoardStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardStatus {
    type Err = KanbanError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(BoardStatus::Active),
            "completed" => Ok(BoardStatus::Completed),
            "archived" => Ok(BoardStatus::Archived),
            other => Err(KanbanError::invalid_field(
                "status",
                format!("The selected status '{}' is invalid.", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: BoardStatus,
    pub owner_id: String,
}

impl Board {
    pub fn new(owner_id: &str, name: &str, description: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.to_string(),
            description,
            status: BoardStatus::Active,
            owner_id: owner_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub color: Option<String>,
    pub position: i32,
}

impl Column {
    pub fn new(board_id: &str, name: &str, color: Option<String>, position: i32) -> Self {
        Self {
            id: new_id(),
            board_id: board_id.to_string(),
            name: name.to_string(),
            color,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub board_id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub assigned_user_id: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardShare {
    pub id: String,
    pub board_id: String,
    pub user_id: String,
}

impl BoardShare {
    pub fn new(board_id: &str, user_id: &str) -> Self {
        Self {
            id: new_id(),
            board_id: board_id.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub card_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

/// A column together with its cards, both ordered by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWithCards {
    pub column: Column,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDetails {
    pub board: Board,
    pub columns: Vec<ColumnWithCards>,
}

/// One entry of a requested column set. Entries without an id create a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInput {
    pub id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub position: i32,
}

impl ColumnInput {
    pub fn existing(id: &str, name: &str, position: i32) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
            color: None,
            position,
        }
    }

    pub fn new_column(name: &str, position: i32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            color: None,
            position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPosition {
    pub id: String,
    pub position: i32,
}

#[derive(Debug, Clone, Default)]
pub struct NewBoard {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<BoardStatus>,
    pub columns: Option<Vec<ColumnInput>>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub board_id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assigned_user_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub title: String,
    pub description: Option<String>,
    pub assigned_user_id: Option<String>,
}
