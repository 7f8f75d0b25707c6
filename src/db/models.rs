use std::convert::TryFrom;

use chrono::NaiveDateTime;

use super::schema::{board_columns, board_shares, boards, cards, comments};
use crate::domain::{Board, BoardShare, Card, Column, Comment, UserSummary};
use crate::error::KanbanError;

#[derive(Queryable)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        UserSummary {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[table_name="boards"]
#[changeset_options(treat_none_as_null="true")]
pub struct BoardRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub owner_id: String,
}

impl TryFrom<BoardRow> for Board {
    type Error = KanbanError;

    fn try_from(row: BoardRow) -> Result<Self, Self::Error> {
        Ok(Board {
            status: row.status.parse()?,
            id: row.id,
            name: row.name,
            description: row.description,
            owner_id: row.owner_id,
        })
    }
}

impl From<&Board> for BoardRow {
    fn from(board: &Board) -> Self {
        BoardRow {
            id: board.id.clone(),
            name: board.name.clone(),
            description: board.description.clone(),
            status: board.status.as_str().to_string(),
            owner_id: board.owner_id.clone(),
        }
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[table_name="board_columns"]
#[changeset_options(treat_none_as_null="true")]
pub struct ColumnRow {
    pub id: String,
    pub board_id: String,
    pub name: String,
    pub color: Option<String>,
    pub position: i32,
}

impl From<ColumnRow> for Column {
    fn from(row: ColumnRow) -> Self {
        Column {
            id: row.id,
            board_id: row.board_id,
            name: row.name,
            color: row.color,
            position: row.position,
        }
    }
}

impl From<&Column> for ColumnRow {
    fn from(column: &Column) -> Self {
        ColumnRow {
            id: column.id.clone(),
            board_id: column.board_id.clone(),
            name: column.name.clone(),
            color: column.color.clone(),
            position: column.position,
        }
    }
}

#[derive(Queryable, Insertable, AsChangeset)]
#[table_name="cards"]
#[changeset_options(treat_none_as_null="true")]
pub struct CardRow {
    pub id: String,
    pub board_id: String,
    pub column_id: String,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub assigned_user_id: Option<String>,
    pub created_by: String,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Card {
            id: row.id,
            board_id: row.board_id,
            column_id: row.column_id,
            title: row.title,
            description: row.description,
            position: row.position,
            assigned_user_id: row.assigned_user_id,
            created_by: row.created_by,
        }
    }
}

impl From<&Card> for CardRow {
    fn from(card: &Card) -> Self {
        CardRow {
            id: card.id.clone(),
            board_id: card.board_id.clone(),
            column_id: card.column_id.clone(),
            title: card.title.clone(),
            description: card.description.clone(),
            position: card.position,
            assigned_user_id: card.assigned_user_id.clone(),
            created_by: card.created_by.clone(),
        }
    }
}

#[derive(Queryable, Insertable)]
#[table_name="board_shares"]
pub struct ShareRow {
    pub id: String,
    pub board_id: String,
    pub user_id: String,
}

impl From<ShareRow> for BoardShare {
    fn from(row: ShareRow) -> Self {
        BoardShare {
            id: row.id,
            board_id: row.board_id,
            user_id: row.user_id,
        }
    }
}

impl From<&BoardShare> for ShareRow {
    fn from(share: &BoardShare) -> Self {
        ShareRow {
            id: share.id.clone(),
            board_id: share.board_id.clone(),
            user_id: share.user_id.clone(),
        }
    }
}

#[derive(Queryable, Insertable)]
#[table_name="comments"]
pub struct CommentRow {
    pub id: String,
    pub card_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            card_id: row.card_id,
            user_id: row.user_id,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        CommentRow {
            id: comment.id.clone(),
            card_id: comment.card_id.clone(),
            user_id: comment.user_id.clone(),
            content: comment.content.clone(),
            created_at: comment.created_at,
        }
    }
}
