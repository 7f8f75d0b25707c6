//! Persistence seam for boards, columns, cards, shares and comments.
//!
//! Services are generic over `KanbanStore` so the same orchestration runs on
//! Postgres in production and on `MemoryStore` in tests.

use std::collections::HashMap;

use crate::domain::{Board, BoardShare, Card, Column, Comment, UserSummary};
use crate::error::Result;
use crate::ordering::PositionChange;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub trait KanbanStore {
    /// Runs `f` as one unit of work. Any error discards every write made by `f`.
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>;

    fn find_user(&self, id: &str) -> Result<Option<UserSummary>>;

    /// Case-insensitive substring match on name or email, ordered by name.
    fn search_users(&self, query: &str, limit: usize) -> Result<Vec<UserSummary>>;

    fn insert_board(&self, board: &Board) -> Result<()>;

    fn find_board(&self, id: &str) -> Result<Option<Board>>;

    fn update_board(&self, board: &Board) -> Result<()>;

    /// Serialises writers of the board's shares until the surrounding
    /// transaction ends. Returns false when the board does not exist.
    fn lock_board(&self, id: &str) -> Result<bool>;

    /// Removes the board with its columns, cards, comments and shares.
    fn delete_board(&self, id: &str) -> Result<bool>;

    /// Boards owned by or shared with `user_id`, ordered by name.
    fn boards_visible_to(&self, user_id: &str) -> Result<Vec<Board>>;

    fn insert_column(&self, column: &Column) -> Result<()>;

    fn find_column(&self, id: &str) -> Result<Option<Column>>;

    /// Columns of a board ordered by position.
    fn columns_for_board(&self, board_id: &str) -> Result<Vec<Column>>;

    fn update_column(&self, column: &Column) -> Result<()>;

    fn set_column_positions(&self, changes: &[PositionChange]) -> Result<()>;

    fn delete_columns(&self, ids: &[String]) -> Result<()>;

    /// Serialises writers that add, remove or reorder the cards of one column
    /// until the surrounding transaction ends. Returns false when the column
    /// does not exist.
    fn lock_column(&self, id: &str) -> Result<bool>;

    fn insert_card(&self, card: &Card) -> Result<()>;

    fn find_card(&self, id: &str) -> Result<Option<Card>>;

    /// Cards of a column ordered by position.
    fn cards_in_column(&self, column_id: &str) -> Result<Vec<Card>>;

    /// Cards of a board ordered by column then position.
    fn cards_for_board(&self, board_id: &str) -> Result<Vec<Card>>;

    /// Number of cards held by each of `column_ids`; empty columns are absent.
    fn card_counts(&self, column_ids: &[String]) -> Result<HashMap<String, usize>>;

    fn update_card(&self, card: &Card) -> Result<()>;

    /// Rewrites positions of cards still held by `column_id`; cards that left
    /// the column are skipped.
    fn set_card_positions(&self, column_id: &str, changes: &[PositionChange]) -> Result<()>;

    /// Removes the card and its comments.
    fn delete_card(&self, id: &str) -> Result<bool>;

    fn insert_share(&self, share: &BoardShare) -> Result<()>;

    fn find_share(&self, id: &str) -> Result<Option<BoardShare>>;

    fn shares_for_board(&self, board_id: &str) -> Result<Vec<BoardShare>>;

    fn delete_share(&self, id: &str) -> Result<bool>;

    fn insert_comment(&self, comment: &Comment) -> Result<()>;

    fn find_comment(&self, id: &str) -> Result<Option<Comment>>;

    /// Comments of a card, oldest first.
    fn comments_for_card(&self, card_id: &str) -> Result<Vec<Comment>>;

    fn delete_comment(&self, id: &str) -> Result<bool>;
}
