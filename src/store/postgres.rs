//! Postgres-backed store over one pooled diesel connection.

use std::collections::HashMap;
use std::convert::TryFrom;

use diesel::{r2d2::ConnectionManager, Connection, PgConnection};
use r2d2::PooledConnection;

use crate::db::connection::PgPool;
use crate::db::models::{BoardRow, CardRow, ColumnRow, CommentRow, ShareRow, UserRow};
use crate::db::repos::{
    board::{CreateBoard, DeleteBoard, FindBoard, UpdateBoard},
    card::{CreateCard, DeleteCard, FindCard, UpdateCard},
    column::{CreateColumn, DeleteColumn, FindColumn, UpdateColumn},
    comment::{CreateComment, DeleteComment, FindComment},
    share::{CreateShare, DeleteShare, FindShare},
    user::FindUser,
};
use crate::domain::{Board, BoardShare, Card, Column, Comment, UserSummary};
use crate::error::Result;
use crate::ordering::PositionChange;
use crate::store::KanbanStore;

pub struct PgStore {
    db_connection: PooledConnection<ConnectionManager<PgConnection>>,
}

impl PgStore {
    pub fn new(db_connection: PooledConnection<ConnectionManager<PgConnection>>) -> Self {
        Self { db_connection }
    }

    pub fn from_pool(pool: &PgPool) -> Result<Self> {
        Ok(Self::new(pool.get()?))
    }

    fn conn(&self) -> &PgConnection {
        &self.db_connection
    }
}

impl KanbanStore for PgStore {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.conn().transaction(f)
    }

    fn find_user(&self, id: &str) -> Result<Option<UserSummary>> {
        Ok(UserRow::find(id, self.conn())?.map(UserSummary::from))
    }

    fn search_users(&self, query: &str, limit: usize) -> Result<Vec<UserSummary>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(UserRow::search(query, limit, self.conn())?
            .into_iter()
            .map(UserSummary::from)
            .collect())
    }

    fn insert_board(&self, board: &Board) -> Result<()> {
        Ok(BoardRow::create(&BoardRow::from(board), self.conn())?)
    }

    fn find_board(&self, id: &str) -> Result<Option<Board>> {
        BoardRow::find(id, self.conn())?
            .map(Board::try_from)
            .transpose()
    }

    fn update_board(&self, board: &Board) -> Result<()> {
        Ok(BoardRow::update(&BoardRow::from(board), self.conn())?)
    }

    fn lock_board(&self, id: &str) -> Result<bool> {
        Ok(BoardRow::lock(id, self.conn())?)
    }

    fn delete_board(&self, id: &str) -> Result<bool> {
        Ok(BoardRow::delete(id, self.conn())?)
    }

    fn boards_visible_to(&self, user_id: &str) -> Result<Vec<Board>> {
        BoardRow::visible_to(user_id, self.conn())?
            .into_iter()
            .map(Board::try_from)
            .collect()
    }

    fn insert_column(&self, column: &Column) -> Result<()> {
        Ok(ColumnRow::create(&ColumnRow::from(column), self.conn())?)
    }

    fn find_column(&self, id: &str) -> Result<Option<Column>> {
        Ok(ColumnRow::find(id, self.conn())?.map(Column::from))
    }

    fn columns_for_board(&self, board_id: &str) -> Result<Vec<Column>> {
        Ok(ColumnRow::for_board(board_id, self.conn())?
            .into_iter()
            .map(Column::from)
            .collect())
    }

    fn update_column(&self, column: &Column) -> Result<()> {
        Ok(ColumnRow::update(&ColumnRow::from(column), self.conn())?)
    }

    fn set_column_positions(&self, changes: &[PositionChange]) -> Result<()> {
        for change in changes {
            ColumnRow::set_position(&change.id, change.position, self.conn())?;
        }
        Ok(())
    }

    fn delete_columns(&self, ids: &[String]) -> Result<()> {
        ColumnRow::delete_many(ids, self.conn())?;
        Ok(())
    }

    fn lock_column(&self, id: &str) -> Result<bool> {
        Ok(ColumnRow::lock(id, self.conn())?)
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        Ok(CardRow::create(&CardRow::from(card), self.conn())?)
    }

    fn find_card(&self, id: &str) -> Result<Option<Card>> {
        Ok(CardRow::find(id, self.conn())?.map(Card::from))
    }

    fn cards_in_column(&self, column_id: &str) -> Result<Vec<Card>> {
        Ok(CardRow::in_column(column_id, self.conn())?
            .into_iter()
            .map(Card::from)
            .collect())
    }

    fn cards_for_board(&self, board_id: &str) -> Result<Vec<Card>> {
        Ok(CardRow::for_board(board_id, self.conn())?
            .into_iter()
            .map(Card::from)
            .collect())
    }

    fn card_counts(&self, column_ids: &[String]) -> Result<HashMap<String, usize>> {
        let mut counts = HashMap::new();
        for column_id in CardRow::column_ids_in(column_ids, self.conn())? {
            *counts.entry(column_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn update_card(&self, card: &Card) -> Result<()> {
        Ok(CardRow::update(&CardRow::from(card), self.conn())?)
    }

    fn set_card_positions(&self, column_id: &str, changes: &[PositionChange]) -> Result<()> {
        for change in changes {
            CardRow::set_position(&change.id, column_id, change.position, self.conn())?;
        }
        Ok(())
    }

    fn delete_card(&self, id: &str) -> Result<bool> {
        Ok(CardRow::delete(id, self.conn())?)
    }

    fn insert_share(&self, share: &BoardShare) -> Result<()> {
        Ok(ShareRow::create(&ShareRow::from(share), self.conn())?)
    }

    fn find_share(&self, id: &str) -> Result<Option<BoardShare>> {
        Ok(ShareRow::find(id, self.conn())?.map(BoardShare::from))
    }

    fn shares_for_board(&self, board_id: &str) -> Result<Vec<BoardShare>> {
        Ok(ShareRow::for_board(board_id, self.conn())?
            .into_iter()
            .map(BoardShare::from)
            .collect())
    }

    fn delete_share(&self, id: &str) -> Result<bool> {
        Ok(ShareRow::delete(id, self.conn())?)
    }

    fn insert_comment(&self, comment: &Comment) -> Result<()> {
        Ok(CommentRow::create(&CommentRow::from(comment), self.conn())?)
    }

    fn find_comment(&self, id: &str) -> Result<Option<Comment>> {
        Ok(CommentRow::find(id, self.conn())?.map(Comment::from))
    }

    fn comments_for_card(&self, card_id: &str) -> Result<Vec<Comment>> {
        Ok(CommentRow::for_card(card_id, self.conn())?
            .into_iter()
            .map(Comment::from)
            .collect())
    }

    fn delete_comment(&self, id: &str) -> Result<bool> {
        Ok(CommentRow::delete(id, self.conn())?)
    }
}
