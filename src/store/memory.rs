//! In-memory store used by tests.
//!
//! Rows live in plain vectors behind a `RefCell`. Transactions snapshot the
//! whole state and restore it when the closure fails, which gives the same
//! all-or-nothing visibility as the Postgres store.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::domain::{Board, BoardShare, Card, Column, Comment, UserSummary};
use crate::error::Result;
use crate::ordering::PositionChange;
use crate::store::KanbanStore;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: Vec<UserSummary>,
    boards: Vec<Board>,
    columns: Vec<Column>,
    cards: Vec<Card>,
    shares: Vec<BoardShare>,
    comments: Vec<Comment>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<MemoryState>,
    locks: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Users come from the identity provider, so only tests create them.
    pub fn insert_user(&self, user: UserSummary) {
        self.state.borrow_mut().users.push(user);
    }

    /// Ids passed to `lock_board`/`lock_column` since the last call, in order.
    pub fn take_locks(&self) -> Vec<String> {
        self.locks.borrow_mut().drain(..).collect()
    }
}

fn remove_where<T, P>(rows: &mut Vec<T>, predicate: P) -> bool
where
    P: Fn(&T) -> bool,
{
    let before = rows.len();
    rows.retain(|row| !predicate(row));
    rows.len() != before
}

impl KanbanStore for MemoryStore {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let snapshot = self.state.borrow().clone();
        let result = f();
        if result.is_err() {
            *self.state.borrow_mut() = snapshot;
        }
        result
    }

    fn find_user(&self, id: &str) -> Result<Option<UserSummary>> {
        Ok(self.state.borrow().users.iter().find(|u| u.id == id).cloned())
    }

    fn search_users(&self, query: &str, limit: usize) -> Result<Vec<UserSummary>> {
        let needle = query.to_lowercase();
        let mut users: Vec<UserSummary> = self
            .state
            .borrow()
            .users
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle) || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users.truncate(limit);
        Ok(users)
    }

    fn insert_board(&self, board: &Board) -> Result<()> {
        self.state.borrow_mut().boards.push(board.clone());
        Ok(())
    }

    fn find_board(&self, id: &str) -> Result<Option<Board>> {
        Ok(self.state.borrow().boards.iter().find(|b| b.id == id).cloned())
    }

    fn update_board(&self, board: &Board) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(row) = state.boards.iter_mut().find(|b| b.id == board.id) {
            *row = board.clone();
        }
        Ok(())
    }

    fn lock_board(&self, id: &str) -> Result<bool> {
        self.locks.borrow_mut().push(id.to_string());
        Ok(self.state.borrow().boards.iter().any(|b| b.id == id))
    }

    fn delete_board(&self, id: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        let card_ids: Vec<String> = state
            .cards
            .iter()
            .filter(|c| c.board_id == id)
            .map(|c| c.id.clone())
            .collect();
        remove_where(&mut state.comments, |c| card_ids.contains(&c.card_id));
        remove_where(&mut state.cards, |c| c.board_id == id);
        remove_where(&mut state.columns, |c| c.board_id == id);
        remove_where(&mut state.shares, |s| s.board_id == id);
        Ok(remove_where(&mut state.boards, |b| b.id == id))
    }

    fn boards_visible_to(&self, user_id: &str) -> Result<Vec<Board>> {
        let state = self.state.borrow();
        let mut boards: Vec<Board> = state
            .boards
            .iter()
            .filter(|b| {
                b.owner_id == user_id
                    || state
                        .shares
                        .iter()
                        .any(|s| s.board_id == b.id && s.user_id == user_id)
            })
            .cloned()
            .collect();
        boards.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(boards)
    }

    fn insert_column(&self, column: &Column) -> Result<()> {
        self.state.borrow_mut().columns.push(column.clone());
        Ok(())
    }

    fn find_column(&self, id: &str) -> Result<Option<Column>> {
        Ok(self.state.borrow().columns.iter().find(|c| c.id == id).cloned())
    }

    fn columns_for_board(&self, board_id: &str) -> Result<Vec<Column>> {
        let mut columns: Vec<Column> = self
            .state
            .borrow()
            .columns
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect();
        columns.sort_by_key(|c| c.position);
        Ok(columns)
    }

    fn update_column(&self, column: &Column) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(row) = state.columns.iter_mut().find(|c| c.id == column.id) {
            *row = column.clone();
        }
        Ok(())
    }

    fn set_column_positions(&self, changes: &[PositionChange]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for change in changes {
            if let Some(row) = state.columns.iter_mut().find(|c| c.id == change.id) {
                row.position = change.position;
            }
        }
        Ok(())
    }

    fn delete_columns(&self, ids: &[String]) -> Result<()> {
        remove_where(&mut self.state.borrow_mut().columns, |c| ids.contains(&c.id));
        Ok(())
    }

    fn lock_column(&self, id: &str) -> Result<bool> {
        self.locks.borrow_mut().push(id.to_string());
        Ok(self.state.borrow().columns.iter().any(|c| c.id == id))
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        self.state.borrow_mut().cards.push(card.clone());
        Ok(())
    }

    fn find_card(&self, id: &str) -> Result<Option<Card>> {
        Ok(self.state.borrow().cards.iter().find(|c| c.id == id).cloned())
    }

    fn cards_in_column(&self, column_id: &str) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .state
            .borrow()
            .cards
            .iter()
            .filter(|c| c.column_id == column_id)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.position);
        Ok(cards)
    }

    fn cards_for_board(&self, board_id: &str) -> Result<Vec<Card>> {
        let mut cards: Vec<Card> = self
            .state
            .borrow()
            .cards
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| {
            a.column_id
                .cmp(&b.column_id)
                .then(a.position.cmp(&b.position))
        });
        Ok(cards)
    }

    fn card_counts(&self, column_ids: &[String]) -> Result<HashMap<String, usize>> {
        let mut counts = HashMap::new();
        for card in self.state.borrow().cards.iter() {
            if column_ids.contains(&card.column_id) {
                *counts.entry(card.column_id.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    fn update_card(&self, card: &Card) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(row) = state.cards.iter_mut().find(|c| c.id == card.id) {
            *row = card.clone();
        }
        Ok(())
    }

    fn set_card_positions(&self, column_id: &str, changes: &[PositionChange]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        for change in changes {
            if let Some(row) = state
                .cards
                .iter_mut()
                .find(|c| c.id == change.id && c.column_id == column_id)
            {
                row.position = change.position;
            }
        }
        Ok(())
    }

    fn delete_card(&self, id: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        remove_where(&mut state.comments, |c| c.card_id == id);
        Ok(remove_where(&mut state.cards, |c| c.id == id))
    }

    fn insert_share(&self, share: &BoardShare) -> Result<()> {
        self.state.borrow_mut().shares.push(share.clone());
        Ok(())
    }

    fn find_share(&self, id: &str) -> Result<Option<BoardShare>> {
        Ok(self.state.borrow().shares.iter().find(|s| s.id == id).cloned())
    }

    fn shares_for_board(&self, board_id: &str) -> Result<Vec<BoardShare>> {
        Ok(self
            .state
            .borrow()
            .shares
            .iter()
            .filter(|s| s.board_id == board_id)
            .cloned()
            .collect())
    }

    fn delete_share(&self, id: &str) -> Result<bool> {
        Ok(remove_where(&mut self.state.borrow_mut().shares, |s| s.id == id))
    }

    fn insert_comment(&self, comment: &Comment) -> Result<()> {
        self.state.borrow_mut().comments.push(comment.clone());
        Ok(())
    }

    fn find_comment(&self, id: &str) -> Result<Option<Comment>> {
        Ok(self.state.borrow().comments.iter().find(|c| c.id == id).cloned())
    }

    fn comments_for_card(&self, card_id: &str) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state
            .borrow()
            .comments
            .iter()
            .filter(|c| c.card_id == card_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    fn delete_comment(&self, id: &str) -> Result<bool> {
        Ok(remove_where(&mut self.state.borrow_mut().comments, |c| c.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KanbanError;

    fn board() -> Board {
        Board::new("owner", "Roadmap", None)
    }

    #[test]
    fn failed_transaction_restores_previous_state() {
        let store = MemoryStore::new();
        let board = board();
        store.insert_board(&board).unwrap();

        let result: Result<()> = store.transaction(|| {
            store.insert_column(&Column::new(&board.id, "To Do", None, 0))?;
            store.delete_board(&board.id)?;
            Err(KanbanError::invalid_field("columns", "rejected"))
        });

        assert!(result.is_err());
        assert!(store.find_board(&board.id).unwrap().is_some());
        assert!(store.columns_for_board(&board.id).unwrap().is_empty());
    }

    #[test]
    fn successful_transaction_keeps_writes() {
        let store = MemoryStore::new();
        let board = board();

        store
            .transaction(|| store.insert_board(&board))
            .unwrap();

        assert_eq!(store.find_board(&board.id).unwrap(), Some(board));
    }

    #[test]
    fn deleting_board_cascades() {
        let store = MemoryStore::new();
        let board = board();
        let column = Column::new(&board.id, "To Do", None, 0);
        let card = Card {
            id: "card".to_string(),
            board_id: board.id.clone(),
            column_id: column.id.clone(),
            title: "Task".to_string(),
            description: None,
            position: 0,
            assigned_user_id: None,
            created_by: "owner".to_string(),
        };
        store.insert_board(&board).unwrap();
        store.insert_column(&column).unwrap();
        store.insert_card(&card).unwrap();
        store.insert_share(&BoardShare::new(&board.id, "guest")).unwrap();

        assert!(store.delete_board(&board.id).unwrap());

        assert!(store.columns_for_board(&board.id).unwrap().is_empty());
        assert!(store.find_card("card").unwrap().is_none());
        assert!(store.shares_for_board(&board.id).unwrap().is_empty());
        assert!(!store.delete_board(&board.id).unwrap());
    }

    #[test]
    fn position_rewrites_skip_cards_that_left_the_column() {
        let store = MemoryStore::new();
        let board = board();
        let todo = Column::new(&board.id, "To Do", None, 0);
        let done = Column::new(&board.id, "Done", None, 1);
        let card = Card {
            id: "card".to_string(),
            board_id: board.id.clone(),
            column_id: done.id.clone(),
            title: "Task".to_string(),
            description: None,
            position: 0,
            assigned_user_id: None,
            created_by: "owner".to_string(),
        };
        store.insert_card(&card).unwrap();

        store
            .set_card_positions(&todo.id, &[PositionChange::new("card", 5)])
            .unwrap();
        assert_eq!(store.find_card("card").unwrap().unwrap().position, 0);

        store
            .set_card_positions(&done.id, &[PositionChange::new("card", 5)])
            .unwrap();
        assert_eq!(store.find_card("card").unwrap().unwrap().position, 5);
    }

    #[test]
    fn search_matches_name_or_email_case_insensitively() {
        let store = MemoryStore::new();
        for (id, name, email) in [
            ("1", "Alice Martin", "alice@example.com"),
            ("2", "Bob Stone", "bob@ALICEWORKS.io"),
            ("3", "Carol King", "carol@example.com"),
        ] {
            store.insert_user(UserSummary {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            });
        }

        let found = store.search_users("aLiCe", 10).unwrap();
        assert_eq!(found.iter().map(|u| u.id.as_str()).collect::<Vec<_>>(), vec!["1", "2"]);

        assert_eq!(store.search_users("example", 1).unwrap().len(), 1);
    }
}
