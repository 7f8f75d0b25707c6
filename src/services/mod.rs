//! Board, card, sharing and comment operations.
//!
//! Each operation takes the acting user explicitly, checks access before any
//! write and runs its writes inside one store transaction.

use crate::domain::{Board, BoardShare, Card};
use crate::error::{KanbanError, Result};
use crate::store::KanbanStore;

pub mod board;
pub mod card;
pub mod comment;
pub mod share;

pub use board::{BoardService, DEFAULT_COLUMNS};
pub use card::CardService;
pub use comment::CommentService;
pub use share::ShareService;

fn require_board<S: KanbanStore>(store: &S, board_id: &str) -> Result<Board> {
    store
        .find_board(board_id)?
        .ok_or_else(|| KanbanError::not_found("board", board_id))
}

fn require_card<S: KanbanStore>(store: &S, card_id: &str) -> Result<Card> {
    store
        .find_card(card_id)?
        .ok_or_else(|| KanbanError::not_found("card", card_id))
}

/// Board together with its shares, the input of every access predicate.
fn board_with_shares<S: KanbanStore>(store: &S, board_id: &str) -> Result<(Board, Vec<BoardShare>)> {
    let board = require_board(store, board_id)?;
    let shares = store.shares_for_board(&board.id)?;
    Ok((board, shares))
}
