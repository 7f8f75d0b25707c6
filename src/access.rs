//! Who may see or change a board, card or comment.
//!
//! Every check is a pure predicate over the acting user and the already loaded
//! resource. Shares grant view and card-level rights only; board structure
//! (name, status, columns, shares) stays with the owner.

use crate::domain::{Board, BoardShare, Card, Comment};
use crate::error::{KanbanError, Result};

pub fn is_shared_with(user_id: &str, board: &Board, shares: &[BoardShare]) -> bool {
    shares
        .iter()
        .any(|share| share.board_id == board.id && share.user_id == user_id)
}

pub fn can_view_board(user_id: &str, board: &Board, shares: &[BoardShare]) -> bool {
    board.owner_id == user_id || is_shared_with(user_id, board, shares)
}

pub fn can_update_board(user_id: &str, board: &Board) -> bool {
    board.owner_id == user_id
}

pub fn can_delete_board(user_id: &str, board: &Board) -> bool {
    board.owner_id == user_id
}

/// View, update, move and delete rights on a card are the same check.
pub fn can_access_card(user_id: &str, card: &Card, board: &Board, shares: &[BoardShare]) -> bool {
    card.assigned_user_id.as_deref() == Some(user_id) || can_view_board(user_id, board, shares)
}

pub fn can_delete_comment(user_id: &str, comment: &Comment) -> bool {
    comment.user_id == user_id
}

pub fn ensure(allowed: bool, action: &str) -> Result<()> {
    if allowed {
        Ok(())
    } else {
        Err(KanbanError::denied(action))
    }
}
