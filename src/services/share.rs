use tracing::{info, warn};

use crate::access::{self, ensure};
use crate::domain::{BoardShare, UserSummary};
use crate::error::{KanbanError, Result};
use crate::store::KanbanStore;

use super::{board_with_shares, require_board};

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const MAX_SEARCH_LIMIT: usize = 50;
const MIN_QUERY_CHARS: usize = 2;

pub struct ShareService<'a, S: KanbanStore> {
    store: &'a S,
}

impl<'a, S: KanbanStore> ShareService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Grants `user_id` access to the board. Only the owner may share, never
    /// with themselves, and at most once per user.
    pub fn share_board(&self, actor: &str, board_id: &str, user_id: &str) -> Result<BoardShare> {
        let share = self.store.transaction(|| {
            if !self.store.lock_board(board_id)? {
                return Err(KanbanError::not_found("board", board_id));
            }
            let (board, shares) = board_with_shares(self.store, board_id)?;
            ensure(access::can_update_board(actor, &board), "share this board")?;

            if self.store.find_user(user_id)?.is_none() {
                return Err(KanbanError::not_found("user", user_id));
            }
            if board.owner_id == user_id {
                return Err(KanbanError::invalid_state(
                    "user_id",
                    "Cannot share board with the owner",
                ));
            }
            if access::is_shared_with(user_id, &board, &shares) {
                return Err(KanbanError::invalid_state(
                    "user_id",
                    "Board is already shared with this user",
                ));
            }

            let share = BoardShare::new(&board.id, user_id);
            self.store.insert_share(&share)?;
            Ok(share)
        });

        match share {
            Ok(share) => {
                info!(board_id, user_id, share_id = %share.id, "board shared");
                Ok(share)
            }
            Err(err) => {
                warn!(board_id, user_id, error = %err, "share rejected");
                Err(err)
            }
        }
    }

    /// The owner may revoke any share; a shared user may drop their own.
    pub fn remove_share(&self, actor: &str, share_id: &str) -> Result<bool> {
        self.store.transaction(|| {
            let share = self
                .store
                .find_share(share_id)?
                .ok_or_else(|| KanbanError::not_found("share", share_id))?;
            let board = require_board(self.store, &share.board_id)?;
            ensure(
                access::can_update_board(actor, &board) || share.user_id == actor,
                "remove this share",
            )?;

            let removed = self.store.delete_share(&share.id)?;
            info!(share_id, board_id = %board.id, "share removed");
            Ok(removed)
        })
    }

    /// Shares of a board with the user each one grants access to.
    pub fn list_shares(&self, actor: &str, board_id: &str) -> Result<Vec<(BoardShare, UserSummary)>> {
        let (board, shares) = board_with_shares(self.store, board_id)?;
        ensure(
            access::can_view_board(actor, &board, &shares),
            "view this board",
        )?;

        let mut shared = Vec::with_capacity(shares.len());
        for share in shares {
            match self.store.find_user(&share.user_id)? {
                Some(user) => shared.push((share, user)),
                None => warn!(share_id = %share.id, user_id = %share.user_id, "share points at a missing user"),
            }
        }
        Ok(shared)
    }

    /// Share candidates by name or email. Queries shorter than two characters
    /// match nothing.
    pub fn search_users(&self, query: &str, limit: Option<usize>) -> Result<Vec<UserSummary>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT);
        self.store.search_users(query, limit)
    }
}
