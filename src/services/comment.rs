use chrono::Utc;
use tracing::info;

use crate::access::{self, ensure};
use crate::domain::{new_id, Comment};
use crate::error::{FieldErrors, KanbanError, Result};
use crate::store::KanbanStore;
use crate::validation::{self, COMMENT_CONTENT_MAX};

use super::{board_with_shares, require_card};

pub struct CommentService<'a, S: KanbanStore> {
    store: &'a S,
}

impl<'a, S: KanbanStore> CommentService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn add_comment(&self, actor: &str, card_id: &str, content: &str) -> Result<Comment> {
        let mut errors = FieldErrors::new();
        validation::required(&mut errors, "content", "content", content, COMMENT_CONTENT_MAX);
        errors.into_result()?;

        self.store.transaction(|| {
            self.ensure_card_access(actor, card_id, "comment on this card")?;

            let comment = Comment {
                id: new_id(),
                card_id: card_id.to_string(),
                user_id: actor.to_string(),
                content: content.trim().to_string(),
                created_at: Utc::now().naive_utc(),
            };
            self.store.insert_comment(&comment)?;
            info!(card_id, comment_id = %comment.id, "comment added");
            Ok(comment)
        })
    }

    pub fn list_comments(&self, actor: &str, card_id: &str) -> Result<Vec<Comment>> {
        self.ensure_card_access(actor, card_id, "view this card")?;
        self.store.comments_for_card(card_id)
    }

    /// Only the author may delete a comment.
    pub fn delete_comment(&self, actor: &str, comment_id: &str) -> Result<bool> {
        self.store.transaction(|| {
            let comment = self
                .store
                .find_comment(comment_id)?
                .ok_or_else(|| KanbanError::not_found("comment", comment_id))?;
            ensure(access::can_delete_comment(actor, &comment), "delete this comment")?;

            let deleted = self.store.delete_comment(&comment.id)?;
            info!(comment_id, "comment deleted");
            Ok(deleted)
        })
    }

    fn ensure_card_access(&self, actor: &str, card_id: &str, action: &str) -> Result<()> {
        let card = require_card(self.store, card_id)?;
        let (board, shares) = board_with_shares(self.store, &card.board_id)?;
        ensure(access::can_access_card(actor, &card, &board, &shares), action)
    }
}
