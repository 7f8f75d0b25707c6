use tracing::{debug, info};

use crate::access::{self, ensure};
use crate::domain::{new_id, Board, BoardShare, Card, CardUpdate, Column, NewCard};
use crate::error::{FieldErrors, KanbanError, Result};
use crate::events::{DomainEvent, EventSink};
use crate::ordering;
use crate::store::KanbanStore;
use crate::validation::{self, CARD_DESCRIPTION_MAX, CARD_TITLE_MAX};

use super::{board_with_shares, require_card};

pub struct CardService<'a, S: KanbanStore> {
    store: &'a S,
    events: &'a dyn EventSink,
}

impl<'a, S: KanbanStore> CardService<'a, S> {
    pub fn new(store: &'a S, events: &'a dyn EventSink) -> Self {
        Self { store, events }
    }

    pub fn get_card(&self, actor: &str, card_id: &str) -> Result<Card> {
        let card = require_card(self.store, card_id)?;
        let (board, shares) = board_with_shares(self.store, &card.board_id)?;
        ensure(
            access::can_access_card(actor, &card, &board, &shares),
            "view this card",
        )?;
        Ok(card)
    }

    /// Appends a new card to the end of its column.
    pub fn create_card(&self, actor: &str, new_card: NewCard) -> Result<Card> {
        validate_card_fields(&new_card.title, new_card.description.as_deref())?;

        let card = self.store.transaction(|| {
            let (board, shares) = board_with_shares(self.store, &new_card.board_id)?;
            ensure(
                access::can_view_board(actor, &board, &shares),
                "add cards to this board",
            )?;
            let column = self.column_on_board(&new_card.column_id, &board)?;
            self.check_assignee(&board, &shares, new_card.assigned_user_id.as_deref())?;

            if !self.store.lock_column(&column.id)? {
                return Err(foreign_column());
            }
            let position = ordering::append_position(
                self.store
                    .cards_in_column(&column.id)?
                    .iter()
                    .map(|card| card.position),
            );

            let card = Card {
                id: new_id(),
                board_id: board.id.clone(),
                column_id: column.id.clone(),
                title: new_card.title.trim().to_string(),
                description: new_card.description.clone(),
                position,
                assigned_user_id: new_card.assigned_user_id.clone(),
                created_by: actor.to_string(),
            };
            self.store.insert_card(&card)?;
            Ok(card)
        })?;

        info!(card_id = %card.id, column_id = %card.column_id, position = card.position, "card created");
        Ok(card)
    }

    /// Updates title, description and assignee. Column and position are untouched.
    pub fn update_card(&self, actor: &str, card_id: &str, update: CardUpdate) -> Result<Card> {
        validate_card_fields(&update.title, update.description.as_deref())?;

        let (card, updated_fields) = self.store.transaction(|| {
            let mut card = require_card(self.store, card_id)?;
            let (board, shares) = board_with_shares(self.store, &card.board_id)?;
            ensure(
                access::can_access_card(actor, &card, &board, &shares),
                "update this card",
            )?;

            let title = update.title.trim().to_string();
            let mut updated_fields = Vec::new();
            if card.title != title {
                card.title = title;
                updated_fields.push("title".to_string());
            }
            if card.description != update.description {
                card.description = update.description.clone();
                updated_fields.push("description".to_string());
            }
            if card.assigned_user_id != update.assigned_user_id {
                self.check_assignee(&board, &shares, update.assigned_user_id.as_deref())?;
                card.assigned_user_id = update.assigned_user_id.clone();
                updated_fields.push("assigned_user_id".to_string());
            }

            if !updated_fields.is_empty() {
                self.store.update_card(&card)?;
            }
            Ok((card, updated_fields))
        })?;

        if updated_fields.is_empty() {
            debug!(card_id, "card update changed nothing");
        } else {
            info!(card_id, fields = ?updated_fields, "card updated");
            self.events.publish(DomainEvent::CardUpdated {
                card_id: card.id.clone(),
                board_id: card.board_id.clone(),
                updated_fields,
            });
        }
        Ok(card)
    }

    /// Moves a card to `position` inside `column_id`, renumbering the target
    /// column. The column the card leaves keeps its positions.
    pub fn move_card(&self, actor: &str, card_id: &str, column_id: &str, position: i32) -> Result<Card> {
        let (card, old_column_id) = self.store.transaction(|| {
            let card = require_card(self.store, card_id)?;
            let (board, shares) = board_with_shares(self.store, &card.board_id)?;
            ensure(
                access::can_access_card(actor, &card, &board, &shares),
                "move this card",
            )?;
            let target = self.column_on_board(column_id, &board)?;

            let mut card = self.lock_move(&card, &target.id)?;
            let siblings = self.store.cards_in_column(&target.id)?;
            let plan = ordering::plan_card_move(&siblings, &card.id, position);
            debug!(card_id, column_id, requested = position, placed = plan.position, "planned card move");

            let old_column_id = std::mem::replace(&mut card.column_id, target.id);
            card.position = plan.position;
            self.store.update_card(&card)?;
            self.store.set_card_positions(&card.column_id, &plan.reordered)?;
            Ok((card, old_column_id))
        })?;

        info!(
            card_id,
            from = %old_column_id,
            to = %card.column_id,
            position = card.position,
            "card moved"
        );
        self.events.publish(DomainEvent::CardMoved {
            card_id: card.id.clone(),
            board_id: card.board_id.clone(),
            old_column_id,
            new_column_id: card.column_id.clone(),
            new_position: card.position,
        });
        Ok(card)
    }

    /// Removes the card. Sibling positions are left as they are.
    pub fn delete_card(&self, actor: &str, card_id: &str) -> Result<bool> {
        self.store.transaction(|| {
            let card = require_card(self.store, card_id)?;
            let (board, shares) = board_with_shares(self.store, &card.board_id)?;
            ensure(
                access::can_access_card(actor, &card, &board, &shares),
                "delete this card",
            )?;

            let deleted = self.store.delete_card(&card.id)?;
            info!(card_id, "card deleted");
            Ok(deleted)
        })
    }

    fn column_on_board(&self, column_id: &str, board: &Board) -> Result<Column> {
        match self.store.find_column(column_id)? {
            Some(column) if column.board_id == board.id => Ok(column),
            _ => Err(foreign_column()),
        }
    }

    /// Locks the card's column and the target column in id order, then
    /// rereads the card under those locks.
    fn lock_move(&self, card: &Card, target_id: &str) -> Result<Card> {
        let mut column_ids = vec![card.column_id.as_str(), target_id];
        column_ids.sort_unstable();
        column_ids.dedup();
        for id in &column_ids {
            if !self.store.lock_column(id)? && *id == target_id {
                return Err(foreign_column());
            }
        }

        let current = require_card(self.store, &card.id)?;
        if !column_ids.contains(&current.column_id.as_str()) {
            self.store.lock_column(&current.column_id)?;
        }
        Ok(current)
    }

    /// An assignee must exist and be a participant of the board.
    fn check_assignee(&self, board: &Board, shares: &[BoardShare], assignee: Option<&str>) -> Result<()> {
        let assignee = match assignee {
            Some(assignee) => assignee,
            None => return Ok(()),
        };
        if self.store.find_user(assignee)?.is_none() {
            return Err(KanbanError::invalid_field(
                "assigned_user_id",
                "The selected user is invalid.",
            ));
        }
        if !access::can_view_board(assignee, board, shares) {
            return Err(KanbanError::invalid_field(
                "assigned_user_id",
                "The assigned user must have access to this board.",
            ));
        }
        Ok(())
    }
}

fn foreign_column() -> KanbanError {
    KanbanError::invalid_field(
        "column_id",
        "The selected column does not belong to this board.",
    )
}

fn validate_card_fields(title: &str, description: Option<&str>) -> Result<()> {
    let mut errors = FieldErrors::new();
    validation::required(&mut errors, "title", "title", title, CARD_TITLE_MAX);
    validation::optional(&mut errors, "description", "description", description, CARD_DESCRIPTION_MAX);
    errors.into_result()
}
