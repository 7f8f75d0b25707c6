use tracing::{info, warn};

use crate::access::{self, ensure};
use crate::domain::{
    Board, BoardDetails, BoardUpdate, Column, ColumnInput, ColumnPosition, ColumnWithCards,
    NewBoard,
};
use crate::error::{FieldErrors, Result};
use crate::ordering::{self, ColumnPlan};
use crate::store::KanbanStore;
use crate::validation::{self, BOARD_DESCRIPTION_MAX, BOARD_NAME_MAX};

use super::{board_with_shares, require_board};

/// Columns every new board starts with, in position order.
pub const DEFAULT_COLUMNS: [&str; 4] = ["To Do", "In Progress", "Testing", "Done"];

pub struct BoardService<'a, S: KanbanStore> {
    store: &'a S,
}

impl<'a, S: KanbanStore> BoardService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Creates a board owned by `actor` with the default column set.
    pub fn create_board(&self, actor: &str, new_board: NewBoard) -> Result<BoardDetails> {
        validate_board_fields(&new_board.name, new_board.description.as_deref())?;

        let board = Board::new(actor, new_board.name.trim(), new_board.description);
        let columns = self.store.transaction(|| {
            self.store.insert_board(&board)?;
            DEFAULT_COLUMNS
                .iter()
                .enumerate()
                .map(|(position, name)| {
                    let column = Column::new(&board.id, name, None, position as i32);
                    self.store.insert_column(&column)?;
                    Ok(column)
                })
                .collect::<Result<Vec<Column>>>()
        })?;

        info!(board_id = %board.id, owner_id = actor, "board created");
        Ok(BoardDetails {
            board,
            columns: columns
                .into_iter()
                .map(|column| ColumnWithCards {
                    column,
                    cards: Vec::new(),
                })
                .collect(),
        })
    }

    pub fn get_board(&self, actor: &str, board_id: &str) -> Result<BoardDetails> {
        let (board, shares) = board_with_shares(self.store, board_id)?;
        ensure(
            access::can_view_board(actor, &board, &shares),
            "view this board",
        )?;
        self.details(board)
    }

    /// Boards the actor owns or that were shared with them.
    pub fn list_boards(&self, actor: &str) -> Result<Vec<Board>> {
        self.store.boards_visible_to(actor)
    }

    /// Updates the board's fields and, when `columns` is given, reconciles the
    /// whole column set. Both happen in one transaction.
    pub fn update_board(&self, actor: &str, board_id: &str, update: BoardUpdate) -> Result<BoardDetails> {
        validate_board_fields(&update.name, update.description.as_deref())?;

        let board = self.store.transaction(|| {
            let mut board = require_board(self.store, board_id)?;
            ensure(access::can_update_board(actor, &board), "update this board")?;

            if let Some(columns) = &update.columns {
                self.reconcile_columns(&board, columns)?;
            }

            board.name = update.name.trim().to_string();
            board.description = update.description.clone();
            if let Some(status) = update.status {
                board.status = status;
            }
            self.store.update_board(&board)?;
            Ok(board)
        });

        match board {
            Ok(board) => {
                info!(board_id = %board.id, "board updated");
                self.details(board)
            }
            Err(err) => {
                warn!(board_id, error = %err, "board update rejected");
                Err(err)
            }
        }
    }

    /// Rewrites column positions without creating or deleting columns.
    pub fn reorder_columns(
        &self,
        actor: &str,
        board_id: &str,
        columns: &[ColumnPosition],
    ) -> Result<Vec<Column>> {
        self.store.transaction(|| {
            let board = require_board(self.store, board_id)?;
            ensure(
                access::can_update_board(actor, &board),
                "reorder the columns of this board",
            )?;

            let existing = self.store.columns_for_board(&board.id)?;
            let changes = ordering::plan_column_reorder(&existing, columns)?;
            self.store.set_column_positions(&changes)?;

            info!(board_id, changed = changes.len(), "columns reordered");
            self.store.columns_for_board(&board.id)
        })
    }

    /// Closes the position gaps left behind by cross-column moves and card
    /// deletions. Owner only. Returns the number of cards whose position changed.
    pub fn compact_board(&self, actor: &str, board_id: &str) -> Result<usize> {
        self.store.transaction(|| {
            let board = require_board(self.store, board_id)?;
            ensure(access::can_update_board(actor, &board), "compact this board")?;

            let mut updated = 0;
            for column in self.store.columns_for_board(&board.id)? {
                self.store.lock_column(&column.id)?;
                let changes = ordering::compact_positions(&self.store.cards_in_column(&column.id)?);
                self.store.set_card_positions(&column.id, &changes)?;
                updated += changes.len();
            }

            info!(board_id, updated, "board compacted");
            Ok(updated)
        })
    }

    pub fn delete_board(&self, actor: &str, board_id: &str) -> Result<bool> {
        self.store.transaction(|| {
            let board = require_board(self.store, board_id)?;
            ensure(access::can_delete_board(actor, &board), "delete this board")?;

            let deleted = self.store.delete_board(&board.id)?;
            info!(board_id, "board deleted");
            Ok(deleted)
        })
    }

    fn reconcile_columns(&self, board: &Board, requested: &[ColumnInput]) -> Result<ColumnPlan> {
        let existing = self.store.columns_for_board(&board.id)?;
        let mut column_ids: Vec<String> = existing.iter().map(|c| c.id.clone()).collect();
        column_ids.sort_unstable();
        // Card creation takes the same lock, so counts hold until commit.
        for column_id in &column_ids {
            self.store.lock_column(column_id)?;
        }
        let card_counts = self.store.card_counts(&column_ids)?;

        let plan = ordering::plan_column_reconciliation(&board.id, &existing, &card_counts, requested)?;

        let deleted: Vec<String> = plan.delete.iter().map(|c| c.id.clone()).collect();
        self.store.delete_columns(&deleted)?;
        for column in &plan.update {
            self.store.update_column(column)?;
        }
        for column in &plan.create {
            self.store.insert_column(column)?;
        }

        info!(
            board_id = %board.id,
            deleted = plan.delete.len(),
            created = plan.create.len(),
            updated = plan.update.len(),
            "columns reconciled"
        );
        Ok(plan)
    }

    fn details(&self, board: Board) -> Result<BoardDetails> {
        let columns = self.store.columns_for_board(&board.id)?;
        let mut cards = self.store.cards_for_board(&board.id)?;
        cards.sort_by_key(|card| card.position);

        let columns = columns
            .into_iter()
            .map(|column| {
                let cards = cards
                    .iter()
                    .filter(|card| card.column_id == column.id)
                    .cloned()
                    .collect();
                ColumnWithCards { column, cards }
            })
            .collect();

        Ok(BoardDetails { board, columns })
    }
}

fn validate_board_fields(name: &str, description: Option<&str>) -> Result<()> {
    let mut errors = FieldErrors::new();
    validation::required(&mut errors, "name", "name", name, BOARD_NAME_MAX);
    validation::optional(&mut errors, "description", "description", description, BOARD_DESCRIPTION_MAX);
    errors.into_result()
}
