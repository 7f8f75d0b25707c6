//! Position arithmetic for cards inside a column and columns inside a board.
//!
//! Positions are zero-based ordering keys. Every function here is pure: it
//! receives rows as they are stored and returns the rows that must be
//! rewritten, leaving persistence to the caller.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Card, Column, ColumnInput, ColumnPosition};
use crate::error::{FieldErrors, KanbanError, Result};
use crate::validation::{self, COLUMN_NAME_MAX};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionChange {
    pub id: String,
    pub position: i32,
}

impl PositionChange {
    pub fn new(id: &str, position: i32) -> Self {
        Self {
            id: id.to_string(),
            position,
        }
    }
}

/// Position for a card appended to a column holding `positions`.
pub fn append_position<I>(positions: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    positions.into_iter().max().map_or(0, |max| max + 1)
}

/// Clamps a requested insertion index into `[0, len]`.
pub fn clamp_index(target: i32, len: usize) -> usize {
    if target <= 0 {
        0
    } else {
        (target as usize).min(len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// Final position of the moved card.
    pub position: i32,
    /// Other cards of the target column whose position changes.
    pub reordered: Vec<PositionChange>,
}

/// Inserts `card_id` into the target column at `target` and renumbers the
/// column densely.
///
/// `column_cards` are the cards currently stored in the target column. The
/// moved card is excluded from them by id, so the same function serves moves
/// inside one column and across columns. The source column of a cross-column
/// move is left as is.
pub fn plan_card_move(column_cards: &[Card], card_id: &str, target: i32) -> MovePlan {
    let mut others: Vec<&Card> = column_cards.iter().filter(|c| c.id != card_id).collect();
    others.sort_by_key(|c| c.position);

    let index = clamp_index(target, others.len());
    let reordered = others
        .iter()
        .enumerate()
        .filter_map(|(i, card)| {
            let position = (if i < index { i } else { i + 1 }) as i32;
            (card.position != position).then(|| PositionChange::new(&card.id, position))
        })
        .collect();

    MovePlan {
        position: index as i32,
        reordered,
    }
}

/// Renumbers `cards` to `0..n` keeping their relative order.
pub fn compact_positions(cards: &[Card]) -> Vec<PositionChange> {
    let mut ordered: Vec<&Card> = cards.iter().collect();
    ordered.sort_by_key(|c| c.position);

    ordered
        .iter()
        .enumerate()
        .filter(|(i, card)| card.position != *i as i32)
        .map(|(i, card)| PositionChange::new(&card.id, i as i32))
        .collect()
}

/// Writes needed to turn a board's column set into a requested one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    pub delete: Vec<Column>,
    pub create: Vec<Column>,
    pub update: Vec<Column>,
}

impl ColumnPlan {
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty() && self.create.is_empty() && self.update.is_empty()
    }
}

/// Validates a requested column set against the board's current columns and
/// computes the writes that realise it.
///
/// Existing columns missing from `requested` are deleted; entries without an
/// id are created; the rest are renamed and repositioned in place. Resulting
/// positions follow the requested order and are renumbered `0..n`.
///
/// Nothing is planned unless every rule holds: at least one column remains,
/// names are present and unique (trimmed, case-insensitive), every id belongs
/// to the board and appears once, and no deleted column still holds cards.
/// `card_counts` maps column ids to the number of cards they hold.
pub fn plan_column_reconciliation(
    board_id: &str,
    existing: &[Column],
    card_counts: &HashMap<String, usize>,
    requested: &[ColumnInput],
) -> Result<ColumnPlan> {
    let mut errors = FieldErrors::new();
    let by_id: HashMap<&str, &Column> = existing.iter().map(|c| (c.id.as_str(), c)).collect();

    if requested.is_empty() {
        errors.add("columns", "A board must have at least one column.");
    }

    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();
    for (i, entry) in requested.iter().enumerate() {
        let name_field = format!("columns.{}.name", i);
        validation::required(&mut errors, &name_field, "column name", &entry.name, COLUMN_NAME_MAX);

        let key = entry.name.trim().to_lowercase();
        if !key.is_empty() && !seen_names.insert(key) {
            errors.add(&name_field, "The column name has already been taken.");
        }

        if let Some(id) = entry.id.as_deref() {
            let id_field = format!("columns.{}.id", i);
            if !by_id.contains_key(id) {
                errors.add(&id_field, "The selected column does not belong to this board.");
            } else if !seen_ids.insert(id) {
                errors.add(&id_field, "The column is listed more than once.");
            }
        }
    }

    let delete: Vec<Column> = existing
        .iter()
        .filter(|c| !seen_ids.contains(c.id.as_str()))
        .cloned()
        .collect();
    for column in &delete {
        let count = card_counts.get(&column.id).copied().unwrap_or(0);
        if count > 0 {
            errors.add(
                "columns",
                format!(
                    "The column '{}' still has {} card(s) and cannot be deleted.",
                    column.name, count
                ),
            );
        }
    }

    errors.into_result()?;

    let mut order: Vec<usize> = (0..requested.len()).collect();
    order.sort_by_key(|&i| (requested[i].position, i));

    let mut plan = ColumnPlan {
        delete,
        ..ColumnPlan::default()
    };
    for (position, &i) in order.iter().enumerate() {
        let entry = &requested[i];
        let position = position as i32;
        let name = entry.name.trim();

        match entry.id.as_deref().and_then(|id| by_id.get(id)) {
            Some(current) => {
                let mut updated = (*current).clone();
                updated.name = name.to_string();
                updated.position = position;
                if entry.color.is_some() {
                    updated.color = entry.color.clone();
                }
                if updated != **current {
                    plan.update.push(updated);
                }
            }
            None => plan
                .create
                .push(Column::new(board_id, name, entry.color.clone(), position)),
        }
    }

    debug!(
        board_id,
        deleted = plan.delete.len(),
        created = plan.create.len(),
        updated = plan.update.len(),
        "planned column reconciliation"
    );
    Ok(plan)
}

/// Position rewrites for the reorder endpoint. Positions are applied as given,
/// provided no two columns of the board end up on the same position.
pub fn plan_column_reorder(
    existing: &[Column],
    requested: &[ColumnPosition],
) -> Result<Vec<PositionChange>> {
    let mut errors = FieldErrors::new();
    let by_id: HashMap<&str, &Column> = existing.iter().map(|c| (c.id.as_str(), c)).collect();
    let mut seen = HashSet::new();

    for (i, entry) in requested.iter().enumerate() {
        let id_field = format!("columns.{}.id", i);
        if !by_id.contains_key(entry.id.as_str()) {
            errors.add(&id_field, "The selected column does not belong to this board.");
        } else if !seen.insert(entry.id.as_str()) {
            errors.add(&id_field, "The column is listed more than once.");
        }
        if entry.position < 0 {
            errors.add(
                format!("columns.{}.position", i),
                "The position must be at least 0.",
            );
        }
    }
    errors.into_result()?;

    // Positions of the board's columns once the request is applied.
    let mut resulting: HashMap<&str, i32> = existing.iter().map(|c| (c.id.as_str(), c.position)).collect();
    for entry in requested {
        resulting.insert(entry.id.as_str(), entry.position);
    }
    let mut taken = HashSet::new();
    if !resulting.values().all(|position| taken.insert(*position)) {
        return Err(KanbanError::invalid_field(
            "columns",
            "Two columns cannot share the same position.",
        ));
    }

    Ok(requested
        .iter()
        .filter(|entry| by_id[entry.id.as_str()].position != entry.position)
        .map(|entry| PositionChange::new(&entry.id, entry.position))
        .collect())
}
