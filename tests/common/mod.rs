#![allow(dead_code)]

use kanban::domain::{BoardDetails, Card, NewBoard, NewCard, UserSummary};
use kanban::events::RecordingSink;
use kanban::services::{BoardService, CardService, ShareService};
use kanban::store::MemoryStore;

pub const OWNER: &str = "owner";
pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const MALLORY: &str = "mallory";

pub fn user(id: &str, name: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", id),
    }
}

/// Store with a board owner and three other known users.
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_user(user(OWNER, "Olivia Owner"));
    store.insert_user(user(ALICE, "Alice Archer"));
    store.insert_user(user(BOB, "Bob Baker"));
    store.insert_user(user(MALLORY, "Mallory Mint"));
    store
}

pub fn create_board(store: &MemoryStore, owner: &str, name: &str) -> BoardDetails {
    BoardService::new(store)
        .create_board(
            owner,
            NewBoard {
                name: name.to_string(),
                description: None,
            },
        )
        .unwrap()
}

pub fn column_id(details: &BoardDetails, index: usize) -> String {
    details.columns[index].column.id.clone()
}

pub fn add_card(store: &MemoryStore, actor: &str, details: &BoardDetails, column: usize, title: &str) -> Card {
    let sink = RecordingSink::new();
    CardService::new(store, &sink)
        .create_card(
            actor,
            NewCard {
                board_id: details.board.id.clone(),
                column_id: column_id(details, column),
                title: title.to_string(),
                ..NewCard::default()
            },
        )
        .unwrap()
}

pub fn share(store: &MemoryStore, details: &BoardDetails, user_id: &str) {
    ShareService::new(store)
        .share_board(OWNER, &details.board.id, user_id)
        .unwrap();
}

/// Titles of a column's cards in position order.
pub fn titles(store: &MemoryStore, details: &BoardDetails, column: usize) -> Vec<(String, i32)> {
    let board = BoardService::new(store)
        .get_board(&details.board.owner_id, &details.board.id)
        .unwrap();
    let column_id = column_id(details, column);
    board
        .columns
        .into_iter()
        .find(|c| c.column.id == column_id)
        .map(|c| {
            c.cards
                .into_iter()
                .map(|card| (card.title, card.position))
                .collect()
        })
        .unwrap_or_default()
}

pub fn pairs(items: &[(&str, i32)]) -> Vec<(String, i32)> {
    items.iter().map(|(t, p)| (t.to_string(), *p)).collect()
}
