mod common;

use kanban::domain::{CardUpdate, NewCard};
use kanban::error::KanbanError;
use kanban::events::{DomainEvent, RecordingSink};
use kanban::services::{CardService, ShareService};

use common::*;

fn new_card(details: &kanban::domain::BoardDetails, column: usize, title: &str) -> NewCard {
    NewCard {
        board_id: details.board.id.clone(),
        column_id: column_id(details, column),
        title: title.to_string(),
        ..NewCard::default()
    }
}

#[test]
fn cards_append_from_zero() {
    let store = seeded_store();
    let details = create_board(&store, OWNER, "Sprint 1");

    let positions: Vec<i32> = ["A", "B", "C"]
        .iter()
        .map(|title| add_card(&store, OWNER, &details, 0, title).position)
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);

    let other = add_card(&store, OWNER, &details, 1, "D");
    assert_eq!(other.position, 0);
    assert_eq!(other.created_by, OWNER);
}

#[test]
fn moving_within_column_reorders_densely() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    add_card(&store, OWNER, &details, 0, "A");
    add_card(&store, OWNER, &details, 0, "B");
    let c = add_card(&store, OWNER, &details, 0, "C");

    let moved = CardService::new(&store, &sink)
        .move_card(OWNER, &c.id, &column_id(&details, 0), 0)
        .unwrap();

    assert_eq!(moved.position, 0);
    assert_eq!(
        titles(&store, &details, 0),
        pairs(&[("C", 0), ("A", 1), ("B", 2)])
    );
}

#[test]
fn moving_across_columns_renumbers_target_and_announces_move() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    add_card(&store, OWNER, &details, 0, "A");
    let b = add_card(&store, OWNER, &details, 0, "B");
    add_card(&store, OWNER, &details, 0, "C");
    add_card(&store, OWNER, &details, 1, "X");
    add_card(&store, OWNER, &details, 1, "Y");

    let moved = CardService::new(&store, &sink)
        .move_card(OWNER, &b.id, &column_id(&details, 1), 1)
        .unwrap();

    assert_eq!(moved.column_id, column_id(&details, 1));
    assert_eq!(
        titles(&store, &details, 1),
        pairs(&[("X", 0), ("B", 1), ("Y", 2)])
    );
    // The source column keeps its gap until compaction.
    assert_eq!(titles(&store, &details, 0), pairs(&[("A", 0), ("C", 2)]));

    assert_eq!(
        sink.events(),
        vec![DomainEvent::CardMoved {
            card_id: b.id.clone(),
            board_id: details.board.id.clone(),
            old_column_id: column_id(&details, 0),
            new_column_id: column_id(&details, 1),
            new_position: 1,
        }]
    );
}

#[test]
fn moves_lock_source_and_target_columns_in_id_order() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    let card = add_card(&store, OWNER, &details, 0, "A");
    store.take_locks();

    CardService::new(&store, &sink)
        .move_card(OWNER, &card.id, &column_id(&details, 2), 0)
        .unwrap();

    let mut expected = vec![column_id(&details, 0), column_id(&details, 2)];
    expected.sort();
    assert_eq!(store.take_locks(), expected);

    CardService::new(&store, &sink)
        .move_card(OWNER, &card.id, &column_id(&details, 2), 0)
        .unwrap();
    assert_eq!(store.take_locks(), vec![column_id(&details, 2)]);
}

#[test]
fn out_of_range_targets_are_clamped() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    let a = add_card(&store, OWNER, &details, 0, "A");
    add_card(&store, OWNER, &details, 0, "B");
    add_card(&store, OWNER, &details, 0, "C");
    let service = CardService::new(&store, &sink);

    let moved = service
        .move_card(OWNER, &a.id, &column_id(&details, 0), 99)
        .unwrap();
    assert_eq!(moved.position, 2);
    assert_eq!(
        titles(&store, &details, 0),
        pairs(&[("B", 0), ("C", 1), ("A", 2)])
    );

    let moved = service
        .move_card(OWNER, &a.id, &column_id(&details, 0), -5)
        .unwrap();
    assert_eq!(moved.position, 0);
    assert_eq!(
        titles(&store, &details, 0),
        pairs(&[("A", 0), ("B", 1), ("C", 2)])
    );
}

#[test]
fn cards_only_go_to_columns_of_their_board() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    let other = create_board(&store, OWNER, "Other");
    let card = add_card(&store, OWNER, &details, 0, "A");

    let mut request = new_card(&details, 0, "B");
    request.column_id = column_id(&other, 0);
    let err = CardService::new(&store, &sink)
        .create_card(OWNER, request)
        .unwrap_err();
    assert!(matches!(err, KanbanError::ValidationFailed(ref e) if e.contains("column_id")));

    let err = CardService::new(&store, &sink)
        .move_card(OWNER, &card.id, &column_id(&other, 0), 0)
        .unwrap_err();
    assert!(matches!(err, KanbanError::ValidationFailed(ref e) if e.contains("column_id")));
    assert!(sink.events().is_empty());
}

#[test]
fn strangers_cannot_touch_cards() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    let card = add_card(&store, OWNER, &details, 0, "A");
    let service = CardService::new(&store, &sink);

    let err = service
        .create_card(MALLORY, new_card(&details, 0, "B"))
        .unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));

    let err = service
        .move_card(MALLORY, &card.id, &column_id(&details, 1), 0)
        .unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));

    let err = service.delete_card(MALLORY, &card.id).unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));

    assert!(sink.events().is_empty());
    assert_eq!(titles(&store, &details, 0), pairs(&[("A", 0)]));
}

#[test]
fn shared_users_work_on_cards() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    share(&store, &details, ALICE);

    let card = CardService::new(&store, &sink)
        .create_card(ALICE, new_card(&details, 0, "Shared work"))
        .unwrap();
    assert_eq!(card.created_by, ALICE);

    let moved = CardService::new(&store, &sink)
        .move_card(ALICE, &card.id, &column_id(&details, 3), 0)
        .unwrap();
    assert_eq!(moved.column_id, column_id(&details, 3));
}

#[test]
fn assignee_must_be_a_board_participant() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    let service = CardService::new(&store, &sink);

    let mut request = new_card(&details, 0, "A");
    request.assigned_user_id = Some(BOB.to_string());
    let err = service.create_card(OWNER, request.clone()).unwrap_err();
    assert!(matches!(err, KanbanError::ValidationFailed(ref e) if e.contains("assigned_user_id")));

    request.assigned_user_id = Some("ghost".to_string());
    let err = service.create_card(OWNER, request.clone()).unwrap_err();
    assert!(matches!(err, KanbanError::ValidationFailed(ref e) if e.contains("assigned_user_id")));

    share(&store, &details, BOB);
    request.assigned_user_id = Some(BOB.to_string());
    let card = service.create_card(OWNER, request).unwrap();
    assert_eq!(card.assigned_user_id.as_deref(), Some(BOB));
}

#[test]
fn assignee_keeps_access_to_their_card_after_unsharing() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    share(&store, &details, BOB);

    let mut request = new_card(&details, 0, "Mine");
    request.assigned_user_id = Some(BOB.to_string());
    let assigned = CardService::new(&store, &sink)
        .create_card(OWNER, request)
        .unwrap();
    let unassigned = add_card(&store, OWNER, &details, 0, "Not mine");

    let shares = ShareService::new(&store)
        .list_shares(OWNER, &details.board.id)
        .unwrap();
    ShareService::new(&store)
        .remove_share(OWNER, &shares[0].0.id)
        .unwrap();

    let service = CardService::new(&store, &sink);
    assert_eq!(service.get_card(BOB, &assigned.id).unwrap().id, assigned.id);
    let err = service.get_card(BOB, &unassigned.id).unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));
}

#[test]
fn update_announces_changed_fields_only() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    let card = add_card(&store, OWNER, &details, 2, "Draft");
    let service = CardService::new(&store, &sink);

    let updated = service
        .update_card(
            OWNER,
            &card.id,
            CardUpdate {
                title: "Final".to_string(),
                ..CardUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Final");
    assert_eq!(updated.column_id, card.column_id);
    assert_eq!(updated.position, card.position);

    service
        .update_card(
            OWNER,
            &card.id,
            CardUpdate {
                title: "Final".to_string(),
                ..CardUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(
        sink.events(),
        vec![DomainEvent::CardUpdated {
            card_id: card.id.clone(),
            board_id: details.board.id.clone(),
            updated_fields: vec!["title".to_string()],
        }]
    );
}

#[test]
fn invalid_card_fields_are_reported_per_field() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");

    let mut request = new_card(&details, 0, "");
    request.description = Some("x".repeat(50_001));
    let err = CardService::new(&store, &sink)
        .create_card(OWNER, request)
        .unwrap_err();

    match err {
        KanbanError::ValidationFailed(errors) => {
            assert!(errors.contains("title"));
            assert!(errors.contains("description"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn deleting_a_card_leaves_sibling_positions() {
    let store = seeded_store();
    let sink = RecordingSink::new();
    let details = create_board(&store, OWNER, "Sprint 1");
    add_card(&store, OWNER, &details, 0, "A");
    let b = add_card(&store, OWNER, &details, 0, "B");
    add_card(&store, OWNER, &details, 0, "C");

    assert!(CardService::new(&store, &sink).delete_card(OWNER, &b.id).unwrap());
    assert_eq!(titles(&store, &details, 0), pairs(&[("A", 0), ("C", 2)]));

    let err = CardService::new(&store, &sink)
        .get_card(OWNER, &b.id)
        .unwrap_err();
    assert!(matches!(err, KanbanError::NotFound { .. }));
}
