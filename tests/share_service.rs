mod common;

use kanban::error::KanbanError;
use kanban::services::{BoardService, ShareService};
use kanban::store::{KanbanStore, MemoryStore};

use common::*;

fn search(store: &MemoryStore, query: &str, limit: Option<usize>) -> Vec<String> {
    ShareService::new(store)
        .search_users(query, limit)
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect()
}

#[test]
fn owner_cannot_share_with_themselves() {
    let store = seeded_store();
    let details = create_board(&store, OWNER, "Sprint 1");

    let err = ShareService::new(&store)
        .share_board(OWNER, &details.board.id, OWNER)
        .unwrap_err();
    match err {
        KanbanError::InvalidState { field, message } => {
            assert_eq!(field, "user_id");
            assert_eq!(message, "Cannot share board with the owner");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(store.shares_for_board(&details.board.id).unwrap().is_empty());
}

#[test]
fn a_user_is_shared_at_most_once() {
    let store = seeded_store();
    let details = create_board(&store, OWNER, "Sprint 1");
    let service = ShareService::new(&store);

    let share = service.share_board(OWNER, &details.board.id, ALICE).unwrap();
    assert_eq!(share.user_id, ALICE);
    assert_eq!(share.board_id, details.board.id);

    let err = service
        .share_board(OWNER, &details.board.id, ALICE)
        .unwrap_err();
    assert_eq!(err.to_string(), "Board is already shared with this user");
    assert_eq!(store.shares_for_board(&details.board.id).unwrap().len(), 1);
}

#[test]
fn sharing_locks_the_board_before_checking_duplicates() {
    let store = seeded_store();
    let details = create_board(&store, OWNER, "Sprint 1");
    store.take_locks();

    share(&store, &details, ALICE);
    assert_eq!(store.take_locks(), vec![details.board.id.clone()]);

    let err = ShareService::new(&store)
        .share_board(OWNER, "missing", BOB)
        .unwrap_err();
    assert!(matches!(err, KanbanError::NotFound { resource: "board", .. }));
}

#[test]
fn sharing_requires_owner_and_known_user() {
    let store = seeded_store();
    let details = create_board(&store, OWNER, "Sprint 1");
    share(&store, &details, ALICE);
    let service = ShareService::new(&store);

    let err = service
        .share_board(ALICE, &details.board.id, BOB)
        .unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));

    let err = service
        .share_board(OWNER, &details.board.id, "ghost")
        .unwrap_err();
    assert!(matches!(err, KanbanError::NotFound { resource: "user", .. }));
}

#[test]
fn shared_user_sees_board_until_share_is_removed() {
    let store = seeded_store();
    let details = create_board(&store, OWNER, "Sprint 1");
    share(&store, &details, ALICE);
    share(&store, &details, BOB);

    let shared = ShareService::new(&store)
        .list_shares(ALICE, &details.board.id)
        .unwrap();
    let mut users: Vec<&str> = shared.iter().map(|(_, user)| user.id.as_str()).collect();
    users.sort_unstable();
    assert_eq!(users, vec![ALICE, BOB]);

    let alice_share = shared
        .iter()
        .find(|(share, _)| share.user_id == ALICE)
        .map(|(share, _)| share.id.clone())
        .unwrap();
    let bob_share = shared
        .iter()
        .find(|(share, _)| share.user_id == BOB)
        .map(|(share, _)| share.id.clone())
        .unwrap();

    // Alice may leave, but cannot remove Bob.
    let err = ShareService::new(&store)
        .remove_share(ALICE, &bob_share)
        .unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));
    assert!(ShareService::new(&store).remove_share(ALICE, &alice_share).unwrap());

    let err = BoardService::new(&store)
        .get_board(ALICE, &details.board.id)
        .unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));

    assert!(ShareService::new(&store).remove_share(OWNER, &bob_share).unwrap());
    assert!(store.shares_for_board(&details.board.id).unwrap().is_empty());
}

#[test]
fn strangers_cannot_list_shares() {
    let store = seeded_store();
    let details = create_board(&store, OWNER, "Sprint 1");

    let err = ShareService::new(&store)
        .list_shares(MALLORY, &details.board.id)
        .unwrap_err();
    assert!(matches!(err, KanbanError::AuthorizationDenied { .. }));
}

#[test]
fn short_queries_find_nobody() {
    let store = seeded_store();
    assert!(search(&store, "", None).is_empty());
    assert!(search(&store, " a ", None).is_empty());
    assert_eq!(search(&store, "ba", None), vec![BOB]);
}

#[test]
fn search_matches_email_and_honours_limit() {
    let store = seeded_store();
    for i in 0..60 {
        store.insert_user(user(&format!("tester{:02}", i), &format!("Tester {:02}", i)));
    }

    assert_eq!(search(&store, "ALICE@example", None), vec![ALICE]);
    assert_eq!(search(&store, "tester", None).len(), 10);
    assert_eq!(search(&store, "tester", Some(3)).len(), 3);
    assert_eq!(search(&store, "tester", Some(500)).len(), 50);
}
