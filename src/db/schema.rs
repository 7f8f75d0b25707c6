table! {
    users (id) {
        id -> Bpchar,
        name -> Varchar,
        email -> Varchar,
    }
}

table! {
    boards (id) {
        id -> Bpchar,
        name -> Varchar,
        description -> Nullable<Text>,
        status -> Varchar,
        owner_id -> Bpchar,
    }
}

table! {
    board_columns (id) {
        id -> Bpchar,
        board_id -> Bpchar,
        name -> Varchar,
        color -> Nullable<Varchar>,
        position -> Int4,
    }
}

table! {
    cards (id) {
        id -> Bpchar,
        board_id -> Bpchar,
        column_id -> Bpchar,
        title -> Varchar,
        description -> Nullable<Text>,
        position -> Int4,
        assigned_user_id -> Nullable<Bpchar>,
        created_by -> Bpchar,
    }
}

table! {
    board_shares (id) {
        id -> Bpchar,
        board_id -> Bpchar,
        user_id -> Bpchar,
    }
}

table! {
    comments (id) {
        id -> Bpchar,
        card_id -> Bpchar,
        user_id -> Bpchar,
        content -> Text,
        created_at -> Timestamp,
    }
}

joinable!(boards -> users (owner_id));
joinable!(board_columns -> boards (board_id));
joinable!(cards -> board_columns (column_id));
joinable!(board_shares -> boards (board_id));
joinable!(comments -> cards (card_id));

allow_tables_to_appear_in_same_query!(
    users,
    boards,
    board_columns,
    cards,
    board_shares,
    comments,
);
