use crate::db;
use db::models::BoardRow;
use db::schema::{board_columns, board_shares, boards, cards, comments};

use diesel::{
    RunQueryDsl,
    QueryDsl,
    QueryResult,
    PgConnection,
    Connection,
    ExpressionMethods,
    BoolExpressionMethods,
    OptionalExtension,
    insert_into,
    update,
    delete
};

pub trait FindBoard {
    fn find(board_id: &str, db_connection: &PgConnection) -> QueryResult<Option<BoardRow>>;

    fn visible_to(user_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<BoardRow>>;

    /// Row lock on the board until the transaction ends; false when it is gone.
    fn lock(board_id: &str, db_connection: &PgConnection) -> QueryResult<bool>;
}

impl FindBoard for BoardRow {
    fn find(board_id: &str, db_connection: &PgConnection) -> QueryResult<Option<BoardRow>> {
        boards::table
            .find(board_id)
            .first::<BoardRow>(db_connection)
            .optional()
    }

    fn visible_to(user_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<BoardRow>> {
        let shared_board_ids: Vec<String> = board_shares::table
            .filter(board_shares::user_id.eq(user_id))
            .select(board_shares::board_id)
            .load(db_connection)?;

        boards::table
            .filter(boards::owner_id.eq(user_id).or(boards::id.eq_any(&shared_board_ids)))
            .order(boards::name.asc())
            .load::<BoardRow>(db_connection)
    }

    fn lock(board_id: &str, db_connection: &PgConnection) -> QueryResult<bool> {
        let locked = boards::table
            .find(board_id)
            .select(boards::id)
            .for_update()
            .first::<String>(db_connection)
            .optional()?;
        Ok(locked.is_some())
    }
}

pub trait CreateBoard {
    fn create(new_board: &BoardRow, db_connection: &PgConnection) -> QueryResult<()>;
}

impl CreateBoard for BoardRow {
    fn create(new_board: &BoardRow, db_connection: &PgConnection) -> QueryResult<()> {
        insert_into(boards::table)
            .values(new_board)
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait UpdateBoard {
    fn update(board: &BoardRow, db_connection: &PgConnection) -> QueryResult<()>;
}

impl UpdateBoard for BoardRow {
    fn update(board: &BoardRow, db_connection: &PgConnection) -> QueryResult<()> {
        update(boards::table.find(&board.id))
            .set(board)
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait DeleteBoard {
    fn delete(board_id: &str, db_connection: &PgConnection) -> QueryResult<bool>;
}

impl DeleteBoard for BoardRow {
    /// Deletes the board and everything hanging off it, children first.
    fn delete(board_id: &str, db_connection: &PgConnection) -> QueryResult<bool> {
        db_connection.transaction(|| {
            let card_ids: Vec<String> = cards::table
                .filter(cards::board_id.eq(board_id))
                .select(cards::id)
                .load(db_connection)?;

            if !card_ids.is_empty() {
                delete(comments::table.filter(comments::card_id.eq_any(&card_ids)))
                    .execute(db_connection)?;
            }
            delete(cards::table.filter(cards::board_id.eq(board_id)))
                .execute(db_connection)?;
            delete(board_columns::table.filter(board_columns::board_id.eq(board_id)))
                .execute(db_connection)?;
            delete(board_shares::table.filter(board_shares::board_id.eq(board_id)))
                .execute(db_connection)?;

            let deleted = delete(boards::table.find(board_id))
                .execute(db_connection)?;
            Ok(deleted > 0)
        })
    }
}
