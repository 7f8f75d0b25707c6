use crate::db;
use db::models::ShareRow;
use db::schema::board_shares;

use diesel::{
    RunQueryDsl,
    QueryDsl,
    QueryResult,
    PgConnection,
    ExpressionMethods,
    OptionalExtension,
    insert_into,
    delete
};

pub trait FindShare {
    fn find(share_id: &str, db_connection: &PgConnection) -> QueryResult<Option<ShareRow>>;

    fn for_board(board_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<ShareRow>>;
}

impl FindShare for ShareRow {
    fn find(share_id: &str, db_connection: &PgConnection) -> QueryResult<Option<ShareRow>> {
        board_shares::table
            .find(share_id)
            .first::<ShareRow>(db_connection)
            .optional()
    }

    fn for_board(board_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<ShareRow>> {
        board_shares::table
            .filter(board_shares::board_id.eq(board_id))
            .load::<ShareRow>(db_connection)
    }
}

pub trait CreateShare {
    fn create(new_share: &ShareRow, db_connection: &PgConnection) -> QueryResult<()>;
}

impl CreateShare for ShareRow {
    fn create(new_share: &ShareRow, db_connection: &PgConnection) -> QueryResult<()> {
        insert_into(board_shares::table)
            .values(new_share)
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait DeleteShare {
    fn delete(share_id: &str, db_connection: &PgConnection) -> QueryResult<bool>;
}

impl DeleteShare for ShareRow {
    fn delete(share_id: &str, db_connection: &PgConnection) -> QueryResult<bool> {
        let deleted = delete(board_shares::table.find(share_id))
            .execute(db_connection)?;
        Ok(deleted > 0)
    }
}
