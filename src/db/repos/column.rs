use crate::db;
use db::models::ColumnRow;
use db::schema::board_columns;

use diesel::{
    RunQueryDsl,
    QueryDsl,
    QueryResult,
    PgConnection,
    ExpressionMethods,
    OptionalExtension,
    insert_into,
    update,
    delete
};

pub trait FindColumn {
    fn find(column_id: &str, db_connection: &PgConnection) -> QueryResult<Option<ColumnRow>>;

    fn for_board(board_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<ColumnRow>>;

    /// Takes a row lock on the column for the rest of the transaction.
    /// Returns false when the column no longer exists.
    fn lock(column_id: &str, db_connection: &PgConnection) -> QueryResult<bool>;
}

impl FindColumn for ColumnRow {
    fn find(column_id: &str, db_connection: &PgConnection) -> QueryResult<Option<ColumnRow>> {
        board_columns::table
            .find(column_id)
            .first::<ColumnRow>(db_connection)
            .optional()
    }

    fn for_board(board_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<ColumnRow>> {
        board_columns::table
            .filter(board_columns::board_id.eq(board_id))
            .order(board_columns::position.asc())
            .load::<ColumnRow>(db_connection)
    }

    fn lock(column_id: &str, db_connection: &PgConnection) -> QueryResult<bool> {
        let locked = board_columns::table
            .find(column_id)
            .select(board_columns::id)
            .for_update()
            .first::<String>(db_connection)
            .optional()?;
        Ok(locked.is_some())
    }
}

pub trait CreateColumn {
    fn create(new_column: &ColumnRow, db_connection: &PgConnection) -> QueryResult<()>;
}

impl CreateColumn for ColumnRow {
    fn create(new_column: &ColumnRow, db_connection: &PgConnection) -> QueryResult<()> {
        insert_into(board_columns::table)
            .values(new_column)
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait UpdateColumn {
    fn update(column: &ColumnRow, db_connection: &PgConnection) -> QueryResult<()>;

    fn set_position(column_id: &str, position: i32, db_connection: &PgConnection) -> QueryResult<()>;
}

impl UpdateColumn for ColumnRow {
    fn update(column: &ColumnRow, db_connection: &PgConnection) -> QueryResult<()> {
        update(board_columns::table.find(&column.id))
            .set(column)
            .execute(db_connection)?;
        Ok(())
    }

    fn set_position(column_id: &str, position: i32, db_connection: &PgConnection) -> QueryResult<()> {
        update(board_columns::table.find(column_id))
            .set(board_columns::position.eq(position))
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait DeleteColumn {
    fn delete_many(column_ids: &[String], db_connection: &PgConnection) -> QueryResult<usize>;
}

impl DeleteColumn for ColumnRow {
    fn delete_many(column_ids: &[String], db_connection: &PgConnection) -> QueryResult<usize> {
        if column_ids.is_empty() {
            return Ok(0);
        }
        delete(board_columns::table.filter(board_columns::id.eq_any(column_ids)))
            .execute(db_connection)
    }
}
