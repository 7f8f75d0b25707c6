use crate::db;
use db::models::CardRow;
use db::schema::{cards, comments};

use diesel::{
    RunQueryDsl,
    QueryDsl,
    QueryResult,
    PgConnection,
    Connection,
    ExpressionMethods,
    OptionalExtension,
    insert_into,
    update,
    delete
};

pub trait FindCard {
    fn find(card_id: &str, db_connection: &PgConnection) -> QueryResult<Option<CardRow>>;

    fn in_column(column_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<CardRow>>;

    fn for_board(board_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<CardRow>>;

    /// Column id of every card held by `column_ids`, one entry per card.
    fn column_ids_in(column_ids: &[String], db_connection: &PgConnection) -> QueryResult<Vec<String>>;
}

impl FindCard for CardRow {
    fn find(card_id: &str, db_connection: &PgConnection) -> QueryResult<Option<CardRow>> {
        cards::table
            .find(card_id)
            .first::<CardRow>(db_connection)
            .optional()
    }

    fn in_column(column_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<CardRow>> {
        cards::table
            .filter(cards::column_id.eq(column_id))
            .order(cards::position.asc())
            .load::<CardRow>(db_connection)
    }

    fn for_board(board_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<CardRow>> {
        cards::table
            .filter(cards::board_id.eq(board_id))
            .order((cards::column_id.asc(), cards::position.asc()))
            .load::<CardRow>(db_connection)
    }

    fn column_ids_in(column_ids: &[String], db_connection: &PgConnection) -> QueryResult<Vec<String>> {
        if column_ids.is_empty() {
            return Ok(Vec::new());
        }
        cards::table
            .filter(cards::column_id.eq_any(column_ids))
            .select(cards::column_id)
            .load::<String>(db_connection)
    }
}

pub trait CreateCard {
    fn create(new_card: &CardRow, db_connection: &PgConnection) -> QueryResult<()>;
}

impl CreateCard for CardRow {
    fn create(new_card: &CardRow, db_connection: &PgConnection) -> QueryResult<()> {
        insert_into(cards::table)
            .values(new_card)
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait UpdateCard {
    fn update(card: &CardRow, db_connection: &PgConnection) -> QueryResult<()>;

    /// Only rewrites the card while it still sits in `column_id`.
    fn set_position(card_id: &str, column_id: &str, position: i32, db_connection: &PgConnection) -> QueryResult<()>;
}

impl UpdateCard for CardRow {
    fn update(card: &CardRow, db_connection: &PgConnection) -> QueryResult<()> {
        update(cards::table.find(&card.id))
            .set(card)
            .execute(db_connection)?;
        Ok(())
    }

    fn set_position(card_id: &str, column_id: &str, position: i32, db_connection: &PgConnection) -> QueryResult<()> {
        update(
            cards::table
                .filter(cards::id.eq(card_id))
                .filter(cards::column_id.eq(column_id))
        )
            .set(cards::position.eq(position))
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait DeleteCard {
    fn delete(card_id: &str, db_connection: &PgConnection) -> QueryResult<bool>;
}

impl DeleteCard for CardRow {
    fn delete(card_id: &str, db_connection: &PgConnection) -> QueryResult<bool> {
        db_connection.transaction(|| {
            delete(comments::table.filter(comments::card_id.eq(card_id)))
                .execute(db_connection)?;
            let deleted = delete(cards::table.find(card_id))
                .execute(db_connection)?;
            Ok(deleted > 0)
        })
    }
}
