use crate::db;
use db::models::CommentRow;
use db::schema::comments;

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

pub trait FindComment {
    fn find(comment_id: &str, db_connection: &PgConnection) -> QueryResult<Option<CommentRow>>;

    fn for_card(card_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<CommentRow>>;
}

impl FindComment for CommentRow {
    fn find(comment_id: &str, db_connection: &PgConnection) -> QueryResult<Option<CommentRow>> {
        comments::table
            .find(comment_id)
            .first::<CommentRow>(db_connection)
            .optional()
    }

    fn for_card(card_id: &str, db_connection: &PgConnection) -> QueryResult<Vec<CommentRow>> {
        comments::table
            .filter(comments::card_id.eq(card_id))
            .order(comments::created_at.asc())
            .load::<CommentRow>(db_connection)
    }
}

pub trait CreateComment {
    fn create(new_comment: &CommentRow, db_connection: &PgConnection) -> QueryResult<()>;
}

impl CreateComment for CommentRow {
    fn create(new_comment: &CommentRow, db_connection: &PgConnection) -> QueryResult<()> {
        insert_into(comments::table)
            .values(new_comment)
            .execute(db_connection)?;
        Ok(())
    }
}

pub trait DeleteComment {
    fn delete(comment_id: &str, db_connection: &PgConnection) -> QueryResult<bool>;
}

impl DeleteComment for CommentRow {
    fn delete(comment_id: &str, db_connection: &PgConnection) -> QueryResult<bool> {
        let deleted = delete(comments::table.find(comment_id))
            .execute(db_connection)?;
        Ok(deleted > 0)
    }
}
