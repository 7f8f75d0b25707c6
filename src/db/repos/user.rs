use crate::db;
use db::models::UserRow;
use db::schema::users;

use diesel::{
    RunQueryDsl,
    QueryDsl,
    QueryResult,
    PgConnection,
    ExpressionMethods,
    BoolExpressionMethods,
    PgTextExpressionMethods,
    OptionalExtension,
};

pub trait FindUser {
    fn find(user_id: &str, db_connection: &PgConnection) -> QueryResult<Option<UserRow>>;

    fn search(query: &str, limit: i64, db_connection: &PgConnection) -> QueryResult<Vec<UserRow>>;
}

impl FindUser for UserRow {
    fn find(user_id: &str, db_connection: &PgConnection) -> QueryResult<Option<UserRow>> {
        users::table
            .find(user_id)
            .first::<UserRow>(db_connection)
            .optional()
    }

    fn search(query: &str, limit: i64, db_connection: &PgConnection) -> QueryResult<Vec<UserRow>> {
        let pattern = like_pattern(query);
        users::table
            .filter(users::name.ilike(&pattern).or(users::email.ilike(&pattern)))
            .order(users::name.asc())
            .limit(limit)
            .load::<UserRow>(db_connection)
    }
}

/// `%query%` with LIKE wildcards in `query` escaped.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ann"), "%ann%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
