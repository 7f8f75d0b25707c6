use diesel::{r2d2::{ConnectionManager, PoolError}, PgConnection};
use r2d2::Pool;

use crate::config::Config;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

fn init_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

pub fn establish_connection(config: &Config) -> Result<PgPool, PoolError> {
    init_pool(&config.database_url, config.db_pool_size)
}
