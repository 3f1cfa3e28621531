use crate::{config::Config, error::StoreError};
use actix_web::web;
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::PooledConnection;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Builds the pool without touching the database, so the service starts (and
/// shows the connection notice) even while the store is down.
pub fn build_pool(config: &Config) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    r2d2::Pool::builder()
        .max_size(config.pool_size)
        .connection_timeout(config.connect_timeout)
        .build_unchecked(manager)
}

pub fn get_db_conn(
    pool: &DbPool,
) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
    pool.get().map_err(StoreError::from)
}

/// Runs `f` on the blocking pool with one connection checked out for its
/// whole duration. The connection is returned on every exit path.
pub async fn with_conn<F, T>(pool: &DbPool, f: F) -> Result<T, StoreError>
where
    F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = get_db_conn(&pool)?;
        f(&mut conn)
    })
    .await?
}
