use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("corrupt exchange value in database row: {0}")]
    InvalidExchange(String),
    #[error("corrupt interval value in database row: {0}")]
    InvalidInterval(String),
}
