use crate::error::CatalogError;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Connects to Postgres and applies any pending migrations. Called once at
/// process startup (cli crate); everything else takes the resulting pool by
/// reference.
pub async fn connect(url: &str) -> Result<PgPool, CatalogError> {
    let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}
