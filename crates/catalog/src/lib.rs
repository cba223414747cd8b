//! Persistent Catalog (C3): the single coordination point for batch
//! progress. All mutation goes through transactional statements; the cache
//! layer (C4) is best-effort but C3 is not (spec §5).

mod error;
mod pool;
mod repository;
mod rows;

pub use error::CatalogError;
pub use pool::connect;
pub use repository::Catalog;
pub use rows::{BatchStatus, ComputedSpreadRow, PairExchangeRow};
