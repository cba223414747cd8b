use crate::error::CatalogError;
use crate::rows::{BatchStatus, ComputedSpreadRow, PairExchangeRow};
use arbspread_config::{Exchange, Interval};
use arbspread_types::{PairId, PeId, SpreadMax};
use sqlx::postgres::PgPool;
use sqlx::Row;
use std::str::FromStr;

/// The Persistent Catalog (C3): relational store of pair names,
/// `(pair, exchange)` tuples, per-run task status, and computed spreads.
/// C3 owns the `batch_task` and `spread_max` tables; no other component
/// mutates them directly (spec §3 Ownership).
#[derive(Clone)]
pub struct Catalog {
    pool: PgPool,
}

impl Catalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert-ignore on conflict, bulk and deterministic (spec §4.3).
    pub async fn upsert_pairs(&self, names: &[String]) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO pairs (name)
            SELECT * FROM UNNEST($1::text[])
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(names)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Joins against the pair table by name and inserts `(pair_id, exchange)`
    /// tuples, ignoring the unique `(pair_id, exchange)` conflict.
    pub async fn upsert_pair_exchanges(&self, exchange: Exchange, names: &[String]) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            INSERT INTO pair_exchanges (pair_id, exchange)
            SELECT p.id, $2
            FROM pairs p
            WHERE p.name = ANY($1::text[])
            ON CONFLICT (pair_id, exchange) DO NOTHING
            "#,
        )
        .bind(names)
        .bind(exchange.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// `GROUP BY pair_id HAVING COUNT(*) >= threshold` (spec §4.3), projected
    /// back out to the full PE row set for every qualifying pair.
    pub async fn select_arbitrable(&self, threshold: i64) -> Result<Vec<PairExchangeRow>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT pe.id AS pe_id, pe.pair_id AS pair_id, p.name AS pair_name, pe.exchange AS exchange
            FROM pair_exchanges pe
            JOIN pairs p ON p.id = pe.pair_id
            WHERE pe.pair_id IN (
                SELECT pair_id FROM pair_exchanges GROUP BY pair_id HAVING COUNT(*) >= $1
            )
            ORDER BY p.name
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_pe_row).collect()
    }

    /// All PE rows for one pair, looked up by name — the shape the
    /// on-demand "compare" query (SPEC_FULL §B) needs since it is not
    /// given a `pair_id` up front. Ordered by `pe_id` for the same
    /// determinism reason as `pe_ids_for_pair`.
    pub async fn pair_exchanges_by_name(&self, pair_name: &str) -> Result<Vec<PairExchangeRow>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT pe.id AS pe_id, pe.pair_id AS pair_id, p.name AS pair_name, pe.exchange AS exchange
            FROM pair_exchanges pe
            JOIN pairs p ON p.id = pe.pair_id
            WHERE p.name = $1
            ORDER BY pe.id
            "#,
        )
        .bind(pair_name)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(decode_pe_row).collect()
    }

    /// All PE ids belonging to one already-known pair, ordered by `pe_id`.
    /// This ordering is what feeds the spread engine's input-order tie
    /// break (spec §4.8), so it must be deterministic across calls.
    pub async fn pe_ids_for_pair(&self, pair_id: PairId) -> Result<Vec<PeId>, CatalogError> {
        let rows = sqlx::query("SELECT pe_id FROM batch_task WHERE pair_id = $1 ORDER BY pe_id")
            .bind(pair_id.0)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(|row| Ok(PeId(row.try_get::<i64, _>("pe_id")?))).collect()
    }

    /// Truncates `batch_task` and `spread_max` (clearing the previous run's
    /// progress) then bulk-inserts one fresh row per PE with every flag
    /// false (spec §4.3).
    pub async fn init_batch(&self, rows: &[PairExchangeRow], interval: Interval) -> Result<(), CatalogError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("TRUNCATE TABLE batch_task").execute(&mut *tx).await?;
        sqlx::query("TRUNCATE TABLE spread_max").execute(&mut *tx).await?;

        let pe_ids: Vec<i64> = rows.iter().map(|r| r.pe_id.0).collect();
        let pair_ids: Vec<i64> = rows.iter().map(|r| r.pair_id.0).collect();
        sqlx::query(
            r#"
            INSERT INTO batch_task (pe_id, pair_id, interval, cached, computed, persisted)
            SELECT t.pe_id, t.pair_id, $3, FALSE, FALSE, FALSE
            FROM UNNEST($1::bigint[], $2::bigint[]) AS t(pe_id, pair_id)
            "#,
        )
        .bind(&pe_ids)
        .bind(&pair_ids)
        .bind(interval.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Batch update `cached := true` for the given PE ids.
    pub async fn mark_cached(&self, pe_ids: &[PeId]) -> Result<(), CatalogError> {
        if pe_ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = pe_ids.iter().map(|id| id.0).collect();
        sqlx::query("UPDATE batch_task SET cached = TRUE WHERE pe_id = ANY($1::bigint[])")
            .bind(&ids)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Pairs newly ready for compute: `AND(cached) = true` over the
    /// *complete* fan of the pair (not just the current chunk) and
    /// `OR(computed) = false` (spec §4.3's key cross-chunk invariant).
    pub async fn scan_ready(&self, pe_ids: &[PeId]) -> Result<Vec<PairId>, CatalogError> {
        if pe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = pe_ids.iter().map(|id| id.0).collect();
        let rows = sqlx::query(
            r#"
            SELECT pair_id
            FROM batch_task
            WHERE pair_id IN (
                SELECT DISTINCT pair_id FROM batch_task WHERE pe_id = ANY($1::bigint[])
            )
            GROUP BY pair_id
            HAVING bool_and(cached) AND NOT bool_or(computed)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| Ok(PairId(row.try_get::<i64, _>("pair_id")?))).collect()
    }

    /// Transactional upsert into `spread_max` plus the pair-wide
    /// `computed := true` flip (spec §4.3). `ON CONFLICT DO UPDATE` keeps
    /// this safe against concurrent dispatchers racing past `scan_ready`
    /// for the same pair (spec §4.6).
    pub async fn save_spread_and_mark(&self, spread: &SpreadMax) -> Result<(), CatalogError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO spread_max (pair_id, time, high_pe_id, low_pe_id, spread_percent)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (pair_id) DO UPDATE SET
                time = EXCLUDED.time,
                high_pe_id = EXCLUDED.high_pe_id,
                low_pe_id = EXCLUDED.low_pe_id,
                spread_percent = EXCLUDED.spread_percent
            "#,
        )
        .bind(spread.pair_id.0)
        .bind(spread.time)
        .bind(spread.high_pe_id.0)
        .bind(spread.low_pe_id.0)
        .bind(spread.spread_percent)
        .execute(&mut *tx)
        .await?;

        // `persisted` is written in lock-step with `computed` (spec §4.3,
        // §9 Open Questions) — reserved for a future durability-stage split.
        sqlx::query("UPDATE batch_task SET computed = TRUE, persisted = TRUE WHERE pair_id = $1")
            .bind(spread.pair_id.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Aggregate counts for `GET /spreads/batch-status` (spec §6).
    pub async fn batch_status(&self) -> Result<BatchStatus, CatalogError> {
        let row = sqlx::query(
            r#"
            WITH per_pair AS (
                SELECT pair_id, bool_and(cached) AS fully_cached, bool_or(computed) AS computed
                FROM batch_task
                GROUP BY pair_id
            )
            SELECT
                COUNT(*) AS total_pairs,
                COUNT(*) FILTER (WHERE fully_cached) AS cached,
                COUNT(*) FILTER (WHERE computed) AS spreads_computed
            FROM per_pair
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(BatchStatus {
            total_pairs: row.try_get("total_pairs")?,
            cached: row.try_get("cached")?,
            spreads_computed: row.try_get("spreads_computed")?,
        })
    }

    /// All `SpreadMax` rows joined with pair & exchange names, ordered by
    /// `spread_percent` descending (spec §6).
    pub async fn computed_spreads(&self) -> Result<Vec<ComputedSpreadRow>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT p.name AS pair_name, s.time AS time,
                   he.exchange AS high_exchange, le.exchange AS low_exchange,
                   s.spread_percent AS spread_percent
            FROM spread_max s
            JOIN pairs p ON p.id = s.pair_id
            JOIN pair_exchanges he ON he.id = s.high_pe_id
            JOIN pair_exchanges le ON le.id = s.low_pe_id
            ORDER BY s.spread_percent DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let high_str: String = row.try_get("high_exchange")?;
                let low_str: String = row.try_get("low_exchange")?;
                Ok(ComputedSpreadRow {
                    pair_name: row.try_get("pair_name")?,
                    time: row.try_get("time")?,
                    high_exchange: Exchange::from_str(&high_str).map_err(|_| CatalogError::InvalidExchange(high_str))?,
                    low_exchange: Exchange::from_str(&low_str).map_err(|_| CatalogError::InvalidExchange(low_str))?,
                    spread_percent: row.try_get("spread_percent")?,
                })
            })
            .collect()
    }
}

fn decode_pe_row(row: sqlx::postgres::PgRow) -> Result<PairExchangeRow, CatalogError> {
    let exchange_str: String = row.try_get("exchange")?;
    let exchange = Exchange::from_str(&exchange_str).map_err(|_| CatalogError::InvalidExchange(exchange_str))?;
    Ok(PairExchangeRow {
        pe_id: PeId(row.try_get::<i64, _>("pe_id")?),
        pair_id: PairId(row.try_get::<i64, _>("pair_id")?),
        pair_name: row.try_get("pair_name")?,
        exchange,
    })
}
