//! Universe initialization: C1's exchange catalogs through C2's presence
//! matrix into C3's `pairs`/`pair_exchanges` tables (spec §4.2, §6
//! `POST /spreads/init-pairs`).

use crate::Engine;
use arbspread_config::Exchange;
use arbspread_universe::build_universe;
use std::collections::BTreeMap;

impl Engine {
    /// Populates the catalog from exchange metadata: lists every given
    /// exchange's symbols (C1), builds the arbitrable-pair universe (C2),
    /// then upserts pairs and `(pair, exchange)` tuples (C3). Idempotent —
    /// re-running against an unchanged universe is a no-op thanks to C3's
    /// insert-ignore semantics (spec §4.3, §7).
    pub async fn init_pairs(&self, exchanges: &[Exchange]) -> anyhow::Result<()> {
        let catalogs = self.gateway.list_exchanges_with_symbols(exchanges).await;
        let universe = build_universe(&catalogs, self.settings.arbitrability_threshold.max(1) as usize);

        let pair_names: Vec<String> = universe.iter().map(|pair| pair.name.clone()).collect();
        self.catalog.upsert_pairs(&pair_names).await?;

        // Re-group by exchange: `upsert_pair_exchanges` takes one exchange
        // and the pair names it supports, matching C3's bulk-insert shape
        // (spec §4.3).
        let mut by_exchange: BTreeMap<Exchange, Vec<String>> = BTreeMap::new();
        for pair in &universe {
            for exchange in &pair.exchanges {
                by_exchange.entry(*exchange).or_default().push(pair.name.clone());
            }
        }
        for (exchange, names) in by_exchange {
            self.catalog.upsert_pair_exchanges(exchange, &names).await?;
        }

        Ok(())
    }
}
