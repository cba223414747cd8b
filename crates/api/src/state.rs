use arbspread_engine::Engine;
use std::sync::Arc;

/// Shared handler state: one `Engine` (itself a cheap-to-clone bundle of
/// the C1/C3/C4/C9 collaborators) plus the display timezone used to
/// annotate `SpreadMax.time` in API responses (spec §6 `TIMEZONE`).
#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
    pub timezone: Arc<Option<String>>,
}

impl AppState {
    pub fn new(engine: Engine, timezone: Option<String>) -> Self {
        Self { engine, timezone: Arc::new(timezone) }
    }
}
