pub mod exchange;
pub mod interval;
pub mod settings;
pub mod static_data;

pub use exchange::Exchange;
pub use interval::{Interval, UnknownInterval};
pub use settings::Settings;
