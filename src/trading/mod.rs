pub mod analytics;
pub mod journal;

pub use analytics::{by_asset, by_dimension, summarize, Dimension, Stats};
pub use journal::{choose_source, local_id, Journal, Loaded, Source};
