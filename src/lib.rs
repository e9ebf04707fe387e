pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod store;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
