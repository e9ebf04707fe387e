use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;

use crate::store::local_cache::DEFAULT_CACHE_KEY;

#[derive(Debug, Clone)]
pub struct Config {
    // Remote store
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub trades_table: String,
    pub request_timeout_secs: u64,

    // Local fallback cache
    pub cache_dir: PathBuf,
    pub cache_key: String,

    // Journal
    pub user_id: String,
    pub timezone: Tz,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or blank keys take
    /// their defaults, and unparsable numbers or zones fall back too.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |keys: &[&str], default: &str| -> String {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Config {
            supabase_url: env(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"], "")
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: env(
                &["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"],
                "",
            ),
            trades_table: env(&["TRADES_TABLE"], "trades"),
            request_timeout_secs: env(&["REQUEST_TIMEOUT_SECS"], "10")
                .parse()
                .unwrap_or(10),
            cache_dir: PathBuf::from(env(&["CACHE_DIR"], "data")),
            cache_key: env(&["CACHE_KEY"], DEFAULT_CACHE_KEY),
            user_id: env(&["JOURNAL_USER_ID"], "user1"),
            timezone: env(&["JOURNAL_TZ"], "UTC").parse().unwrap_or(Tz::UTC),
            log_level: env(&["LOG_LEVEL"], "info"),
        }
    }

    pub fn remote_configured(&self) -> bool {
        !self.supabase_url.is_empty()
    }

    /// Today's calendar date in the journal's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}
