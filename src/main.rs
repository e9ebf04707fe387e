use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use smt_journal::config::Config;
use smt_journal::models::TradeCandidate;
use smt_journal::report::{render_trades, JournalReport};
use smt_journal::store::{LocalCache, SupabaseStore, TradeStore};
use smt_journal::trading::Journal;

#[derive(Parser, Debug)]
#[command(name = "smt-journal", about = "SMT trade journal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every trade, newest first
    List,
    /// Performance summary and setup breakdowns
    Stats,
    /// Record a trade; unset fields take the entry form defaults
    Add {
        /// field=value pairs, e.g. asset=ES result=Loss dollar_pl=-75
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Remove a trade
    Delete { id: String },
}

fn parse_field(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got '{}'", arg))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    if !cfg.remote_configured() {
        info!("No remote store configured, using local cache at {}", cfg.cache_dir.display());
    }
    let store: Box<dyn TradeStore> =
        Box::new(SupabaseStore::new(&cfg).context("Failed to set up remote store")?);
    let journal = Journal::new(store, LocalCache::from_config(&cfg), cfg.user_id.clone());

    let loaded = journal.load_with_source().await;

    match cli.command {
        Command::List => {
            println!("{} trades ({})", loaded.trades.len(), loaded.source);
            print!("{}", render_trades(&loaded.trades, cfg.timezone));
        }
        Command::Stats => {
            JournalReport::from_loaded(&loaded).print_summary();
        }
        Command::Add { fields } => {
            let mut candidate = TradeCandidate::with_defaults(cfg.today());
            for (field, value) in &fields {
                candidate
                    .set(field, value)
                    .with_context(|| format!("Invalid field '{}'", field))?;
            }
            let trade = journal
                .save(&candidate, &loaded.trades)
                .await
                .context("Trade was not saved")?;
            println!("Saved trade {}", trade.id);
        }
        Command::Delete { id } => {
            if !loaded.trades.contains_id(&id) {
                println!("No trade with id {} in the journal", id);
                return Ok(());
            }
            journal.delete_trade(&id, &loaded.trades).await;
            println!("Deleted trade {}", id);
        }
    }

    Ok(())
}
