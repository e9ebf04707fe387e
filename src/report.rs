use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::{Asset, FieldLiteral, Trade, TradeSet};
use crate::trading::{by_asset, by_dimension, summarize, Dimension, Loaded, Source, Stats};

const RULE: &str = "  ───────────────────────────────────";

#[derive(Debug, Clone)]
pub struct JournalReport {
    pub source: Source,
    pub overall: Stats,
    pub per_asset: BTreeMap<Asset, Stats>,
    pub breakdowns: Vec<(Dimension, BTreeMap<String, Stats>)>,
}

impl JournalReport {
    pub fn from_loaded(loaded: &Loaded) -> Self {
        let trades = &loaded.trades;
        let breakdowns = Dimension::ALL
            .iter()
            .filter(|d| **d != Dimension::Asset)
            .map(|d| (*d, by_dimension(trades, *d)))
            .collect();

        JournalReport {
            source: loaded.source,
            overall: summarize(trades),
            per_asset: by_asset(trades),
            breakdowns,
        }
    }

    pub fn render(&self) -> String {
        let s = self.overall.rounded();
        let mut out = String::new();

        let _ = writeln!(out, "{}", "=".repeat(70));
        let _ = writeln!(out, "  SMT JOURNAL ({})", self.source);
        let _ = writeln!(out, "{}", "=".repeat(70));
        let _ = writeln!(out, "  TRADES");
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  Total:       {}", s.total);
        let _ = writeln!(
            out,
            "  W / L / BE:  {} / {} / {}",
            s.wins, s.losses, s.breakevens
        );
        let _ = writeln!(out, "  Win Rate:    {:.1}%", s.win_rate);
        let _ = writeln!(out);
        let _ = writeln!(out, "  PERFORMANCE");
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "  P/L:         ${:+.2}", s.total_pl);
        let _ = writeln!(out, "  Points:      {:+.2}", s.total_points);
        let _ = writeln!(out, "  Avg Win:     ${:.2}", s.avg_win);
        let _ = writeln!(out, "  Avg Loss:    ${:.2}", s.avg_loss);
        let _ = writeln!(out, "  Best:        ${:+.2}", s.best_trade);
        let _ = writeln!(out, "  Worst:       ${:+.2}", s.worst_trade);
        let _ = writeln!(out, "  Profit Factor: {:.2}", s.profit_factor);

        if !self.per_asset.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "  BY ASSET");
            let _ = writeln!(out, "{}", RULE);
            for (asset, stats) in &self.per_asset {
                out.push_str(&group_line(asset.as_str(), stats));
            }
        }

        for (dimension, groups) in &self.breakdowns {
            if groups.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "  BY {}", dimension.label().to_uppercase());
            let _ = writeln!(out, "{}", RULE);
            for (key, stats) in groups {
                out.push_str(&group_line(key, stats));
            }
        }

        let _ = writeln!(out, "{}", "=".repeat(70));
        out
    }

    pub fn print_summary(&self) {
        print!("{}", self.render());
    }
}

fn group_line(key: &str, stats: &Stats) -> String {
    let s = stats.rounded();
    format!(
        "  {:>8}: {} trades | WR {:.1}% | P/L ${:+.2} | PF {:.2}\n",
        key, s.total, s.win_rate, s.total_pl, s.profit_factor
    )
}

/// One line per trade, newest first. `created_at` is shown in `tz`.
pub fn render_trades(trades: &TradeSet, tz: Tz) -> String {
    if trades.is_empty() {
        return "  No trades recorded.\n".to_string();
    }
    trades.iter().map(|t| trade_line(t, tz)).collect()
}

fn trade_line(t: &Trade, tz: Tz) -> String {
    let d = &t.details;
    let mut line = format!(
        "  {:<14} {} {} {} {:<5} {:<4} ${:>+9.2} {:>+7.2}pt  {} {} {}",
        t.id,
        d.date.format("%Y-%m-%d"),
        d.entry_time.format("%H:%M"),
        d.asset.as_str(),
        d.direction.as_str(),
        d.result.as_str(),
        d.dollar_pl,
        d.points_pl,
        d.smt_timeframe.as_str(),
        d.smt_timing.as_str(),
        t.created_at.with_timezone(&tz).format("(logged %Y-%m-%d %H:%M %Z)"),
    );
    if let Some(notes) = d.notes.as_deref() {
        line.push_str(&format!("\n      {}", notes));
    }
    line.push('\n');
    line
}
