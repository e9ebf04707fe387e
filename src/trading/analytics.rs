use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Asset, FieldLiteral, Trade, TradeResult};

/// Performance figures over a group of trades.
///
/// `win_rate` is a percentage already rounded to one decimal. Money and
/// ratio fields keep full precision; use [`Stats::rounded`] when presenting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakevens: usize,
    pub win_rate: f64,
    pub total_pl: f64,
    pub total_points: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub profit_factor: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
}

impl Stats {
    /// Copy with money fields and the profit factor rounded to cents.
    pub fn rounded(&self) -> Stats {
        Stats {
            total_pl: round2(self.total_pl),
            total_points: round2(self.total_points),
            avg_win: round2(self.avg_win),
            avg_loss: round2(self.avg_loss),
            profit_factor: round2(self.profit_factor),
            best_trade: round2(self.best_trade),
            worst_trade: round2(self.worst_trade),
            ..*self
        }
    }
}

/// Grouping keys for setup breakdowns. Values are grouped by their wire
/// literal and never interpreted numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Asset,
    Direction,
    SmtTimeframe,
    SmtTiming,
    SsmtQuality,
    HtfQuarter,
    MicroSsmtQuarters,
}

impl Dimension {
    pub const ALL: &'static [Dimension] = &[
        Dimension::Asset,
        Dimension::Direction,
        Dimension::SmtTimeframe,
        Dimension::SmtTiming,
        Dimension::SsmtQuality,
        Dimension::HtfQuarter,
        Dimension::MicroSsmtQuarters,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Asset => "asset",
            Dimension::Direction => "direction",
            Dimension::SmtTimeframe => "smt_timeframe",
            Dimension::SmtTiming => "smt_timing",
            Dimension::SsmtQuality => "ssmt_quality",
            Dimension::HtfQuarter => "htf_quarter",
            Dimension::MicroSsmtQuarters => "micro_ssmt_quarters",
        }
    }

    fn key(&self, trade: &Trade) -> String {
        let d = &trade.details;
        match self {
            Dimension::Asset => d.asset.as_str().to_string(),
            Dimension::Direction => d.direction.as_str().to_string(),
            Dimension::SmtTimeframe => d.smt_timeframe.as_str().to_string(),
            Dimension::SmtTiming => d.smt_timing.as_str().to_string(),
            Dimension::SsmtQuality => d.ssmt_quality.as_str().to_string(),
            Dimension::HtfQuarter => or_unknown(&d.htf_quarter),
            Dimension::MicroSsmtQuarters => or_unknown(&d.micro_ssmt_quarters),
        }
    }
}

pub fn summarize<'a, I>(trades: I) -> Stats
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut stats = Stats::default();
    let mut win_sum = 0.0;
    let mut loss_abs_sum = 0.0;
    let mut best = f64::NEG_INFINITY;
    let mut worst = f64::INFINITY;

    for t in trades {
        let pl = t.dollar_pl();
        stats.total += 1;
        stats.total_pl += pl;
        stats.total_points += t.points_pl();
        best = best.max(pl);
        worst = worst.min(pl);

        match t.result() {
            TradeResult::Win => {
                stats.wins += 1;
                win_sum += pl;
            }
            TradeResult::Loss => {
                stats.losses += 1;
                loss_abs_sum += pl.abs();
            }
            TradeResult::BreakEven => stats.breakevens += 1,
        }
    }

    if stats.total > 0 {
        stats.win_rate = round1(stats.wins as f64 / stats.total as f64 * 100.0);
        stats.best_trade = best;
        stats.worst_trade = worst;
    }
    if stats.wins > 0 {
        stats.avg_win = win_sum / stats.wins as f64;
    }
    if stats.losses > 0 {
        stats.avg_loss = loss_abs_sum / stats.losses as f64;
    }
    stats.profit_factor = if stats.avg_loss > 0.0 {
        stats.avg_win / stats.avg_loss
    } else {
        0.0
    };

    stats
}

/// Per-instrument stats. Instruments without trades are absent.
pub fn by_asset<'a, I>(trades: I) -> BTreeMap<Asset, Stats>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut groups: BTreeMap<Asset, Vec<&Trade>> = BTreeMap::new();
    for t in trades {
        groups.entry(t.asset()).or_default().push(t);
    }
    groups
        .into_iter()
        .map(|(asset, group)| (asset, summarize(group)))
        .collect()
}

pub fn by_dimension<'a, I>(trades: I, dimension: Dimension) -> BTreeMap<String, Stats>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut groups: BTreeMap<String, Vec<&Trade>> = BTreeMap::new();
    for t in trades {
        groups.entry(dimension.key(t)).or_default().push(t);
    }
    groups
        .into_iter()
        .map(|(key, group)| (key, summarize(group)))
        .collect()
}

fn or_unknown(value: &str) -> String {
    if value.trim().is_empty() {
        "unknown".to_string()
    } else {
        value.to_string()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TradeSet;
    use crate::test_helpers::make_trade;
    use proptest::prelude::*;

    fn scenario() -> TradeSet {
        TradeSet::new(vec![
            make_trade("1", Asset::NQ, TradeResult::Win, 150.0),
            make_trade("2", Asset::NQ, TradeResult::Loss, -75.0),
            make_trade("3", Asset::ES, TradeResult::Win, 200.0),
        ])
    }

    #[test]
    fn empty_set_is_all_zero() {
        assert_eq!(summarize(&TradeSet::default()), Stats::default());
        assert!(by_asset(&TradeSet::default()).is_empty());
    }

    #[test]
    fn journal_scenario() {
        let stats = summarize(&scenario()).rounded();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.breakevens, 0);
        assert!((stats.win_rate - 66.7).abs() < 1e-9);
        assert!((stats.total_pl - 275.0).abs() < 1e-9);
        assert!((stats.avg_win - 175.0).abs() < 1e-9);
        assert!((stats.avg_loss - 75.0).abs() < 1e-9);
        assert!((stats.profit_factor - 2.33).abs() < 1e-9);
        assert!((stats.best_trade - 200.0).abs() < 1e-9);
        assert!((stats.worst_trade + 75.0).abs() < 1e-9);
    }

    #[test]
    fn by_asset_omits_instruments_without_trades() {
        let per_asset = by_asset(&scenario());
        let keys: Vec<Asset> = per_asset.keys().copied().collect();
        assert_eq!(keys, vec![Asset::NQ, Asset::ES]);
        assert!(!per_asset.contains_key(&Asset::YM));

        let nq = per_asset[&Asset::NQ];
        assert_eq!(nq.total, 2);
        assert!((nq.win_rate - 50.0).abs() < 1e-9);
        assert!((nq.total_pl - 75.0).abs() < 1e-9);
        assert!((nq.profit_factor - 2.0).abs() < 1e-9);
    }

    #[test]
    fn no_losses_saturates_profit_factor_to_zero() {
        let set = TradeSet::new(vec![
            make_trade("1", Asset::NQ, TradeResult::Win, 100.0),
            make_trade("2", Asset::NQ, TradeResult::BreakEven, 0.0),
        ]);
        let stats = summarize(&set);
        assert_eq!(stats.avg_loss, 0.0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.breakevens, 1);
        assert!((stats.win_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn result_and_pl_sign_are_independent() {
        // A "Win" booked at a loss and a "Loss" booked at a profit.
        let set = TradeSet::new(vec![
            make_trade("1", Asset::ES, TradeResult::Win, -10.0),
            make_trade("2", Asset::ES, TradeResult::Loss, 30.0),
            make_trade("3", Asset::ES, TradeResult::Loss, -50.0),
        ]);
        let stats = summarize(&set);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 2);
        assert!((stats.avg_win + 10.0).abs() < 1e-9);
        assert!((stats.avg_loss - 40.0).abs() < 1e-9);
        assert!((stats.total_pl + 30.0).abs() < 1e-9);
    }

    #[test]
    fn accumulates_without_intermediate_rounding() {
        let trades: Vec<Trade> = (0..1000)
            .map(|i| make_trade(&i.to_string(), Asset::NQ, TradeResult::Win, 0.004))
            .collect();
        let stats = summarize(&trades);
        // Rounding each trade to cents would give 0.
        assert!((stats.total_pl - 4.0).abs() < 1e-6);
        assert!((stats.rounded().total_pl - 4.0).abs() < 1e-9);
    }

    #[test]
    fn by_dimension_groups_by_wire_literal() {
        let mut set = scenario();
        let mut late = make_trade("4", Asset::YM, TradeResult::Loss, -20.0);
        late.details.smt_timing = crate::models::SmtTiming::Late;
        late.details.htf_quarter = String::new();
        set.insert(late);

        let timing = by_dimension(&set, Dimension::SmtTiming);
        assert_eq!(timing["Early"].total, 3);
        assert_eq!(timing["Late"].total, 1);

        let quarters = by_dimension(&set, Dimension::HtfQuarter);
        assert_eq!(quarters["Q1"].total, 3);
        assert_eq!(quarters["unknown"].total, 1);

        let assets = by_dimension(&set, Dimension::Asset);
        assert_eq!(assets.len(), 3);
    }

    fn arb_trades() -> impl Strategy<Value = Vec<Trade>> {
        prop::collection::vec((0usize..3, 0usize..3, -1000.0f64..1000.0), 0..40).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (a, r, pl))| {
                        make_trade(&i.to_string(), Asset::ALL[a], TradeResult::ALL[r], pl)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn results_partition_the_total(trades in arb_trades()) {
            let stats = summarize(&trades);
            prop_assert_eq!(stats.wins + stats.losses + stats.breakevens, stats.total);
            prop_assert_eq!(stats.total, trades.len());
        }

        #[test]
        fn per_asset_totals_add_up(trades in arb_trades()) {
            let overall = summarize(&trades);
            let per_asset = by_asset(&trades);
            prop_assert!(per_asset.values().all(|s| s.total > 0));
            let sum: usize = per_asset.values().map(|s| s.total).sum();
            prop_assert_eq!(sum, overall.total);
            let pl: f64 = per_asset.values().map(|s| s.total_pl).sum();
            prop_assert!((pl - overall.total_pl).abs() < 1e-6);
        }

        #[test]
        fn ratios_stay_finite_and_bounded(trades in arb_trades()) {
            let stats = summarize(&trades);
            prop_assert!(stats.win_rate >= 0.0 && stats.win_rate <= 100.0);
            prop_assert!(stats.profit_factor.is_finite());
            prop_assert!(stats.avg_loss >= 0.0);
        }
    }
}
