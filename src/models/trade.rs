use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{Asset, Direction, Rating, SmtTimeframe, SmtTiming, SweepDirection, TradeResult};
use super::parse::{self, entry_time, trade_date};

/// A validated journal entry that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrade {
    #[serde(with = "trade_date")]
    pub date: NaiveDate,
    #[serde(with = "entry_time")]
    pub entry_time: NaiveTime,
    pub asset: Asset,
    pub direction: Direction,
    pub result: TradeResult,

    #[serde(default, deserialize_with = "parse::pl_value")]
    pub points_pl: f64,
    #[serde(default, deserialize_with = "parse::pl_value")]
    pub dollar_pl: f64,

    pub smt_timeframe: SmtTimeframe,
    pub smt_timing: SmtTiming,
    #[serde(default, deserialize_with = "parse::null_as_default")]
    pub micro_ssmt_quarters: String,
    #[serde(default, deserialize_with = "parse::null_as_default")]
    pub htf_quarter: String,
    pub ssmt_quality: Rating,

    #[serde(
        default,
        deserialize_with = "parse::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub smt_pattern: Vec<String>,
    #[serde(
        default,
        deserialize_with = "parse::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sweep_assets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep_direction: Option<SweepDirection>,

    #[serde(
        default,
        deserialize_with = "parse::null_as_default",
        skip_serializing_if = "parse::is_false"
    )]
    pub news_present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_importance: Option<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_event: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htf_chart_img: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exec_chart_img: Option<String>,

    #[serde(default, alias = "trade_notes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewTrade {
    pub fn into_trade(
        self,
        id: impl Into<String>,
        user_id: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Trade {
        Trade {
            id: id.into(),
            user_id: user_id.into(),
            created_at,
            details: self,
        }
    }
}

/// A validated entry stamped with its owner and creation time, ready to be
/// handed to a store. The id is assigned by whichever store persists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingTrade {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub trade: NewTrade,
}

impl PendingTrade {
    pub fn new(user_id: impl Into<String>, created_at: DateTime<Utc>, trade: NewTrade) -> Self {
        Self {
            user_id: user_id.into(),
            created_at,
            trade,
        }
    }

    pub fn into_trade(self, id: String) -> Trade {
        self.trade.into_trade(id, self.user_id, self.created_at)
    }
}

/// One persisted journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(deserialize_with = "parse::trade_id")]
    pub id: String,
    #[serde(
        default,
        deserialize_with = "parse::null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: NewTrade,
}

impl Trade {
    pub fn asset(&self) -> Asset {
        self.details.asset
    }

    pub fn result(&self) -> TradeResult {
        self.details.result
    }

    pub fn dollar_pl(&self) -> f64 {
        self.details.dollar_pl
    }

    pub fn points_pl(&self) -> f64 {
        self.details.points_pl
    }
}

/// Trades in canonical read order: newest `date` first, then latest
/// `entry_time` first. Insertion order is otherwise preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeSet {
    trades: Vec<Trade>,
}

impl TradeSet {
    pub fn new(trades: Vec<Trade>) -> Self {
        let mut set = Self { trades };
        set.sort_canonical();
        set
    }

    pub fn sort_canonical(&mut self) {
        self.trades.sort_by(|a, b| {
            b.details
                .date
                .cmp(&a.details.date)
                .then_with(|| b.details.entry_time.cmp(&a.details.entry_time))
        });
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Adds a trade and restores canonical order.
    pub fn insert(&mut self, trade: Trade) {
        self.trades.push(trade);
        self.sort_canonical();
    }

    /// Removes the trade with `id`; returns whether one was present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.trades.len();
        self.trades.retain(|t| t.id != id);
        self.trades.len() != before
    }

    /// Union by id: trades from `other` whose id is not already present are
    /// added, then the set is re-sorted.
    pub fn merge(&mut self, other: TradeSet) {
        for trade in other {
            if !self.contains_id(&trade.id) {
                self.trades.push(trade);
            }
        }
        self.sort_canonical();
    }
}

impl From<Vec<Trade>> for TradeSet {
    fn from(trades: Vec<Trade>) -> Self {
        Self::new(trades)
    }
}

impl FromIterator<Trade> for TradeSet {
    fn from_iter<I: IntoIterator<Item = Trade>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for TradeSet {
    type Item = Trade;
    type IntoIter = std::vec::IntoIter<Trade>;
    fn into_iter(self) -> Self::IntoIter {
        self.trades.into_iter()
    }
}

impl<'a> IntoIterator for &'a TradeSet {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;
    fn into_iter(self) -> Self::IntoIter {
        self.trades.iter()
    }
}
