use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of literal values a journal field may take.
///
/// `as_str` is the wire literal: what the entry form submits, what the
/// remote table stores and what the local cache blob contains.
pub trait FieldLiteral: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn from_literal(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Asset {
    NQ,
    ES,
    YM,
}

impl FieldLiteral for Asset {
    const ALL: &'static [Self] = &[Asset::NQ, Asset::ES, Asset::YM];

    fn as_str(&self) -> &'static str {
        match self {
            Asset::NQ => "NQ",
            Asset::ES => "ES",
            Asset::YM => "YM",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl FieldLiteral for Direction {
    const ALL: &'static [Self] = &[Direction::Long, Direction::Short];

    fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TradeResult {
    Win,
    Loss,
    #[serde(rename = "BE", alias = "BreakEven")]
    BreakEven,
}

impl FieldLiteral for TradeResult {
    const ALL: &'static [Self] = &[TradeResult::Win, TradeResult::Loss, TradeResult::BreakEven];

    fn as_str(&self) -> &'static str {
        match self {
            TradeResult::Win => "Win",
            TradeResult::Loss => "Loss",
            TradeResult::BreakEven => "BE",
        }
    }

    fn from_literal(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("breakeven") {
            return Some(TradeResult::BreakEven);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for TradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Timeframe the SMT divergence was spotted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SmtTimeframe {
    #[serde(rename = "4H")]
    H4,
    #[serde(rename = "1H")]
    H1,
    #[serde(rename = "15M")]
    M15,
}

impl FieldLiteral for SmtTimeframe {
    const ALL: &'static [Self] = &[SmtTimeframe::H4, SmtTimeframe::H1, SmtTimeframe::M15];

    fn as_str(&self) -> &'static str {
        match self {
            SmtTimeframe::H4 => "4H",
            SmtTimeframe::H1 => "1H",
            SmtTimeframe::M15 => "15M",
        }
    }
}

impl fmt::Display for SmtTimeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SmtTiming {
    Early,
    Mid,
    Late,
}

impl FieldLiteral for SmtTiming {
    const ALL: &'static [Self] = &[SmtTiming::Early, SmtTiming::Mid, SmtTiming::Late];

    fn as_str(&self) -> &'static str {
        match self {
            SmtTiming::Early => "Early",
            SmtTiming::Mid => "Mid",
            SmtTiming::Late => "Late",
        }
    }
}

impl fmt::Display for SmtTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// High / Medium / Low grading, shared by SSMT quality and news importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    High,
    Medium,
    Low,
}

impl FieldLiteral for Rating {
    const ALL: &'static [Self] = &[Rating::High, Rating::Medium, Rating::Low];

    fn as_str(&self) -> &'static str {
        match self {
            Rating::High => "High",
            Rating::Medium => "Medium",
            Rating::Low => "Low",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SweepDirection {
    Bullish,
    Bearish,
    Both,
}

impl FieldLiteral for SweepDirection {
    const ALL: &'static [Self] = &[
        SweepDirection::Bullish,
        SweepDirection::Bearish,
        SweepDirection::Both,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SweepDirection::Bullish => "Bullish",
            SweepDirection::Bearish => "Bearish",
            SweepDirection::Both => "Both",
        }
    }
}

impl fmt::Display for SweepDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
