use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::fields::{Asset, Direction, FieldLiteral, Rating, SmtTimeframe, SmtTiming, SweepDirection, TradeResult};
use super::parse::{parse_entry_time, parse_pl, parse_trade_date, DATE_FORMAT};
use super::trade::NewTrade;
use crate::error::ValidationError;

/// Raw journal entry as submitted by the entry form: every value is still
/// text until [`TradeCandidate::validate`] runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeCandidate {
    pub date: String,
    pub entry_time: String,
    pub asset: String,
    pub direction: String,
    pub result: String,
    pub points_pl: String,
    pub dollar_pl: String,
    pub smt_timeframe: String,
    pub smt_timing: String,
    pub micro_ssmt_quarters: String,
    pub htf_quarter: String,
    pub ssmt_quality: String,
    pub smt_pattern: Vec<String>,
    pub sweep_assets: Vec<String>,
    pub sweep_direction: String,
    pub news_present: bool,
    pub news_importance: String,
    pub news_event: String,
    pub htf_chart_img: String,
    pub exec_chart_img: String,
    pub notes: String,
}

impl TradeCandidate {
    /// The entry form as it first appears: today's date, an NQ long win at
    /// the 09:30 open on a 4H early SMT.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            date: today.format(DATE_FORMAT).to_string(),
            entry_time: "09:30".to_string(),
            asset: Asset::NQ.as_str().to_string(),
            direction: Direction::Long.as_str().to_string(),
            result: TradeResult::Win.as_str().to_string(),
            points_pl: "0".to_string(),
            dollar_pl: "0".to_string(),
            smt_timeframe: SmtTimeframe::H4.as_str().to_string(),
            smt_timing: SmtTiming::Early.as_str().to_string(),
            micro_ssmt_quarters: "Q1/Q4".to_string(),
            htf_quarter: "Q1".to_string(),
            ssmt_quality: Rating::High.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Assigns a field by its wire name. List fields take comma-separated
    /// values.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), ValidationError> {
        let slot = match field {
            "date" => &mut self.date,
            "entry_time" => &mut self.entry_time,
            "asset" => &mut self.asset,
            "direction" => &mut self.direction,
            "result" => &mut self.result,
            "points_pl" => &mut self.points_pl,
            "dollar_pl" => &mut self.dollar_pl,
            "smt_timeframe" => &mut self.smt_timeframe,
            "smt_timing" => &mut self.smt_timing,
            "micro_ssmt_quarters" => &mut self.micro_ssmt_quarters,
            "htf_quarter" => &mut self.htf_quarter,
            "ssmt_quality" => &mut self.ssmt_quality,
            "sweep_direction" => &mut self.sweep_direction,
            "news_importance" => &mut self.news_importance,
            "news_event" => &mut self.news_event,
            "htf_chart_img" => &mut self.htf_chart_img,
            "exec_chart_img" => &mut self.exec_chart_img,
            "notes" | "trade_notes" => &mut self.notes,
            "smt_pattern" => {
                self.smt_pattern = split_list(value);
                return Ok(());
            }
            "sweep_assets" => {
                self.sweep_assets = split_list(value);
                return Ok(());
            }
            "news_present" => {
                self.news_present = parse_flag(value)?;
                return Ok(());
            }
            other => return Err(ValidationError::UnknownField(other.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Checks every field against its schema. No store is touched.
    pub fn validate(&self) -> Result<NewTrade, ValidationError> {
        let date = parse_trade_date(&self.date).ok_or_else(|| {
            ValidationError::InvalidTemporalField {
                field: "date",
                expected: "calendar date (YYYY-MM-DD)",
                value: self.date.clone(),
            }
        })?;
        let entry_time = parse_entry_time(&self.entry_time).ok_or_else(|| {
            ValidationError::InvalidTemporalField {
                field: "entry_time",
                expected: "time of day (HH:MM)",
                value: self.entry_time.clone(),
            }
        })?;

        Ok(NewTrade {
            date,
            entry_time,
            asset: required("asset", &self.asset)?,
            direction: required("direction", &self.direction)?,
            result: required("result", &self.result)?,
            points_pl: parse_pl("points_pl", &self.points_pl)?,
            dollar_pl: parse_pl("dollar_pl", &self.dollar_pl)?,
            smt_timeframe: required("smt_timeframe", &self.smt_timeframe)?,
            smt_timing: required("smt_timing", &self.smt_timing)?,
            micro_ssmt_quarters: self.micro_ssmt_quarters.clone(),
            htf_quarter: self.htf_quarter.clone(),
            ssmt_quality: required("ssmt_quality", &self.ssmt_quality)?,
            smt_pattern: self.smt_pattern.clone(),
            sweep_assets: self.sweep_assets.clone(),
            sweep_direction: optional::<SweepDirection>("sweep_direction", &self.sweep_direction)?,
            news_present: self.news_present,
            news_importance: optional::<Rating>("news_importance", &self.news_importance)?,
            news_event: non_blank(&self.news_event),
            htf_chart_img: non_blank(&self.htf_chart_img),
            exec_chart_img: non_blank(&self.exec_chart_img),
            notes: non_blank(&self.notes),
        })
    }
}

/// Free-function form of [`TradeCandidate::validate`].
pub fn validate(candidate: &TradeCandidate) -> Result<NewTrade, ValidationError> {
    candidate.validate()
}

fn required<T: FieldLiteral>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    T::from_literal(raw).ok_or_else(|| ValidationError::InvalidEnumValue {
        field,
        value: raw.to_string(),
    })
}

fn optional<T: FieldLiteral>(field: &'static str, raw: &str) -> Result<Option<T>, ValidationError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    required(field, raw).map(Some)
}

fn non_blank(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" | "" => Ok(false),
        _ => Err(ValidationError::InvalidEnumValue {
            field: "news_present",
            value: raw.to_string(),
        }),
    }
}
