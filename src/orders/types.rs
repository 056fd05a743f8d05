use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(Error::InvalidOrder(format!(
                "side must be buy or sell, got '{}'",
                other
            ))),
        }
    }
}

/// Order kind; decides which price fields an order carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    #[default]
    Market,
    Limit,
    StopMarket,
    TakeProfitMarket,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Limit => write!(f, "LIMIT"),
            OrderKind::StopMarket => write!(f, "STOP_MARKET"),
            OrderKind::TakeProfitMarket => write!(f, "TAKE_PROFIT_MARKET"),
        }
    }
}

impl FromStr for OrderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "MARKET" => Ok(OrderKind::Market),
            "LIMIT" => Ok(OrderKind::Limit),
            "STOP_MARKET" | "STOP_LOSS" => Ok(OrderKind::StopMarket),
            "TAKE_PROFIT_MARKET" | "TAKE_PROFIT" => Ok(OrderKind::TakeProfitMarket),
            other => Err(Error::InvalidOrder(format!("unknown order kind '{}'", other))),
        }
    }
}

/// Time in force accepted by the futures exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good til canceled
    #[serde(rename = "GTC")]
    Gtc,
    /// Immediate or cancel
    #[serde(rename = "IOC")]
    Ioc,
}

impl FromStr for TimeInForce {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "IOC" => Ok(TimeInForce::Ioc),
            other => Err(Error::InvalidOrder(format!("unknown time in force '{}'", other))),
        }
    }
}

/// What the operator asked for, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: Side,
    pub amount: f64,
    pub kind: OrderKind,
    /// Limit price for LIMIT, reference price for the stop kinds
    pub trigger_price: Option<f64>,
    pub stop_loss_price: Option<f64>,
    pub take_profit_price: Option<f64>,
    pub post_only: Option<bool>,
    pub leverage: Option<u32>,
    pub time_in_force: Option<TimeInForce>,
}

impl OrderIntent {
    fn base(symbol: impl Into<String>, side: Side, amount: f64, kind: OrderKind) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            amount,
            kind,
            trigger_price: None,
            stop_loss_price: None,
            take_profit_price: None,
            post_only: None,
            leverage: None,
            time_in_force: None,
        }
    }

    pub fn market(symbol: impl Into<String>, side: Side, amount: f64) -> Self {
        Self::base(symbol, side, amount, OrderKind::Market)
    }

    pub fn limit(symbol: impl Into<String>, side: Side, amount: f64, trigger_price: f64) -> Self {
        Self {
            trigger_price: Some(trigger_price),
            ..Self::base(symbol, side, amount, OrderKind::Limit)
        }
    }

    pub fn stop_loss(
        symbol: impl Into<String>,
        side: Side,
        amount: f64,
        trigger_price: f64,
        stop_loss_price: f64,
    ) -> Self {
        Self {
            trigger_price: Some(trigger_price),
            stop_loss_price: Some(stop_loss_price),
            ..Self::base(symbol, side, amount, OrderKind::StopMarket)
        }
    }

    pub fn take_profit(
        symbol: impl Into<String>,
        side: Side,
        amount: f64,
        trigger_price: f64,
        take_profit_price: f64,
    ) -> Self {
        Self {
            trigger_price: Some(trigger_price),
            take_profit_price: Some(take_profit_price),
            ..Self::base(symbol, side, amount, OrderKind::TakeProfitMarket)
        }
    }

    pub fn with_post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    pub fn with_leverage(mut self, leverage: u32) -> Self {
        self.leverage = Some(leverage);
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }
}

/// Validated, exchange-shaped order
///
/// Only `OrderRequestBuilder` constructs these. Price fields that do not apply
/// to the order kind are always `None` and are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct OrderRequest {
    pub client_oid: Uuid,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    pub amount: f64,
    /// Limit price (LIMIT only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Reference price the stop was placed against (stop kinds only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<f64>,
    /// Stop trigger (STOP_MARKET and TAKE_PROFIT_MARKET only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
}

/// Order status reported by the execution venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted and resting (or waiting for its stop)
    Open,
    Filled,
}

/// Exchange acknowledgement of a submitted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub order_id: String,
    pub client_oid: Uuid,
    pub symbol: String,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub submitted_at: DateTime<Utc>,
}
