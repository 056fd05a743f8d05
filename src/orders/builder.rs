use uuid::Uuid;

use super::types::{OrderIntent, OrderKind, OrderRequest};
use crate::error::{Error, Result};

/// Turns an `OrderIntent` into an `OrderRequest` for its order kind
///
/// | Kind               | Carries                                         |
/// |--------------------|-------------------------------------------------|
/// | MARKET             | nothing beyond symbol/side/amount               |
/// | LIMIT              | `price` = trigger price                         |
/// | STOP_MARKET        | `trigger_price`, `stop_price` = stop-loss price |
/// | TAKE_PROFIT_MARKET | `trigger_price`, `stop_price` = take-profit     |
///
/// Fields that do not belong to the kind are dropped. Building does no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderRequestBuilder;

impl OrderRequestBuilder {
    pub fn build(intent: &OrderIntent) -> Result<OrderRequest> {
        let symbol = intent.symbol.trim();
        if symbol.is_empty() {
            return Err(Error::InvalidOrder("symbol is required".to_string()));
        }
        if !intent.amount.is_finite() || intent.amount <= 0.0 {
            return Err(Error::InvalidOrder(format!(
                "amount must be greater than 0, got {}",
                intent.amount
            )));
        }
        if intent.leverage == Some(0) {
            return Err(Error::InvalidOrder("leverage must be at least 1".to_string()));
        }

        let kind = intent.kind;
        let (price, trigger_price, stop_price) = match kind {
            OrderKind::Market => {
                ignored(intent, "trigger_price", intent.trigger_price);
                ignored(intent, "stop_loss_price", intent.stop_loss_price);
                ignored(intent, "take_profit_price", intent.take_profit_price);
                (None, None, None)
            }
            OrderKind::Limit => {
                let limit = required(kind, "trigger_price", intent.trigger_price)?;
                ignored(intent, "stop_loss_price", intent.stop_loss_price);
                ignored(intent, "take_profit_price", intent.take_profit_price);
                (Some(limit), None, None)
            }
            OrderKind::StopMarket => {
                let trigger = required(kind, "trigger_price", intent.trigger_price)?;
                let stop = required(kind, "stop_loss_price", intent.stop_loss_price)?;
                ignored(intent, "take_profit_price", intent.take_profit_price);
                (None, Some(trigger), Some(stop))
            }
            OrderKind::TakeProfitMarket => {
                let trigger = required(kind, "trigger_price", intent.trigger_price)?;
                let stop = required(kind, "take_profit_price", intent.take_profit_price)?;
                ignored(intent, "stop_loss_price", intent.stop_loss_price);
                (None, Some(trigger), Some(stop))
            }
        };

        Ok(OrderRequest {
            client_oid: Uuid::new_v4(),
            symbol: symbol.to_string(),
            side: intent.side,
            kind,
            amount: intent.amount,
            price,
            trigger_price,
            stop_price,
            post_only: intent.post_only,
            leverage: intent.leverage,
            time_in_force: intent.time_in_force,
        })
    }
}

fn required(kind: OrderKind, field: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(Error::InvalidOrder(format!(
            "{} order {} must be a positive price, got {}",
            kind, field, v
        ))),
        None => Err(Error::InvalidOrder(format!("{} order requires {}", kind, field))),
    }
}

fn ignored(intent: &OrderIntent, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        tracing::debug!(
            symbol = %intent.symbol,
            kind = %intent.kind,
            field,
            value = v,
            "Ignoring price field not used by this order kind"
        );
    }
}
