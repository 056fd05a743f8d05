use super::types::{OrderIntent, OrderKind, Side};
use crate::error::{Error, Result};

/// Derive a stop-loss or take-profit price from a reference price
///
/// `side` is the direction of the position being protected: a long (buy)
/// stops out below the reference and takes profit above it, a short (sell)
/// the other way round. `pct` is a percentage in (0, 100).
pub fn protective_price(side: Side, kind: OrderKind, reference: f64, pct: f64) -> Result<f64> {
    if !reference.is_finite() || reference <= 0.0 {
        return Err(Error::InvalidOrder(format!(
            "reference price must be positive, got {}",
            reference
        )));
    }
    if !pct.is_finite() || pct <= 0.0 || pct >= 100.0 {
        return Err(Error::InvalidOrder(format!(
            "protective percentage must be between 0 and 100, got {}",
            pct
        )));
    }

    let below = reference * (1.0 - pct / 100.0);
    let above = reference * (1.0 + pct / 100.0);

    match (kind, side) {
        (OrderKind::StopMarket, Side::Buy) | (OrderKind::TakeProfitMarket, Side::Sell) => Ok(below),
        (OrderKind::StopMarket, Side::Sell) | (OrderKind::TakeProfitMarket, Side::Buy) => Ok(above),
        (other, _) => Err(Error::InvalidOrder(format!(
            "{} orders have no protective price",
            other
        ))),
    }
}

/// Fill a missing stop-loss or take-profit price from percentages
///
/// Only STOP_MARKET and TAKE_PROFIT_MARKET intents with a trigger price are
/// touched, and explicit prices always win. The intent's side is the side of
/// the closing order, so the protected position runs the other way.
pub fn apply_protective_defaults(
    intent: &mut OrderIntent,
    stop_loss_pct: Option<f64>,
    take_profit_pct: Option<f64>,
) -> Result<()> {
    let Some(trigger) = intent.trigger_price else {
        return Ok(());
    };
    let position = intent.side.opposite();

    match intent.kind {
        OrderKind::StopMarket if intent.stop_loss_price.is_none() => {
            if let Some(pct) = stop_loss_pct {
                let price = protective_price(position, intent.kind, trigger, pct)?;
                tracing::debug!(symbol = %intent.symbol, pct, price, "Derived stop-loss price");
                intent.stop_loss_price = Some(price);
            }
        }
        OrderKind::TakeProfitMarket if intent.take_profit_price.is_none() => {
            if let Some(pct) = take_profit_pct {
                let price = protective_price(position, intent.kind, trigger, pct)?;
                tracing::debug!(symbol = %intent.symbol, pct, price, "Derived take-profit price");
                intent.take_profit_price = Some(price);
            }
        }
        _ => {}
    }
    Ok(())
}
