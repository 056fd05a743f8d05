use super::builder::OrderRequestBuilder;
use super::types::{OrderIntent, OrderResult};
use crate::error::Result;
use crate::ports::ExecutionPort;

/// Validates intents and hands the resulting requests to an execution port
pub struct OrderService<E> {
    execution: E,
}

impl<E: ExecutionPort> OrderService<E> {
    pub fn new(execution: E) -> Self {
        Self { execution }
    }

    pub fn execution(&self) -> &E {
        &self.execution
    }

    /// Build and submit an order.
    ///
    /// Validation errors return before anything is sent. Exchange errors are
    /// returned as-is; nothing is retried.
    pub async fn place(&self, intent: &OrderIntent) -> Result<OrderResult> {
        let request = OrderRequestBuilder::build(intent)?;

        tracing::info!(
            venue = self.execution.name(),
            symbol = %request.symbol,
            side = %request.side,
            kind = %request.kind,
            amount = request.amount,
            client_oid = %request.client_oid,
            "Submitting order"
        );

        match self.execution.submit(request).await {
            Ok(result) => {
                tracing::info!(
                    order_id = %result.order_id,
                    status = ?result.status,
                    "Order accepted"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(symbol = %intent.symbol, error = %e, "Order submission failed");
                Err(e)
            }
        }
    }
}
