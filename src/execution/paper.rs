// Paper execution venue for dry runs and tests

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::orders::{OrderKind, OrderRequest, OrderResult, OrderStatus};
use crate::ports::ExecutionPort;

/// In-memory venue that accepts (or rejects) every order it is given.
///
/// Market orders are reported filled on submission. Everything else rests as
/// open. Clones share the same order log.
#[derive(Debug, Clone, Default)]
pub struct PaperExecution {
    submitted: Arc<Mutex<Vec<OrderRequest>>>,
    reject_reason: Option<String>,
}

impl PaperExecution {
    pub fn new() -> Self {
        Self::default()
    }

    /// A venue that refuses every order with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_reason: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Requests received so far, including rejected ones.
    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.log().clone()
    }

    fn log(&self) -> MutexGuard<'_, Vec<OrderRequest>> {
        self.submitted.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ExecutionPort for PaperExecution {
    async fn submit(&self, request: OrderRequest) -> Result<OrderResult> {
        self.log().push(request.clone());

        if let Some(reason) = &self.reject_reason {
            tracing::debug!(symbol = %request.symbol, reason = %reason, "Paper venue rejecting order");
            return Err(Error::ExchangeRejected(reason.clone()));
        }

        let status = match request.kind {
            OrderKind::Market => OrderStatus::Filled,
            _ => OrderStatus::Open,
        };

        Ok(OrderResult {
            order_id: Uuid::new_v4().to_string(),
            client_oid: request.client_oid,
            symbol: request.symbol,
            kind: request.kind,
            status,
            submitted_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "paper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::{OrderIntent, OrderRequestBuilder, Side};

    fn request(intent: OrderIntent) -> OrderRequest {
        OrderRequestBuilder::build(&intent).unwrap()
    }

    #[tokio::test]
    async fn test_market_fills_and_limit_rests() {
        let venue = PaperExecution::new();

        let market = venue
            .submit(request(OrderIntent::market("XBTUSDTM", Side::Buy, 1.0)))
            .await
            .unwrap();
        assert_eq!(market.status, OrderStatus::Filled);

        let limit = venue
            .submit(request(OrderIntent::limit("XBTUSDTM", Side::Sell, 1.0, 70000.0)))
            .await
            .unwrap();
        assert_eq!(limit.status, OrderStatus::Open);
        assert_ne!(market.order_id, limit.order_id);

        assert_eq!(venue.submitted().len(), 2);
    }

    #[tokio::test]
    async fn test_rejecting_venue() {
        let venue = PaperExecution::rejecting("insufficient margin");
        let req = request(OrderIntent::market("ETHUSDTM", Side::Buy, 2.0));
        let client_oid = req.client_oid;

        let result = venue.submit(req).await;
        assert!(matches!(result, Err(Error::ExchangeRejected(ref r)) if r == "insufficient margin"));
        assert_eq!(venue.submitted()[0].client_oid, client_oid);
    }

    #[tokio::test]
    async fn test_clones_share_log() {
        let venue = PaperExecution::new();
        let handle = venue.clone();

        handle
            .submit(request(OrderIntent::market("SOLUSDTM", Side::Sell, 3.0)))
            .await
            .unwrap();
        assert_eq!(venue.submitted().len(), 1);
    }
}
