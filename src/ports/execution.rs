use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::orders::{OrderRequest, OrderResult};

/// Order submission to the exchange.
///
/// The port is handed an already-authenticated client by its caller; it never
/// creates credentials of its own.
#[async_trait]
pub trait ExecutionPort: Send + Sync {
    /// Submit a built order request.
    ///
    /// Fails with `ExchangeRejected` when the exchange refuses the order.
    /// Nothing is retried.
    async fn submit(&self, request: OrderRequest) -> Result<OrderResult>;

    /// Get the execution venue name.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: ExecutionPort + ?Sized> ExecutionPort for Arc<T> {
    async fn submit(&self, request: OrderRequest) -> Result<OrderResult> {
        (**self).submit(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
