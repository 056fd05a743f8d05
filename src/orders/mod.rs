// Order intent validation and submission
pub mod builder;
pub mod protective;
pub mod service;
pub mod types;

pub use builder::OrderRequestBuilder;
pub use protective::{apply_protective_defaults, protective_price};
pub use service::OrderService;
pub use types::{
    OrderIntent, OrderKind, OrderRequest, OrderResult, OrderStatus, Side, TimeInForce,
};
