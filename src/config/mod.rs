// Application configuration and exchange session
pub mod session;

pub use session::Session;

use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::orders::{OrderKind, TimeInForce};
use crate::scanner::ScanConfig;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "signaldesk.toml";

/// Prefix for environment overrides, e.g. `SIGNALDESK__SCAN__TIMEFRAME=1h`
pub const ENV_PREFIX: &str = "SIGNALDESK";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
    pub trading: TradingPreferences,
}

/// Limits for talking to the exchange
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExchangeConfig {
    pub rate_limit_per_sec: u32,
    pub request_timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_sec: 10,
            request_timeout_secs: 10,
        }
    }
}

impl ExchangeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` wins when set
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "signaldesk=info".to_string(),
            json: false,
        }
    }
}

/// Defaults applied to orders placed from the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TradingPreferences {
    pub leverage: Option<u32>,
    pub time_in_force: Option<TimeInForce>,
    /// Distance of a derived stop-loss from the trigger price, in percent
    pub stop_loss_pct: Option<f64>,
    /// Distance of a derived take-profit from the trigger price, in percent
    pub take_profit_pct: Option<f64>,
    pub default_order_kind: OrderKind,
    pub default_quantity: Option<f64>,
}

impl TradingPreferences {
    pub fn validate(&self) -> Result<()> {
        if self.leverage == Some(0) {
            return Err(Error::Config("trading.leverage must be at least 1".to_string()));
        }
        for (name, pct) in [
            ("stop_loss_pct", self.stop_loss_pct),
            ("take_profit_pct", self.take_profit_pct),
        ] {
            if let Some(pct) = pct {
                if !(pct > 0.0 && pct < 100.0) {
                    return Err(Error::Config(format!(
                        "trading.{} must be between 0 and 100, got {}",
                        name, pct
                    )));
                }
            }
        }
        if let Some(quantity) = self.default_quantity {
            if !(quantity > 0.0 && quantity.is_finite()) {
                return Err(Error::Config(format!(
                    "trading.default_quantity must be positive, got {}",
                    quantity
                )));
            }
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from defaults, a TOML file and the environment
    ///
    /// An explicit `path` must exist. Without one, `signaldesk.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE))
                .format(FileFormat::Toml)
                .required(false),
        };

        let settings = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document layered over the defaults
    pub fn from_toml(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scan
            .validate()
            .map_err(|e| Error::Config(format!("scan: {}", e)))?;
        if self.exchange.rate_limit_per_sec == 0 {
            return Err(Error::Config(
                "exchange.rate_limit_per_sec must be positive".to_string(),
            ));
        }
        if self.exchange.request_timeout_secs == 0 {
            return Err(Error::Config(
                "exchange.request_timeout_secs must be positive".to_string(),
            ));
        }
        self.trading.validate()
    }
}
