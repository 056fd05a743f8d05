use std::fmt;

use crate::error::{Error, Result};

pub const API_KEY_VAR: &str = "SIGNALDESK_API_KEY";
pub const SECRET_VAR: &str = "SIGNALDESK_SECRET";
pub const PASSPHRASE_VAR: &str = "SIGNALDESK_PASSPHRASE";

/// Exchange API credentials for one operator
///
/// Passed explicitly to whatever needs to authenticate. Nothing here touches
/// process-wide state.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
}

#[derive(Clone, PartialEq, Eq)]
struct Credentials {
    api_key: String,
    secret: String,
    passphrase: String,
}

impl Session {
    /// Authenticated session; every credential must be non-blank
    pub fn new(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Credentials {
            api_key: api_key.into().trim().to_string(),
            secret: secret.into().trim().to_string(),
            passphrase: passphrase.into().trim().to_string(),
        };

        for (name, value) in [
            ("api_key", &credentials.api_key),
            ("secret", &credentials.secret),
            ("passphrase", &credentials.passphrase),
        ] {
            if value.is_empty() {
                return Err(Error::Config(format!("{} must not be blank", name)));
            }
        }

        Ok(Self {
            credentials: Some(credentials),
        })
    }

    /// Session without credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Read credentials from `SIGNALDESK_API_KEY`, `SIGNALDESK_SECRET` and
    /// `SIGNALDESK_PASSPHRASE`.
    ///
    /// None set gives an anonymous session. Setting only some of them is an
    /// error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let values = [API_KEY_VAR, SECRET_VAR, PASSPHRASE_VAR].map(|name| lookup(name));

        match values {
            [None, None, None] => Ok(Self::anonymous()),
            [Some(api_key), Some(secret), Some(passphrase)] => {
                Self::new(api_key, secret, passphrase)
            }
            _ => Err(Error::Config(format!(
                "{}, {} and {} must be set together",
                API_KEY_VAR, SECRET_VAR, PASSPHRASE_VAR
            ))),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.credentials {
            Some(c) => {
                let visible: String = c.api_key.chars().take(4).collect();
                f.debug_struct("Session")
                    .field("api_key", &format!("{}***", visible))
                    .field("secret", &"***")
                    .field("passphrase", &"***")
                    .finish()
            }
            None => f.write_str("Session(anonymous)"),
        }
    }
}
