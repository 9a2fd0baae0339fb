//! Provider settings resolved from the environment.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `CF_API_TOKEN` | API token (preferred when set) |
//! | `CLOUDFLARE_API_KEY` | global API key, paired with the email |
//! | `CLOUDFLARE_API_EMAIL` | account email for the global key |
//! | `CLOUDFLARE_ACCOUNT_ID` | account that owns new zones (optional) |
//! | `CLOUDFLARE_API_BASE` | API base URL override (optional) |

use crate::error::{BulkError, BulkResult};

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// How requests authenticate against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Bearer <token>`
    Token(String),
    /// `X-Auth-Email` / `X-Auth-Key` pair.
    ApiKey { email: String, key: String },
}

impl Credentials {
    /// Request headers carrying these credentials, in curl
    /// `-H` form.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        match self {
            Self::Token(token) => vec![format!("Authorization: Bearer {token}")],
            Self::ApiKey { email, key } => {
                vec![format!("X-Auth-Email: {email}"), format!("X-Auth-Key: {key}")]
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub credentials: Credentials,
    pub account_id: Option<String>,
    pub api_base: String,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> BulkResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, which returns the value
    /// of a variable or `None` when it is unset.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> BulkResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = if let Some(token) = get("CF_API_TOKEN") {
            Credentials::Token(token)
        } else {
            let key = get("CLOUDFLARE_API_KEY").ok_or_else(|| {
                BulkError::EnvMissing(
                    "CLOUDFLARE_API_KEY is not set (or set CF_API_TOKEN instead)".into(),
                )
            })?;
            let email = get("CLOUDFLARE_API_EMAIL").ok_or_else(|| {
                BulkError::EnvMissing("CLOUDFLARE_API_EMAIL is not set".into())
            })?;
            Credentials::ApiKey { email, key }
        };

        Ok(Self {
            credentials,
            account_id: get("CLOUDFLARE_ACCOUNT_ID"),
            api_base: get("CLOUDFLARE_API_BASE").map_or_else(
                || DEFAULT_API_BASE.to_string(),
                |b| b.trim_end_matches('/').to_string(),
            ),
        })
    }
}
