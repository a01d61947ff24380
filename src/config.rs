//! Environment-sourced configuration.
//!
//! The server is configured entirely through environment variables (a local
//! `.env` file is honoured for development):
//!
//! | Variable             | Required | Default                 |
//! |----------------------|----------|-------------------------|
//! | `UBER_ACCESS_TOKEN`  | yes      | —                       |
//! | `UBER_BASE_URL`      | no       | `https://api.uber.com`  |
//! | `UBER_CLIENT_ID`     | no       | —                       |
//! | `UBER_CLIENT_SECRET` | no       | —                       |
//!
//! `UBER_CLIENT_ID` / `UBER_CLIENT_SECRET` are accepted for completeness but
//! unused by the current bearer-token flow. Credentials are never written to
//! logs or error messages.

use crate::error::ConfigError;

/// Environment variable holding the OAuth client id (unused by the current flow).
pub const ENV_CLIENT_ID: &str = "UBER_CLIENT_ID";
/// Environment variable holding the OAuth client secret (unused by the current flow).
pub const ENV_CLIENT_SECRET: &str = "UBER_CLIENT_SECRET";
/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "UBER_BASE_URL";
/// Environment variable holding the bearer token.
pub const ENV_ACCESS_TOKEN: &str = "UBER_ACCESS_TOKEN";

/// Default Uber Ads API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.uber.com";

/// Credential and endpoint configuration for the Uber Ads client.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client id, if provided (unused by the bearer-token flow).
    pub client_id: Option<String>,
    /// OAuth client secret, if provided (unused by the bearer-token flow).
    pub client_secret: Option<String>,
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub access_token: String,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if `UBER_ACCESS_TOKEN` is missing or empty, or if a
    /// provided value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// Split out from [`Config::from_env`] so validation can be tested
    /// without mutating process-global environment state.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is missing or a value is invalid.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let access_token = non_empty(ENV_ACCESS_TOKEN).ok_or(ConfigError::MissingVar {
            name: ENV_ACCESS_TOKEN,
        })?;

        let base_url = non_empty(ENV_BASE_URL).map_or_else(
            || DEFAULT_BASE_URL.to_string(),
            |url| url.trim_end_matches('/').to_string(),
        );

        let config = Self {
            client_id: non_empty(ENV_CLIENT_ID),
            client_secret: non_empty(ENV_CLIENT_SECRET),
            base_url,
            access_token,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an HTTP(S) URL or the token
    /// contains characters that cannot appear in an HTTP header.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidVar {
                name: ENV_BASE_URL,
                message: "must start with http:// or https://".to_string(),
            });
        }

        // Bearer tokens travel in the Authorization header, which only
        // admits visible ASCII.
        if !self
            .access_token
            .bytes()
            .all(|b| (0x21..=0x7e).contains(&b))
        {
            return Err(ConfigError::InvalidVar {
                name: ENV_ACCESS_TOKEN,
                message: "must contain only visible ASCII characters".to_string(),
            });
        }

        Ok(())
    }
}
