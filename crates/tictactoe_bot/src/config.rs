//! Bot configuration loaded from the environment.

use derive_getters::Getters;
use derive_more::{Display, Error};
use ed25519_dalek::VerifyingKey;
use tracing::{debug, info, instrument};

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 3000;

/// Settings needed to talk to Discord and serve interactions.
#[derive(Debug, Clone, Getters)]
pub struct BotConfig {
    /// Discord application id.
    app_id: String,

    /// Application public key used to check interaction signatures.
    public_key: VerifyingKey,

    /// Bot token for outbound REST calls.
    token: String,

    /// REST base URL, e.g. `https://discord.com/api/v10`.
    base_url: String,

    /// Port the interactions endpoint listens on.
    port: u16,
}

impl BotConfig {
    /// Creates a configuration from explicit values.
    #[instrument(skip(public_key, token))]
    pub fn new(
        app_id: String,
        public_key: VerifyingKey,
        token: String,
        base_url: String,
        port: u16,
    ) -> Self {
        Self {
            app_id,
            public_key,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            port,
        }
    }

    /// Loads configuration from process environment variables.
    ///
    /// Reads `DISCORD_APP_ID`, `DISCORD_APP_PUBLIC_KEY`, `DISCORD_TOKEN`,
    /// `DISCORD_BASE_URL` and optionally `PORT`. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    #[instrument]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    #[instrument(skip(lookup))]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::new(format!("Couldn't get env var {}", name)))
        };

        let app_id = require("DISCORD_APP_ID")?;
        let public_key = parse_public_key(&require("DISCORD_APP_PUBLIC_KEY")?)?;
        let token = require("DISCORD_TOKEN")?;
        let base_url = require("DISCORD_BASE_URL")?;
        let port = match lookup("PORT").filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT {:?}: {}", raw, e)))?,
            None => {
                debug!(port = DEFAULT_PORT, "PORT not set, using default");
                DEFAULT_PORT
            }
        };

        info!(app_id = %app_id, base_url = %base_url, port, "Config loaded successfully");
        Ok(Self::new(app_id, public_key, token, base_url, port))
    }

    /// Returns a copy with the listening port replaced.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Decodes a hex-encoded Ed25519 public key.
#[instrument]
pub fn parse_public_key(hex_key: &str) -> Result<VerifyingKey, ConfigError> {
    let bytes = hex::decode(hex_key.trim())
        .map_err(|e| ConfigError::new(format!("Public key is not hex: {}", e)))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| {
            ConfigError::new(format!("Public key must be 32 bytes, got {}", b.len()))
        })?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| ConfigError::new(format!("Invalid public key: {}", e)))
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
