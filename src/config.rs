use std::env;
use std::net::SocketAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// Fallback secret shipped by earlier deployments. Refused at startup.
pub const WELL_KNOWN_DEFAULT_SECRET: &str = "default-secret-change-in-production";

/// Secrets shorter than this still work but are logged as weak.
const RECOMMENDED_SECRET_LEN: usize = 32;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// Key material for the session cookie.
    pub session_secret: Zeroizing<String>,
    /// Whether the app runs in production (turns on `Secure` cookies).
    pub is_production: bool,
    /// Public origin of the app, also the allowed CORS origin.
    pub app_url: String,
    /// OIDC issuer of the identity provider.
    pub oidc_issuer: String,
    /// Where the identity provider sends the browser after login.
    pub redirect_url: String,
    /// Client name presented to the identity provider.
    pub client_name: String,
    /// The address to listen on.
    pub bind_addr: SocketAddr,
    /// Seconds to replenish one request token on the auth routes.
    pub rate_limit_per_second: u64,
    /// Burst size on the auth routes.
    pub rate_limit_burst: u32,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`. Fails when `SESSION_SECRET` is missing,
    /// blank, or the well-known default.
    pub fn from_env() -> Result<Self> {
        let session_secret = Zeroizing::new(
            env::var("SESSION_SECRET")
                .context("SESSION_SECRET must be set (generate with: openssl rand -hex 32)")?,
        );
        check_session_secret(&session_secret)?;

        let app_url = env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:3001".to_string());
        let redirect_url = env::var("REDIRECT_URL")
            .unwrap_or_else(|_| format!("{}/auth/callback", app_url.trim_end_matches('/')));

        Ok(Self {
            session_secret,
            is_production: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string()) == "production",
            oidc_issuer: env::var("SOLID_IDP")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            redirect_url,
            app_url,
            client_name: env::var("CLIENT_NAME")
                .unwrap_or_else(|_| "Solid Pod Product Wallet".to_string()),
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .context("Invalid RATE_LIMIT_PER_SECOND")?,
            rate_limit_burst: env::var("RATE_LIMIT_BURST")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("Invalid RATE_LIMIT_BURST")?,
        })
    }
}

/// Refuses secrets that would make every cookie forgeable.
fn check_session_secret(secret: &str) -> Result<()> {
    if secret.trim().is_empty() {
        anyhow::bail!("SESSION_SECRET must not be empty");
    }

    if secret == WELL_KNOWN_DEFAULT_SECRET {
        anyhow::bail!("SESSION_SECRET is set to the published default; generate a real secret");
    }

    if secret.len() < RECOMMENDED_SECRET_LEN {
        tracing::warn!(
            "⚠️  SESSION_SECRET is shorter than {} characters",
            RECOMMENDED_SECRET_LEN
        );
    }

    Ok(())
}
