use std::sync::Arc;
use crate::config::Config;
use crate::services::session::SessionCodec;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<Config>,
    /// Encrypts and decrypts the session cookie.
    pub codec: SessionCodec,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    pub fn new(config: Config) -> Self {
        let codec = SessionCodec::new(&config.session_secret);
        tracing::info!("✅ Session codec initialized");

        AppState {
            config: Arc::new(config),
            codec,
        }
    }
}
