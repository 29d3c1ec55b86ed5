use refverify_core::{Config, Verifier};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub config: Config,
    pub verifier: Verifier,
}
