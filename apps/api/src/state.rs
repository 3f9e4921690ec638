use std::sync::Arc;

use crate::interview::controller::SessionController;
use crate::interview::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// One interview per connected client, keyed by session id.
    pub sessions: SessionStore,
    /// Stage machine driving every interview. Holds the `TextGenerator` and page layout.
    pub controller: Arc<SessionController>,
}
