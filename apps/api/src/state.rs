use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::profile::ProfileService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Validates bearer tokens for the `AuthUser` extractor.
    pub auth: Arc<JwtVerifier>,
    pub profile: ProfileService,
}
