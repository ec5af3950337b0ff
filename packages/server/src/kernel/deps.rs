//! Server dependencies for resolvers (using traits for testability)
//!
//! This module provides the central dependency container shared by every
//! request. The participation store sits behind a trait so the workflow can
//! run against memory in tests.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::domains::participation::PgParticipationStore;
use crate::kernel::BaseParticipationStore;

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to resolvers
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub participation_store: Arc<dyn BaseParticipationStore>,
    /// JWT service for token creation and verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        participation_store: Arc<dyn BaseParticipationStore>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            db_pool,
            participation_store,
            jwt_service,
        }
    }

    /// Production wiring: everything backed by the one Postgres pool.
    pub fn postgres(db_pool: PgPool, jwt_service: Arc<JwtService>) -> Self {
        let store = Arc::new(PgParticipationStore::new(db_pool.clone()));
        Self::new(db_pool, store, jwt_service)
    }
}
