use std::sync::Arc;

use juniper::FieldResult;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::common::{Actor, AuthError};
use crate::domains::auth::JwtService;
use crate::domains::member::Member;
use crate::kernel::{BaseParticipationStore, ServerDeps};
use crate::server::middleware::AuthUser;

use super::errors::auth_error;

/// GraphQL request context
///
/// Shared dependencies plus the caller verified by the JWT middleware.
/// Build it with [`GraphQLContext::resolve`] so the caller's role is the one
/// stored in `members`, not the one frozen into the token.
#[derive(Clone)]
pub struct GraphQLContext {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self {
            db_pool: deps.db_pool.clone(),
            deps,
            auth_user,
        }
    }

    /// Re-read the token's member once for this request.
    ///
    /// The stored role and email replace the claims. A token whose member no
    /// longer exists, or that cannot be checked, is treated as anonymous.
    pub async fn resolve(deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        let auth_user = match auth_user {
            Some(claimed) => match Member::find_by_id(claimed.member_id, &deps.db_pool).await {
                Ok(Some(member)) => {
                    if member.role != claimed.role {
                        debug!(
                            member_id = %member.id,
                            token_role = %claimed.role,
                            stored_role = %member.role,
                            "Token role is stale, using stored role"
                        );
                    }
                    Some(AuthUser {
                        member_id: member.id,
                        email: member.email,
                        role: member.role,
                    })
                }
                Ok(None) => {
                    debug!(member_id = %claimed.member_id, "Token member no longer exists");
                    None
                }
                Err(e) => {
                    warn!(member_id = %claimed.member_id, error = %e, "Failed to load token member");
                    None
                }
            },
            None => None,
        };

        Self::new(deps, auth_user)
    }

    /// The caller, if a valid token was presented
    pub fn actor(&self) -> Option<Actor> {
        self.auth_user.as_ref().map(AuthUser::actor)
    }

    pub fn require_actor(&self) -> FieldResult<Actor> {
        self.actor()
            .ok_or_else(|| auth_error(AuthError::AuthenticationRequired))
    }

    pub fn require_admin(&self) -> FieldResult<Actor> {
        let actor = self.require_actor()?;
        if !actor.is_admin() {
            return Err(auth_error(AuthError::AdminRequired));
        }
        Ok(actor)
    }

    pub fn participation_store(&self) -> &dyn BaseParticipationStore {
        self.deps.participation_store.as_ref()
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.deps.jwt_service
    }
}
