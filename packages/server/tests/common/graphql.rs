//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.

use std::sync::Arc;

use juniper::Variables;
use membership_core::domains::auth::JwtService;
use membership_core::kernel::ServerDeps;
use membership_core::server::graphql::{create_schema, GraphQLContext, Schema};
use membership_core::server::middleware::AuthUser;
use serde_json::Value;
use sqlx::PgPool;

pub struct GraphQLClient {
    schema: Schema,
    deps: Arc<ServerDeps>,
    auth_user: Option<AuthUser>,
}

/// A GraphQL error message with its `extensions.code`.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    pub code: Option<String>,
}

#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Code of the first error, panicking if the execution succeeded.
    pub fn error_code(&self) -> String {
        self.errors
            .first()
            .and_then(|e| e.code.clone())
            .unwrap_or_else(|| panic!("Expected a coded error, got {:?}", self.errors))
    }

    /// Gets a value at the given dotted JSON path.
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }
}

impl GraphQLClient {
    pub fn new(db_pool: PgPool, auth_user: Option<AuthUser>) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            "test_secret_key",
            "test_issuer".to_string(),
        ));
        let deps = Arc::new(ServerDeps::postgres(db_pool, jwt_service));

        Self {
            schema: create_schema(),
            deps,
            auth_user,
        }
    }

    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    /// Each call resolves the caller again, like one HTTP request does.
    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let context = GraphQLContext::resolve(self.deps.clone(), self.auth_user.clone()).await;
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &context)
                .await
                .expect("GraphQL execution failed");

        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));

        let errors = errors
            .iter()
            .map(|e| {
                let code = e
                    .error()
                    .extensions()
                    .as_object_value()
                    .and_then(|ext| ext.get_field_value("code"))
                    .and_then(|code| code.as_string_value())
                    .map(str::to_string);
                GraphQLError {
                    message: e.error().message().to_string(),
                    code,
                }
            })
            .collect();

        GraphQLResult { data, errors }
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }
}
