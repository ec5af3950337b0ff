//! Test harness with testcontainers for integration testing.
//!
//! One Postgres container is shared by every test in a binary; migrations
//! run once on first use.

use anyhow::{Context, Result};
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

use super::GraphQLClient;
use membership_core::common::{MemberId, MemberRole};
use membership_core::domains::member::Member;
use membership_core::domains::participation::PgParticipationStore;
use membership_core::server::middleware::AuthUser;

struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let postgres = Postgres::default()
            .with_tag("16")
            .with_cmd(["-c", "max_connections=200"])
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Test harness that manages test infrastructure.
///
/// Tests share one database, so fixtures use unique emails and tests only
/// assert on rows they created.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let member = create_member(&ctx.db_pool, MemberRole::Participant).await.unwrap();
///     let client = ctx.graphql_as(&member);
/// }
/// ```
pub struct TestHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        // Database pool is automatically dropped
    }
}

impl TestHarness {
    pub async fn new() -> Result<Self> {
        let infra = SharedTestInfra::get().await;

        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .context("Failed to connect to test database")?;

        Ok(Self { db_pool })
    }

    pub fn store(&self) -> PgParticipationStore {
        PgParticipationStore::new(self.db_pool.clone())
    }

    /// Anonymous GraphQL client.
    pub fn graphql(&self) -> GraphQLClient {
        GraphQLClient::new(self.db_pool.clone(), None)
    }

    /// GraphQL client authenticated as `member`.
    pub fn graphql_as(&self, member: &Member) -> GraphQLClient {
        GraphQLClient::new(
            self.db_pool.clone(),
            Some(AuthUser {
                member_id: member.id,
                email: member.email.clone(),
                role: member.role,
            }),
        )
    }

    /// GraphQL client with a token claiming an id that has no member row.
    pub fn graphql_as_unknown(&self) -> GraphQLClient {
        GraphQLClient::new(
            self.db_pool.clone(),
            Some(AuthUser {
                member_id: MemberId::new(),
                email: "ghost@example.org".to_string(),
                role: MemberRole::Participant,
            }),
        )
    }
}
