pub mod assertions;
pub mod builders;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use clinic::{api::create_router, config::StorageBackend, db::PostgresStore, AppState, Config};
use futures::FutureExt as _;
use serde_json::Value;
use sqlx::Connection as _;
use std::sync::{Arc, Once};
use tower::ServiceExt as _;
use url::Url;
use uuid::Uuid;

/// Admin URL of the database the Postgres-backed tests create their schemas in.
/// Those tests are skipped when it is unset.
pub const TEST_DATABASE_URL_VAR: &str = "CLINIC_TEST_DATABASE_URL";

pub use assertions::*;
pub use builders::*;

static TRACING: Once = Once::new();

/// Route test logs through the libtest capture. `RUST_LOG` turns them up.
fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Base configuration for tests: in-memory storage, no telemetry.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.database.backend = StorageBackend::Memory;
    config.database.run_migrations = false;
    config
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    schema: Option<TestSchema>,
}

/// Per-test Postgres schema, dropped on cleanup.
struct TestSchema {
    name: String,
    admin_database_url: String,
    store: PostgresStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::new_with_config(|_| {})
    }

    pub fn new_with_config(configure: impl FnOnce(&mut Config)) -> Self {
        init_tracing();

        let mut config = test_config();
        configure(&mut config);

        let state = AppState::in_memory(config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            schema: None,
        }
    }

    /// An app over Postgres in a fresh schema, or `None` when no test database
    /// is configured.
    pub async fn postgres_with_config(
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Option<Self>> {
        let Ok(admin_database_url) = std::env::var(TEST_DATABASE_URL_VAR) else {
            return Ok(None);
        };
        init_tracing();

        let name = format!("test_{}", Uuid::new_v4().simple());
        let mut admin_conn = sqlx::PgConnection::connect(&admin_database_url)
            .await
            .context("connect admin db for schema create")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{name}""#))
            .execute(&mut admin_conn)
            .await
            .context("create test schema")?;

        let mut config = test_config();
        configure(&mut config);
        config.database.backend = StorageBackend::Postgres;
        config.database.url = with_search_path(&admin_database_url, &name)?;
        config.database.run_migrations = true;
        // Each test owns a pool, keep them small when tests run in parallel.
        config.database.pool_min_size = 0;
        config.database.pool_max_size = 4;

        let store = PostgresStore::connect(&config.database)
            .await
            .context("connect test store")?;
        let state = AppState::with_store(config, Arc::new(store.clone()));
        let router = create_router(state.clone());

        Ok(Some(Self {
            router,
            state,
            schema: Some(TestSchema {
                name,
                admin_database_url,
                store,
            }),
        }))
    }

    pub async fn cleanup(self) -> anyhow::Result<()> {
        let Some(schema) = self.schema else {
            return Ok(());
        };
        schema.store.pool().close().await;

        let mut admin_conn = sqlx::PgConnection::connect(&schema.admin_database_url)
            .await
            .context("connect admin db for schema drop")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, schema.name))
            .execute(&mut admin_conn)
            .await
            .context("drop test schema")?;

        Ok(())
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path_and_query, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// POST `body` to `collection` and return the id named by `Location`.
    pub async fn create(&self, collection: &str, body: &Value) -> anyhow::Result<Uuid> {
        let (status, headers, _body) = self
            .request(Method::POST, collection, Some(to_json_body(body)?))
            .await?;
        assert_status(status, StatusCode::CREATED, "create");
        location_id(&headers)
    }

    /// GET `path` expecting 200 and a JSON body.
    pub async fn get_json(&self, path: &str) -> anyhow::Result<Value> {
        let (status, _headers, body) = self.request(Method::GET, path, None).await?;
        assert_status(status, StatusCode::OK, path);
        json_body(&body)
    }
}

pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    with_test_app_with_config(|_| {}, f).await
}

pub async fn with_test_app_with_config<C, F>(configure: C, f: F) -> anyhow::Result<()>
where
    C: FnOnce(&mut Config),
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let app = TestApp::new_with_config(configure);
    f(&app).await
}

/// Run `f` against a Postgres-backed app. Skipped when no test database is set.
pub async fn with_pg_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let Some(app) = TestApp::postgres_with_config(|_| {}).await? else {
        eprintln!("{TEST_DATABASE_URL_VAR} is not set, skipping Postgres test");
        return Ok(());
    };

    let result = std::panic::AssertUnwindSafe(f(&app)).catch_unwind().await;
    if let Err(e) = app.cleanup().await {
        eprintln!("test schema cleanup failed: {e:?}");
    }

    match result {
        Ok(r) => r,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn with_search_path(database_url: &str, schema: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(database_url).context("parse database URL")?;
    url.query_pairs_mut()
        .append_pair("options", &format!("-c search_path={schema}"));
    Ok(url.to_string())
}
