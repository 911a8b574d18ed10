/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use portal_api::{app::{build_router, AppState}, config::Config};
/// use portal_shared::db::pool::{create_pool, DatabaseConfig};
/// use portal_shared::store::postgres::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
///
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use portal_shared::auth::middleware::resolve_context;
use portal_shared::services::auth::AuthService;
use portal_shared::store::PortalStore;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Tenant-scoped data access
    pub store: Arc<dyn PortalStore>,

    /// Registration, login and token handling
    pub auth: AuthService,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn PortalStore>, config: Config) -> Self {
        let auth = AuthService::new(store.clone(), config.jwt.secret.clone());

        Self {
            store,
            auth,
            config: Arc::new(config),
        }
    }

    /// Secret used to sign and verify session tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET  /health                              public
/// ├── POST /auth/register                       public
/// ├── POST /auth/login                          public
/// └── (bearer token required)
///     ├── GET  /auth/me
///     ├── GET|PUT /workspace
///     ├── POST /workspace/members
///     ├── GET|POST /clients
///     ├── GET|POST /projects
///     ├── GET  /projects/:project_id
///     ├── POST /projects/:project_id/comments
///     ├── GET|POST /projects/:project_id/tasks
///     └── PUT  /projects/:project_id/tasks/:task_id/status
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Security headers
/// 2. CORS (tower-http CorsLayer)
/// 3. Logging (tower-http TraceLayer)
/// 4. Tenant context resolution (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    let workspace_routes = Router::new()
        .route(
            "/",
            get(routes::workspace::get_workspace).put(routes::workspace::update_workspace),
        )
        .route("/members", post(routes::workspace::add_member));

    let client_routes = Router::new().route(
        "/",
        get(routes::clients::list_clients).post(routes::clients::create_client),
    );

    let project_routes = Router::new()
        .route(
            "/",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route("/:project_id", get(routes::projects::get_project))
        .route("/:project_id/comments", post(routes::projects::add_comment))
        .route(
            "/:project_id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:project_id/tasks/:task_id/status",
            put(routes::tasks::update_task_status),
        );

    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .nest("/workspace", workspace_routes)
        .nest("/clients", client_routes)
        .nest("/projects", project_routes)
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_layer));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Resolves the tenant context from the bearer token
///
/// Inserts `AuthContext` into request extensions; rejects with 401 otherwise.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = resolve_context(req.headers(), state.jwt_secret())?;

    tracing::debug!(
        principal_id = %auth_context.principal_id,
        workspace_id = %auth_context.workspace_id,
        "Tenant context resolved"
    );
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
