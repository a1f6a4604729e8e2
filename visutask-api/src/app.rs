//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use visutask_api::{app::{build_router, AppState}, config::Config};
//! use sqlx::PgPool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPool::connect(&config.database.url).await?;
//! let app = build_router(AppState::new(pool, config));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use visutask_shared::auth::middleware::{authenticate, bearer_token, AuthError};

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the router with every route and middleware
///
/// ```text
/// /health                                            public
/// /auth/{register,login,refresh}                     public
/// /users/me                                          bearer token
/// /inbox                                             bearer token
/// /boards[/:board_id]                                bearer token
/// /boards/:board_id/lists[/:list_id]                 bearer token
/// /boards/:board_id/lists/:list_id/cards[/:card_id]  bearer token
/// /boards/:board_id/tags[/:tag_id]                   bearer token
/// /cards/:card_id/move                               bearer token
/// /cards/:card_id/tags/:tag_id                       bearer token
/// ```
///
/// Layers, outermost first: security headers, CORS, compression, request
/// tracing.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes);

    let protected_routes = Router::new()
        .route("/users/me", get(routes::users::me))
        .route("/inbox", get(routes::inbox::get_inbox))
        .route(
            "/boards",
            post(routes::boards::create_board).get(routes::boards::list_boards),
        )
        .route(
            "/boards/:board_id",
            get(routes::boards::get_board)
                .patch(routes::boards::update_board)
                .delete(routes::boards::delete_board),
        )
        .route(
            "/boards/:board_id/lists",
            post(routes::lists::create_list).get(routes::lists::list_lists),
        )
        .route(
            "/boards/:board_id/lists/:list_id",
            axum::routing::patch(routes::lists::update_list).delete(routes::lists::delete_list),
        )
        .route(
            "/boards/:board_id/lists/:list_id/cards",
            post(routes::cards::create_card).get(routes::cards::list_list_cards),
        )
        .route(
            "/boards/:board_id/lists/:list_id/cards/:card_id",
            get(routes::cards::get_card)
                .patch(routes::cards::update_card)
                .delete(routes::cards::delete_card),
        )
        .route(
            "/boards/:board_id/tags",
            post(routes::tags::create_tag).get(routes::tags::list_tags),
        )
        .route(
            "/boards/:board_id/tags/:tag_id",
            axum::routing::patch(routes::tags::update_tag).delete(routes::tags::delete_tag),
        )
        .route("/cards/:card_id/move", post(routes::cards::move_card))
        .route(
            "/cards/:card_id/tags/:tag_id",
            post(routes::tags::attach).delete(routes::tags::detach),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
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
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Validates the bearer token and puts the [`CurrentUser`] into the request
///
/// [`CurrentUser`]: visutask_shared::auth::middleware::CurrentUser
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = bearer_token(header_value)?;

    let current = authenticate(&state.db, token, state.jwt_secret()).await?;
    req.extensions_mut().insert(current);

    Ok(next.run(req).await)
}
