//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use super::auth::{AuthManager, AuthState, require_auth};
use super::middleware::{self, AllowedOrigins};
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{auth, boards, columns, comments, health, items, members, sections, users};
use crate::core::CoreApp;
use crate::core::constants::{AUTH_BODY_LIMIT, DEFAULT_BODY_LIMIT};
use crate::domain::Services;

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let router = router(app.services.clone(), app.auth.clone(), allowed_origins);

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(%addr, "HTTP listener bound");
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait())
        .await?;

        Ok(app)
    }
}

/// Full HTTP surface: public routes, authenticated `/api/v1` routes, docs
pub fn router(
    services: Services,
    auth_manager: Arc<AuthManager>,
    allowed_origins: AllowedOrigins,
) -> Router {
    let auth_state = AuthState {
        auth_manager: auth_manager.clone(),
        users: services.users.clone(),
        allowed_origins: allowed_origins.clone(),
    };

    let public_routes = Router::new()
        .merge(health::routes(services.clone()))
        .merge(
            auth::routes(auth_manager, services.users.clone())
                .layer(DefaultBodyLimit::max(AUTH_BODY_LIMIT)),
        );

    let protected_routes = Router::new()
        .merge(auth::session_routes())
        .merge(users::routes(services.clone()))
        .merge(boards::routes(services.clone()))
        .merge(sections::routes(services.clone()))
        .merge(columns::routes(services.clone()))
        .merge(items::routes(services.clone()))
        .merge(comments::routes(services.clone()))
        .merge(members::routes(services))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_state,
            require_auth,
        ));

    Router::new()
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/docs", get(swagger_ui_html))
        .route("/api/docs/", get(swagger_ui_html))
        .nest("/api/v1", public_routes.merge(protected_routes))
        .fallback(middleware::handle_404)
        .layer(CompressionLayer::new())
        .layer(middleware::cors(&allowed_origins))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}
