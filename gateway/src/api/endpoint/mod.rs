use std::future::Future;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::config::ApiConfig;
use crate::api::controllers;
use crate::api::state::ApiState;

pub struct ApiEndpointBuilder {
    healthcheck_route: Option<String>,
}

impl Default for ApiEndpointBuilder {
    fn default() -> Self {
        Self {
            healthcheck_route: Some("/".to_owned()),
        }
    }
}

impl ApiEndpointBuilder {
    pub async fn bind(self, state: ApiState) -> Result<ApiEndpoint> {
        let listener = state
            .bind_socket()
            .await
            .with_context(|| format!("failed to bind {}", state.config().listen_addr))?;
        let router = self.build_router(state)?;
        Ok(ApiEndpoint { listener, router })
    }

    pub fn build_router(self, state: ApiState) -> Result<axum::Router> {
        use tower::ServiceBuilder;
        use tower_http::timeout::TimeoutLayer;

        let config = state.config();

        // Prepare middleware
        let service = ServiceBuilder::new()
            .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ))
            .layer(cors_layer(config)?)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.request_timeout,
            ));

        #[cfg(feature = "compression")]
        let service = service.layer(tower_http::compression::CompressionLayer::new().gzip(true));

        // Prepare routes
        let mut router = axum::Router::new();

        if let Some(route) = self.healthcheck_route {
            router = router.route(&route, get(health_check));
        }

        Ok(router
            .nest("/api", api_router())
            .layer(service)
            .with_state(state))
    }
}

pub struct ApiEndpoint {
    listener: TcpListener,
    router: axum::Router<()>,
}

impl ApiEndpoint {
    pub fn builder() -> ApiEndpointBuilder {
        ApiEndpointBuilder::default()
    }

    /// Serves requests until `shutdown` resolves, then waits for in-flight ones.
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

fn api_router() -> axum::Router<ApiState> {
    axum::Router::new()
        .route("/devices", get(controllers::devices::list))
        .route(
            "/preferences",
            get(controllers::preferences::get).post(controllers::preferences::save),
        )
}

fn cors_layer(config: &ApiConfig) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(&config.allow_origin)
        .with_context(|| format!("invalid CORS origin: {}", config.allow_origin))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

fn health_check() -> futures_util::future::Ready<impl IntoResponse> {
    futures_util::future::ready(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_millis()
            .to_string(),
    )
}

const MAX_REQUEST_SIZE: usize = 2 << 17; // 256kb

// Sent on every response, preflight ones get them from the CORS layer.
const ALLOW_METHODS: &str = "GET, POST";
const ALLOW_HEADERS: &str = "Content-Type";
