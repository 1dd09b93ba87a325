use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{middleware::from_fn, routing::get, Router};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// API ingress: owns the HTTP server, the shared middleware stack and the
/// merged OpenAPI document of every mounted module.
pub struct ApiIngress {
    // Lock-free config using arc-swap for read-mostly access
    config: ArcSwap<ApiIngressConfig>,
    // Merged document; modules add their paths before `rest_finalize`
    openapi: Mutex<utoipa::openapi::OpenApi>,
    // Store the finalized router from REST phase for serving
    final_router: Mutex<Option<Router>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    /// Create a new ApiIngress instance with the given configuration
    pub fn new(config: ApiIngressConfig) -> Self {
        let openapi = utoipa::openapi::OpenApiBuilder::new()
            .info(
                utoipa::openapi::InfoBuilder::new()
                    .title("Articles Server API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .build(),
            )
            .build();
        Self {
            config: ArcSwap::from_pointee(config),
            openapi: Mutex::new(openapi),
            final_router: Mutex::new(None),
        }
    }

    /// Get the current configuration (cheap clone from ArcSwap)
    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    pub fn set_config(&self, config: ApiIngressConfig) {
        self.config.store(Arc::new(config));
    }

    /// Merge a module's paths and components into the served document.
    pub fn register_openapi(&self, doc: utoipa::openapi::OpenApi) {
        self.openapi.lock().merge(doc);
    }

    pub fn openapi(&self) -> utoipa::openapi::OpenApi {
        self.openapi.lock().clone()
    }

    /// Base router every module mounts onto.
    pub fn rest_prepare(&self, router: Router) -> Router {
        tracing::debug!("REST host prepared base router with health check");
        router
            .route("/health", get(web::health_check))
            .route("/healthz", get(|| async { "ok" }))
    }

    /// Add the docs endpoints (when enabled) and the middleware stack, and
    /// keep the result for `serve`.
    pub fn rest_finalize(&self, mut router: Router) -> Result<Router> {
        let config = self.get_config();

        if config.enable_docs {
            // Build once, serve as static JSON (no per-request parsing)
            let doc = self.openapi();
            tracing::info!(
                "rest_finalize: emitting OpenAPI with {} paths",
                doc.paths.paths.len()
            );
            let openapi_value = Arc::new(serde_json::to_value(doc)?);

            router = router
                .route(
                    "/openapi.json",
                    get({
                        use axum::{http::header, response::IntoResponse};
                        let v = openapi_value.clone();
                        move || async move {
                            let json = axum::Json((*v).clone());
                            ([(header::CACHE_CONTROL, "no-store")], json).into_response()
                        }
                    }),
                )
                .route("/docs", get(web::serve_docs));
        }

        let router = self.apply_middleware(router);
        *self.final_router.lock() = Some(router.clone());

        tracing::debug!("REST host finalized router");
        Ok(router)
    }

    /// Wrap `router` in the shared middleware stack.
    pub fn apply_middleware(&self, mut router: Router) -> Router {
        let config = self.get_config();

        // Middleware order (outermost to innermost):
        // SetRequestId -> PropagateRequestId -> push_req_id_to_extensions -> Trace -> Timeout -> CORS -> BodyLimit
        // Each `layer` call wraps the previous ones, so they are added innermost first.
        let x_request_id = crate::request_id::header();

        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )));

        router = router.layer(crate::request_id::create_trace_layer());

        router = router.layer(from_fn(crate::request_id::push_req_id_to_extensions));

        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

        router.layer(SetRequestIdLayer::new(
            x_request_id,
            crate::request_id::MakeReqId,
        ))
    }

    /// Background HTTP server: bind, report the bound address on `ready`,
    /// serve until cancelled.
    pub async fn serve(
        self: Arc<Self>,
        cancel: CancellationToken,
        ready: Option<oneshot::Sender<SocketAddr>>,
    ) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cfg.bind_addr, e))?;

        // Take the finalized router so the MutexGuard is dropped before awaits
        let stored = { self.final_router.lock().take() };
        let router = if let Some(r) = stored {
            tracing::debug!("Using router from REST phase");
            r
        } else {
            tracing::debug!("No router from REST phase, building default router");
            self.rest_finalize(self.rest_prepare(Router::new()))?
        };

        // Bind the socket, only now consider the service "ready"
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        tracing::info!("HTTP server bound on {}", local);
        if let Some(tx) = ready {
            let _ = tx.send(local);
        }

        // Graceful shutdown on cancel
        let shutdown = {
            let cancel = cancel.clone();
            async move {
                cancel.cancelled().await;
                tracing::info!("HTTP server shutting down gracefully (cancellation)");
            }
        };

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[derive(OpenApi)]
    #[openapi(paths(ping))]
    struct PingDoc;

    #[utoipa::path(get, path = "/ping", responses((status = 200, description = "pong")))]
    #[allow(dead_code)]
    async fn ping() -> &'static str {
        "pong"
    }

    #[test]
    fn register_openapi_merges_paths() {
        let ingress = ApiIngress::default();
        ingress.register_openapi(PingDoc::openapi());
        let doc = ingress.openapi();
        assert!(doc.paths.paths.contains_key("/ping"));
        assert_eq!(doc.info.title, "Articles Server API");
    }

    #[test]
    fn config_can_be_replaced() {
        let ingress = ApiIngress::default();
        ingress.set_config(ApiIngressConfig {
            bind_addr: "0.0.0.0:9000".into(),
            ..Default::default()
        });
        assert_eq!(ingress.get_config().bind_addr, "0.0.0.0:9000");
    }
}
