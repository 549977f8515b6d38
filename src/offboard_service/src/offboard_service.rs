use std::any::Any;

use axum::{
    Router,
    body::Body,
    http::{HeaderName, HeaderValue, Method, Response, header, request},
    routing::{any, get},
};
use offboard_adapters::{
    config::{AllowedOrigins, routes},
    handlers::{DeletionContext, unexpected_response},
};
use offboard_axum::{
    response_builder,
    routes::{delete_user, health},
};
use offboard_core::{CredentialSource, PlatformConnector};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

const API_KEY_HEADER: HeaderName = HeaderName::from_static("apikey");
const CLIENT_INFO_HEADER: HeaderName = HeaderName::from_static("x-client-info");

/// Account deletion service: the deletion endpoint plus a health check.
pub struct OffboardService {
    router: Router,
}

impl OffboardService {
    /// Create the service around a deletion context.
    ///
    /// The deletion route is mounted under both `/delete-user` and the
    /// functions-style path, for every method.
    pub fn new<P, C>(context: DeletionContext<P, C>) -> Self
    where
        P: PlatformConnector + 'static,
        C: CredentialSource + 'static,
    {
        let router = Router::new()
            .route(routes::DELETE_USER, any(delete_user::<P, C>))
            .route(routes::DELETE_USER_FUNCTION, any(delete_user::<P, C>))
            .with_state(context)
            .route(routes::HEALTH, get(health))
            .layer(CatchPanicLayer::custom(panic_response));

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be nested into another one
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::AUTHORIZATION,
                    header::CONTENT_TYPE,
                    API_KEY_HEADER,
                    CLIENT_INFO_HEADER,
                ])
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        origin
                            .to_str()
                            .is_ok_and(|origin| allowed_origins.contains(origin))
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server until ctrl-c
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Offboard service listening on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };

    unexpected_response(&details, response_builder())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
