use axum::{
    Router,
    http::{HeaderValue, Method, request},
    middleware,
    routing::{get, post},
};
use imperial_adapters::{BearerTokenValidator, config::AllowedOrigins};
use imperial_application::AuthWorkflow;
use imperial_axum::{
    require_auth,
    routes::{
        confirm_email, forgot_password, me, refresh_token, reset_password, sign_in, sign_up,
        verify_email,
    },
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// Where [`AuthService::run_standalone`] mounts the routes.
pub const AUTH_PATH_PREFIX: &str = "/auth";

/// Identity and credential-verification routes.
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Build the routes around `workflow`. `/me` sits behind the bearer
    /// gate, using the workflow's own token service.
    ///
    /// # Arguments
    /// * `workflow` - The auth workflow every handler delegates to
    ///
    /// # Returns
    /// An AuthService holding the unprefixed, unlayered router
    pub fn new(workflow: AuthWorkflow) -> Self {
        let gate = BearerTokenValidator::new(workflow.token_service());

        let protected = Router::new()
            .route("/me", get(me))
            .route_layer(middleware::from_fn_with_state(
                gate,
                require_auth::<BearerTokenValidator>,
            ));

        let router = Router::new()
            .route("/sign-up", post(sign_up))
            .route("/verify-email", post(verify_email))
            .route("/confirm-email", post(confirm_email))
            .route("/sign-in", post(sign_in))
            .route("/refresh-token", post(refresh_token))
            .route("/forgot-password", post(forgot_password))
            .route("/reset-password", post(reset_password))
            .merge(protected)
            .with_state(workflow);

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

    /// Routes without a prefix, ready to be nested into a host application.
    /// CORS is only installed when `allowed_origins` is given.
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    ///
    /// # Returns
    /// An Axum Router with tracing and, if configured, CORS layers applied
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Serve the routes under [`AUTH_PATH_PREFIX`] until the listener fails.
    ///
    /// # Arguments
    /// * `listener` - A bound TCP listener to accept connections on
    /// * `allowed_origins` - Optional list of allowed CORS origins
    ///
    /// # Returns
    /// `Ok(())` once the server shuts down, or the I/O error that stopped it
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = Router::new().nest(AUTH_PATH_PREFIX, self.as_nested_router(allowed_origins));

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
