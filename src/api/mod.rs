pub mod handlers;

use std::{collections::HashMap, sync::Arc, time::Instant};

use async_trait::async_trait;
use http::{Method, Response};
use log::{error, info};
use matchit::{Match, Router};
use pingora::{
    apps::http_app::ServeHttp, protocols::http::ServerSession, services::listening::Service,
};

use crate::{
    config,
    service::ServiceContainer,
    utils::response::ResponseBuilder,
};

use handlers::{Handler, HandlerContext};

type Routes = HashMap<Method, Box<dyn Handler>>;

/// A fully read request, detached from the HTTP session.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }
}

pub struct ApiHttpApp {
    ctx: HandlerContext,
    router: Router<Routes>,
    max_body_bytes: usize,
}

impl ApiHttpApp {
    /// Full API surface: algorithm endpoints plus probes.
    pub fn new(services: Arc<ServiceContainer>, cfg: &config::Api) -> Self {
        let mut this = Self::bare(services, cfg);

        this.route("/api/v1/median", Method::POST, Box::new(handlers::median))
            .route(
                "/api/v1/median/batch",
                Method::POST,
                Box::new(handlers::median_batch),
            )
            .route(
                "/api/v1/median/stats",
                Method::GET,
                Box::new(handlers::median_stats),
            )
            .route(
                "/api/v1/median/stats",
                Method::DELETE,
                Box::new(handlers::median_stats_reset),
            )
            .route(
                "/api/v1/palindrome/pairs",
                Method::POST,
                Box::new(handlers::palindrome_pairs),
            )
            .route(
                "/api/v1/palindrome/check",
                Method::POST,
                Box::new(handlers::palindrome_check),
            )
            .route(
                "/api/v1/palindrome/longest",
                Method::POST,
                Box::new(handlers::palindrome_longest),
            )
            .route(
                "/api/v1/palindrome/batch",
                Method::POST,
                Box::new(handlers::palindrome_batch),
            )
            .route(
                "/api/v1/palindrome/stats",
                Method::GET,
                Box::new(handlers::palindrome_stats),
            )
            .route(
                "/api/v1/palindrome/stats",
                Method::DELETE,
                Box::new(handlers::palindrome_stats_reset),
            );

        this.probe_routes();
        this
    }

    /// Probe endpoints only, for the dedicated status listener.
    pub fn probes(services: Arc<ServiceContainer>, cfg: &config::Api) -> Self {
        let mut this = Self::bare(services, cfg);
        this.probe_routes();
        this
    }

    fn bare(services: Arc<ServiceContainer>, cfg: &config::Api) -> Self {
        Self {
            ctx: HandlerContext {
                services,
                responses: ResponseBuilder::new(&cfg.allowed_origins),
            },
            router: Router::new(),
            max_body_bytes: cfg.max_body_bytes,
        }
    }

    fn probe_routes(&mut self) {
        for path in ["/health", "/healthz"] {
            self.route(path, Method::GET, Box::new(handlers::health));
        }
        self.route("/status", Method::GET, Box::new(handlers::status));
        for path in ["/ready", "/readyz", "/health/ready"] {
            self.route(path, Method::GET, Box::new(handlers::ready));
        }
        for path in ["/live", "/livez", "/health/live"] {
            self.route(path, Method::GET, Box::new(handlers::live));
        }
        self.route("/metrics", Method::GET, Box::new(handlers::metrics));
    }

    /// Registers a handler for `method` on `path`.
    fn route(&mut self, path: &str, method: Method, handler: Box<dyn Handler>) -> &mut Self {
        if let Ok(routes) = self.router.at_mut(path) {
            routes.value.insert(method, handler);
            return self;
        }

        let mut handlers: Routes = HashMap::new();
        handlers.insert(method, handler);
        if let Err(e) = self.router.insert(path, handlers) {
            error!("Failed to register route {path}: {e}");
        }
        self
    }

    /// Routes a request to its handler. CORS preflight on any known path
    /// answers 204.
    pub fn dispatch(&self, req: &ApiRequest) -> Response<Vec<u8>> {
        match self.router.at(&req.path) {
            Ok(Match { value, .. }) => {
                if req.method == Method::OPTIONS {
                    return self.ctx.responses.no_content();
                }
                match value.get(&req.method) {
                    Some(handler) => handler.handle(&self.ctx, req),
                    None => self.ctx.responses.method_not_allowed(),
                }
            }
            Err(_) => self.ctx.responses.not_found(&req.path),
        }
    }

    pub fn api_http_service(cfg: &config::Api, services: Arc<ServiceContainer>) -> Service<Self> {
        let app = Self::new(services, cfg);
        let addr = cfg.address.to_string();
        let mut service = Service::new("Algosix API HTTP".to_string(), app);
        service.add_tcp(&addr);
        service
    }

    pub fn status_http_service(
        cfg: &config::Api,
        status: &config::Status,
        services: Arc<ServiceContainer>,
    ) -> Service<Self> {
        let app = Self::probes(services, cfg);
        let addr = status.address.to_string();
        let mut service = Service::new("Algosix Status HTTP".to_string(), app);
        service.add_tcp(&addr);
        service
    }
}

enum BodyError {
    TooLarge,
    Read(Box<pingora_error::Error>),
}

async fn read_request_body(
    http_session: &mut ServerSession,
    limit: usize,
) -> Result<Vec<u8>, BodyError> {
    let mut body_data = Vec::new();
    while let Some(bytes) = http_session
        .read_request_body()
        .await
        .map_err(BodyError::Read)?
    {
        if body_data.len() + bytes.len() > limit {
            return Err(BodyError::TooLarge);
        }
        body_data.extend_from_slice(&bytes);
    }
    Ok(body_data)
}

#[async_trait]
impl ServeHttp for ApiHttpApp {
    async fn response(&self, http_session: &mut ServerSession) -> Response<Vec<u8>> {
        let started = Instant::now();
        let (path, method) = {
            let req_header = http_session.req_header();
            (req_header.uri.path().to_string(), req_header.method.clone())
        };

        let response = match read_request_body(http_session, self.max_body_bytes).await {
            Ok(body) => self.dispatch(&ApiRequest::new(method.clone(), path.clone(), body)),
            Err(BodyError::TooLarge) => {
                http_session.set_keepalive(None);
                self.ctx.responses.payload_too_large(self.max_body_bytes)
            }
            Err(BodyError::Read(e)) => {
                error!("Failed to read request body: {e}");
                http_session.set_keepalive(None);
                self.ctx.responses.bad_request("Unable to read request body")
            }
        };

        info!(
            "{method} {path} -> {} in {:.2}ms",
            response.status().as_u16(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::Value as JsonValue;

    use super::*;
    use crate::config::Limits;

    fn app() -> ApiHttpApp {
        let services = Arc::new(ServiceContainer::new(Limits::default()).unwrap());
        ApiHttpApp::new(services, &config::Api::default())
    }

    fn body_json(response: &Response<Vec<u8>>) -> JsonValue {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let response = app().dispatch(&ApiRequest::new(Method::GET, "/nope", ""));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(&response)["error_code"], "NOT_FOUND");
    }

    #[test]
    fn test_wrong_method_is_rejected() {
        let response = app().dispatch(&ApiRequest::new(Method::GET, "/api/v1/median", ""));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_options_preflight() {
        let response = app().dispatch(&ApiRequest::new(
            Method::OPTIONS,
            "/api/v1/palindrome/pairs",
            "",
        ));
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_same_path_multiple_methods() {
        let app = app();
        let get = app.dispatch(&ApiRequest::new(Method::GET, "/api/v1/median/stats", ""));
        let delete = app.dispatch(&ApiRequest::new(
            Method::DELETE,
            "/api/v1/median/stats",
            "",
        ));
        assert_eq!(get.status(), StatusCode::OK);
        assert_eq!(delete.status(), StatusCode::OK);
    }

    #[test]
    fn test_probe_app_has_no_algorithm_routes() {
        let services = Arc::new(ServiceContainer::new(Limits::default()).unwrap());
        let app = ApiHttpApp::probes(services, &config::Api::default());
        let health = app.dispatch(&ApiRequest::new(Method::GET, "/healthz", ""));
        assert_eq!(health.status(), StatusCode::OK);
        let median = app.dispatch(&ApiRequest::new(Method::POST, "/api/v1/median", "{}"));
        assert_eq!(median.status(), StatusCode::NOT_FOUND);
    }
}
