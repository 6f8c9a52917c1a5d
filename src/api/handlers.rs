//! Route handlers. Each one decodes its body, calls one service operation
//! and turns the outcome into a JSON response.

use std::sync::Arc;

use http::{Response, StatusCode};
use log::{error, warn};
use serde_json::{json, Value as JsonValue};

use super::ApiRequest;
use crate::{
    core::AlgoError,
    service::{
        batch::{run_median_batch, run_palindrome_batch, BatchRejection, BATCH_SIZE_ERROR},
        dto::{MedianRequest, PalindromeCheckRequest, PalindromeRequest},
        palindrome::{CHECK_SERVICE_NAME, LONGEST_SERVICE_NAME, PAIRS_SERVICE_NAME},
        ServiceContainer,
    },
    utils::response::{content_type, ResponseBuilder},
};

/// What every handler gets to work with.
pub struct HandlerContext {
    pub services: Arc<ServiceContainer>,
    pub responses: ResponseBuilder,
}

pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>>;
}

impl<F> Handler for F
where
    F: Fn(&HandlerContext, &ApiRequest) -> Response<Vec<u8>> + Send + Sync,
{
    fn handle(&self, ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>> {
        self(ctx, req)
    }
}

/// Decodes the request body into a JSON object, or builds the 400 response.
fn json_body(ctx: &HandlerContext, req: &ApiRequest) -> Result<JsonValue, Response<Vec<u8>>> {
    if req.body.is_empty() {
        return Err(ctx.responses.bad_request("Request body is empty"));
    }

    let text = std::str::from_utf8(&req.body).map_err(|e| {
        error!("Unicode decode error: {e}");
        ctx.responses.bad_request(&format!("Invalid encoding: {e}"))
    })?;

    let body: JsonValue = serde_json::from_str(text).map_err(|e| {
        error!("JSON decode error: {e}");
        ctx.responses.bad_request(&format!("Invalid JSON: {e}"))
    })?;

    if !body.is_object() {
        return Err(ctx
            .responses
            .bad_request("Request body must be a JSON object"));
    }
    Ok(body)
}

fn failure(ctx: &HandlerContext, err: AlgoError) -> Response<Vec<u8>> {
    match &err {
        AlgoError::Validation { .. } => warn!("Request validation failed: {err}"),
        _ => error!("{err}"),
    }
    ctx.responses.for_error(&err)
}

fn batch_failure(ctx: &HandlerContext, rejection: BatchRejection) -> Response<Vec<u8>> {
    match rejection {
        BatchRejection::Invalid(err) => ctx.responses.error(
            err.status_code(),
            err.error_code(),
            &err.message(),
            None,
        ),
        too_large @ BatchRejection::TooLarge { .. } => ctx.responses.error(
            StatusCode::UNPROCESSABLE_ENTITY,
            BATCH_SIZE_ERROR,
            &too_large.message(),
            None,
        ),
    }
}

macro_rules! try_body {
    ($ctx:expr, $req:expr) => {
        match json_body($ctx, $req) {
            Ok(body) => body,
            Err(response) => return response,
        }
    };
}

pub fn median(ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>> {
    let body = try_body!(ctx, req);
    let median = ctx.services.median();
    match MedianRequest::from_json(&body)
        .map_err(|e| median.reject(e))
        .and_then(|request| median.calculate_median(&request))
    {
        Ok(response) => ctx.responses.ok(&response),
        Err(e) => failure(ctx, e),
    }
}

pub fn median_batch(ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>> {
    let body = try_body!(ctx, req);
    let limit = ctx.services.limits().median_batch_max;
    match run_median_batch(ctx.services.median(), &body, limit) {
        Ok(response) => ctx.responses.ok(&response),
        Err(rejection) => batch_failure(ctx, rejection),
    }
}

pub fn median_stats(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    ctx.responses.ok(&ctx.services.median().get_statistics())
}

pub fn median_stats_reset(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    ctx.services.median().reset_statistics();
    ctx.responses
        .ok(&json!({"message": "Statistics reset successfully"}))
}

pub fn palindrome_pairs(ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>> {
    let body = try_body!(ctx, req);
    let palindrome = ctx.services.palindrome();
    match PalindromeRequest::from_json(&body)
        .map_err(|e| palindrome.reject(PAIRS_SERVICE_NAME, e))
    {
        Ok(request) => ctx.responses.ok(&palindrome.find_palindrome_pairs(&request)),
        Err(e) => failure(ctx, e),
    }
}

pub fn palindrome_check(ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>> {
    let body = try_body!(ctx, req);
    let palindrome = ctx.services.palindrome();
    match PalindromeCheckRequest::from_json(&body)
        .map_err(|e| palindrome.reject(CHECK_SERVICE_NAME, e))
    {
        Ok(request) => ctx.responses.ok(&palindrome.check_palindrome(&request)),
        Err(e) => failure(ctx, e),
    }
}

pub fn palindrome_longest(ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>> {
    let body = try_body!(ctx, req);
    let palindrome = ctx.services.palindrome();
    match PalindromeRequest::from_json(&body)
        .map_err(|e| palindrome.reject(LONGEST_SERVICE_NAME, e))
    {
        Ok(request) => ctx
            .responses
            .ok(&palindrome.find_longest_palindrome_pair(&request)),
        Err(e) => failure(ctx, e),
    }
}

pub fn palindrome_batch(ctx: &HandlerContext, req: &ApiRequest) -> Response<Vec<u8>> {
    let body = try_body!(ctx, req);
    let limit = ctx.services.limits().palindrome_batch_max;
    match run_palindrome_batch(ctx.services.palindrome(), &body, limit) {
        Ok(response) => ctx.responses.ok(&response),
        Err(rejection) => batch_failure(ctx, rejection),
    }
}

pub fn palindrome_stats(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    ctx.responses.ok(&ctx.services.palindrome().get_statistics())
}

pub fn palindrome_stats_reset(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    ctx.services.palindrome().reset_statistics();
    ctx.responses
        .ok(&json!({"message": "Palindrome service statistics reset successfully"}))
}

pub fn health(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    ctx.responses.ok(&ctx.services.health().health_status())
}

pub fn status(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    ctx.responses.ok(&ctx.services.status_report())
}

pub fn ready(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    match ctx.services.health().readiness() {
        Ok(probe) => ctx.responses.ok(&probe),
        Err(probe) => ctx.responses.json(StatusCode::SERVICE_UNAVAILABLE, &probe),
    }
}

pub fn live(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    match ctx.services.health().liveness() {
        Ok(probe) => ctx.responses.ok(&probe),
        Err(probe) => ctx.responses.json(StatusCode::SERVICE_UNAVAILABLE, &probe),
    }
}

pub fn metrics(ctx: &HandlerContext, _req: &ApiRequest) -> Response<Vec<u8>> {
    match ctx.services.metrics().encode_text() {
        Ok(body) => ctx
            .responses
            .raw(StatusCode::OK, content_type::PROMETHEUS_TEXT, body),
        Err(e) => failure(ctx, e),
    }
}
