//! Rate limiting middleware.
//!
//! Counts every request against the caller's fixed window before it reaches
//! a handler, rejects with 429 once the quota is spent, and stamps the
//! `RateLimit-*` headers on every response.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER},
};
use nimbus_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::net::SocketAddr;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use nimbus_core::ports::{RateLimitResult, RateLimiter};

/// Header names for the rate limit state (IETF draft `RateLimit` fields).
pub static RATELIMIT_LIMIT: &str = "ratelimit-limit";
pub static RATELIMIT_REMAINING: &str = "ratelimit-remaining";
pub static RATELIMIT_RESET: &str = "ratelimit-reset";
pub static RATELIMIT_POLICY: &str = "ratelimit-policy";

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    trust_proxy: bool,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            trust_proxy: false,
        }
    }

    /// Key clients by `Forwarded` / `X-Forwarded-For` when behind a proxy.
    pub fn trust_proxy(mut self, trust: bool) -> Self {
        self.trust_proxy = trust;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trust_proxy: self.trust_proxy,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    trust_proxy: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();
        let key = client_key(&req, self.trust_proxy);

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(key = %key, "Rate limit exceeded");

                    let mut response = HttpResponse::TooManyRequests();
                    for (name, value) in headers_for(&result) {
                        response.insert_header((name, value));
                    }
                    response.insert_header((RETRY_AFTER, result.reset_secs()));

                    let (http_req, _payload) = req.into_parts();
                    let srv_response = ServiceResponse::new(
                        http_req,
                        response.json(ErrorResponse::too_many_requests()),
                    );

                    Ok(srv_response.map_into_right_body())
                }
                Ok(result) => {
                    let mut res = service.call(req).await?;
                    apply_headers(res.headers_mut(), &result);
                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    // Fail open.
                    tracing::error!(key = %key, error = %e, "Rate limiter error, failing open");
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

/// Identify the caller by IP address, without the port.
fn client_key(req: &ServiceRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(addr) = req.connection_info().realip_remote_addr() {
            return strip_port(addr);
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn strip_port(addr: &str) -> String {
    addr.parse::<SocketAddr>()
        .map(|socket| socket.ip().to_string())
        .unwrap_or_else(|_| addr.to_string())
}

fn headers_for(result: &RateLimitResult) -> Vec<(HeaderName, HeaderValue)> {
    let mut headers = vec![
        (
            HeaderName::from_static(RATELIMIT_LIMIT),
            HeaderValue::from(result.limit),
        ),
        (
            HeaderName::from_static(RATELIMIT_REMAINING),
            HeaderValue::from(result.remaining),
        ),
        (
            HeaderName::from_static(RATELIMIT_RESET),
            HeaderValue::from(result.reset_secs()),
        ),
    ];

    if let Ok(policy) = HeaderValue::from_str(&result.policy()) {
        headers.push((HeaderName::from_static(RATELIMIT_POLICY), policy));
    }

    headers
}

fn apply_headers(headers: &mut HeaderMap, result: &RateLimitResult) {
    for (name, value) in headers_for(result) {
        headers.insert(name, value);
    }
}
