use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{Error, HttpResponse};
use serde_json::json;
use thiserror::Error;

use crate::auth::GithubProvider;

/// Why a request was turned away. The display text is the body's `error`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("Authorization token required")]
    MissingToken,
    #[error("Invalid Authorization header format")]
    MalformedHeader,
    #[error("Invalid or expired token")]
    InvalidToken,
}

impl AuthRejection {
    pub fn response(self) -> HttpResponse {
        HttpResponse::Unauthorized().json(json!({ "error": self.to_string() }))
    }
}

/// Extracts the token from `Authorization: Bearer <token>`. The header must
/// split on single spaces into exactly two parts.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = match headers.get(AUTHORIZATION) {
        None => return Err(AuthRejection::MissingToken),
        Some(value) if value.is_empty() => return Err(AuthRejection::MissingToken),
        Some(value) => value.to_str().map_err(|_| AuthRejection::MalformedHeader)?,
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthRejection::MalformedHeader),
    }
}

/// Gate for protected scopes: validates the bearer token with the identity
/// provider and otherwise passes the request through untouched.
pub struct BearerAuth {
    provider: Arc<GithubProvider>,
}

impl BearerAuth {
    pub fn new(provider: Arc<GithubProvider>) -> Self {
        Self { provider }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service: Rc::new(service),
            provider: Arc::clone(&self.provider),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: Rc<S>,
    provider: Arc<GithubProvider>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let provider = Arc::clone(&self.provider);

        Box::pin(async move {
            let token = match bearer_token(req.headers()).map(str::to_owned) {
                Ok(token) => token,
                Err(rejection) => return Ok(reject(req, rejection)),
            };

            match provider.validate_token(&token).await {
                Ok(true) => {}
                Ok(false) => return Ok(reject(req, AuthRejection::InvalidToken)),
                Err(e) => {
                    log::warn!("token validation failed: {e}");
                    return Ok(reject(req, AuthRejection::InvalidToken));
                }
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn reject<B>(req: ServiceRequest, rejection: AuthRejection) -> ServiceResponse<EitherBody<B>> {
    log::warn!("rejected {} {}: {rejection}", req.method(), req.path());
    req.into_response(rejection.response()).map_into_right_body()
}
