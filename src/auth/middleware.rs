use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::bearer::bearer_token;
use crate::auth::token::TokenCodec;
use crate::error::AppError;

/// Gate applied to the `/api` scope: rejects unauthenticated requests to
/// protected paths with 401 and makes the decoded claims available to
/// downstream handlers through request extensions. Tokens are decoded exactly
/// once per request; handlers read the result via the `AuthClaims` extractor.
pub struct AuthMiddleware {
    codec: TokenCodec,
}

impl AuthMiddleware {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            codec: self.codec.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    codec: TokenCodec,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Login and registration are the only unauthenticated endpoints
        // inside this scope; the health check lives outside it.
        let path = req.path();
        if path.starts_with("/api/auth/login") || path.starts_with("/api/auth/register") {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let token = bearer_token(
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok()),
        );

        match token {
            Some(token) => match self.codec.verify(token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(fut)
                }
                Err(_) => {
                    let app_err = AppError::Unauthorized("Invalid token".into());
                    Box::pin(async move { Err(app_err.into()) })
                }
            },
            None => {
                let app_err = AppError::Unauthorized("Unauthorized".into());
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
