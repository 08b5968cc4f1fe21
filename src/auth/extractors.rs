use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// Extracts the authenticated caller's verified claims from request
/// extensions.
///
/// Intended for routes protected by `AuthMiddleware`, which validates the
/// bearer token once and inserts the decoded `Claims` into extensions. If the
/// claims are not present (middleware not applied, or an internal wiring
/// error), the extractor fails with 401.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl AuthClaims {
    /// The verified subject: the authenticated user's id.
    pub fn subject(&self) -> i32 {
        self.0.sub
    }
}

impl FromRequest for AuthClaims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthClaims(claims))),
            None => {
                let err = AppError::Unauthorized(
                    "Authentication context missing. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
