use crate::auth::jwt::verify_session_token;
use crate::config::Config;
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use std::future::{Ready, ready};

/// Request-scoped session, reconstructed from the bearer token on every
/// request. Handlers that require a logged-in admin take this as an argument;
/// there is no ambient logged-in flag anywhere.
pub struct Session {
    pub username: String,
    pub session_id: String,
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing session token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let claims = match verify_session_token(token, &config.jwt_secret) {
            Ok(c) => c,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid or expired session"))),
        };

        ready(Ok(Session {
            username: claims.sub,
            session_id: claims.jti,
        }))
    }
}
