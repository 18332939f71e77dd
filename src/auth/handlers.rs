use crate::{
    auth::{jwt::generate_session_token, password::verify_password},
    config::Config,
    models::LoginReqDto,
};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub session_token: String,
}

/// Admin login. Credentials come from the environment, not from a user
/// table; there is exactly one account. No lockout, no rate limiting.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Empty username or password"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(config, user),
    fields(username = %user.username)
)]
pub async fn login(user: web::Json<LoginReqDto>, config: web::Data<Config>) -> impl Responder {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    if user.username != config.admin_username {
        info!("Invalid credentials: unknown username");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Verifying password");

    if let Err(e) = verify_password(&user.password, &config.admin_password_hash) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Generating session token");

    let session_token = generate_session_token(
        config.admin_username.clone(),
        &config.jwt_secret,
        config.session_ttl,
    );

    info!("Login successful");

    HttpResponse::Ok().json(LoginResponse { session_token })
}

/// Sessions are stateless; logout succeeds unconditionally and the token
/// simply falls out of use (or expires).
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Logged out")
    ),
    tag = "Auth"
)]
pub async fn logout() -> impl Responder {
    HttpResponse::NoContent().finish()
}
