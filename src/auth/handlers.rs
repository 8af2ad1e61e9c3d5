use crate::{
    auth::{credentials::CredentialStore, jwt::generate_access_token},
    config::Config,
    error::AppError,
    models::{LoginReqDto, LoginResponse},
};
use actix_web::{HttpResponse, web};
use tracing::{debug, error, info, instrument};

/// Opens a session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(credentials, config, user),
    fields(username = %user.username)
)]
pub async fn login(
    user: web::Json<LoginReqDto>,
    credentials: web::Data<dyn CredentialStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    if user.username.trim().is_empty() || user.password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(AppError::Validation("Username and password are required".into()));
    }

    debug!("Verifying credentials");

    let role = match credentials.authenticate(user.username.trim(), &user.password) {
        Some(role) => role,
        None => {
            info!("Invalid credentials");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    let access_token = generate_access_token(
        user.username.trim(),
        role,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign access token");
        AppError::Internal(e.to_string())
    })?;

    info!(%role, "Session opened");

    Ok(HttpResponse::Ok().json(LoginResponse::new(
        access_token,
        role,
        config.access_token_ttl,
    )))
}
