//! Account endpoints: registration, session login/logout and the
//! availability checks used by the sign-up form.
//!
//! ```text
//! POST /api/v1/register {"username":"ada","email":"ada@example.com","password":"..."}
//! POST /api/v1/login {"username":"ada","password":"..."}
//! POST /api/v1/logout
//! POST /api/v1/users/username-exists {"username":"ada"}
//! POST /api/v1/users/email-exists {"email":"ada@example.com"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{Error, Registration, UserIdentity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::payload::lenient_string;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up form. Missing and non-string fields are treated as empty so
/// every rule is reported.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: String,
}

/// Login form.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: String,
}

/// Body of `POST /users/username-exists`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct UsernameProbe {
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
}

/// Body of `POST /users/email-exists`.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct EmailProbe {
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
}

/// Register a new account and log it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserIdentity,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Every violated rule", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let password = Zeroizing::new(password);
    let registration = Registration::normalize(&username, &email, &password);
    let user = state.users.register(registration).await?;
    session.persist_user(user.id())?;
    info!(user_id = %user.id(), "account registered");
    Ok(HttpResponse::Created().json(user.identity()))
}

/// Check credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserIdentity,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Invalid username or password", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let password = Zeroizing::new(password);
    let user = state.users.authenticate(&username, &password).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Ok().json(user.identity()))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Whether a username is already taken.
#[utoipa::path(
    post,
    path = "/api/v1/users/username-exists",
    request_body = UsernameProbe,
    responses(
        (status = 200, description = "True when taken", body = bool),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "usernameExists",
    security([])
)]
#[post("/users/username-exists")]
pub async fn username_exists(
    state: web::Data<HttpState>,
    payload: web::Json<UsernameProbe>,
) -> ApiResult<web::Json<bool>> {
    let taken = state.users.username_exists(&payload.username).await?;
    Ok(web::Json(taken))
}

/// Whether an email is already registered.
#[utoipa::path(
    post,
    path = "/api/v1/users/email-exists",
    request_body = EmailProbe,
    responses(
        (status = 200, description = "True when taken", body = bool),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "emailExists",
    security([])
)]
#[post("/users/email-exists")]
pub async fn email_exists(
    state: web::Data<HttpState>,
    payload: web::Json<EmailProbe>,
) -> ApiResult<web::Json<bool>> {
    let taken = state.users.email_exists(&payload.email).await?;
    Ok(web::Json(taken))
}
