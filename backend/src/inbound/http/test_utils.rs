//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};

use crate::domain::ports::{
    MockFollowGraph, MockPostStore, MockProfileQuery, MockUserDirectory,
};
use crate::domain::{EmailAddress, User, UserId, Username};

use super::configure_api;
use super::state::HttpState;

/// Session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocked driving ports; unset expectations fail the test when called.
#[derive(Default)]
pub struct MockPorts {
    pub users: MockUserDirectory,
    pub follows: MockFollowGraph,
    pub posts: MockPostStore,
    pub profiles: MockProfileQuery,
}

impl MockPorts {
    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.users),
            Arc::new(self.follows),
            Arc::new(self.posts),
            Arc::new(self.profiles),
        )
    }
}

/// App serving the full API over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure_api))
}

/// A stored user fixture.
pub fn sample_user(name: &str) -> User {
    User::new(
        UserId::random(),
        Username::parse(name).expect("username"),
        EmailAddress::parse(&format!("{name}@example.com")).expect("email"),
    )
}

/// Mock `authenticate` to succeed as `user`, so [`login_cookie`] works.
pub fn allow_login(users: &mut MockUserDirectory, user: User) {
    users
        .expect_authenticate()
        .returning(move |_, _| Ok(user.clone()));
}

/// Log in through `POST /api/v1/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({"username": "ada", "password": "correct horse battery"}))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
