//! Session helpers keeping handlers free of cookie-store details.
//!
//! Only the authenticated user's id is stored in the session; usernames and
//! avatars are always read fresh from the user directory.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Actor, Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Message returned when a mutating endpoint is called without a session.
pub const LOGIN_REQUIRED_MESSAGE: &str = "You must be logged in to perform that action.";

/// Newtype exposing domain-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Log `user_id` in, rotating the session id to prevent fixation.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget the logged-in user.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Logged-in user id, if any. A tampered id is treated as anonymous.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// The caller as seen by the domain.
    pub fn actor(&self) -> Result<Actor, Error> {
        self.user_id().map(Actor::from_session)
    }

    /// Require a logged-in user or fail with `401 Unauthorized`.
    pub fn require_user(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized(LOGIN_REQUIRED_MESSAGE))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/login",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new(FIXTURE_ID).expect("fixture id");
                    session.persist_user(id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/logout",
                web::get().to(|session: SessionContext| async move {
                    session.purge();
                    HttpResponse::Ok()
                }),
            )
            .route(
                "/whoami",
                web::get().to(|session: SessionContext| async move {
                    let actor = session.actor()?;
                    let body = actor
                        .user_id()
                        .map_or_else(|| "anonymous".to_owned(), |id| id.to_string());
                    Ok::<_, Error>(HttpResponse::Ok().body(body))
                }),
            )
            .route(
                "/require",
                web::get().to(|session: SessionContext| async move {
                    let id = session.require_user()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                }),
            )
            .route(
                "/tamper",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-uuid")
                        .expect("set invalid user id");
                    HttpResponse::Ok()
                }),
            )
    }

    fn session_cookie(
        response: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    async fn body_of(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        uri: &str,
        cookie: Option<actix_web::cookie::Cookie<'static>>,
    ) -> (StatusCode, String) {
        let mut request = test::TestRequest::get().uri(uri);
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        let response = test::call_service(app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[actix_web::test]
    async fn logged_in_user_round_trips() {
        let app = test::init_service(session_test_app()).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
            .await;
        let cookie = session_cookie(&login);

        let (status, body) = body_of(&app, "/require", Some(cookie)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, FIXTURE_ID);
    }

    #[actix_web::test]
    async fn missing_session_is_anonymous_and_unauthorised() {
        let app = test::init_service(session_test_app()).await;

        assert_eq!(
            body_of(&app, "/whoami", None).await,
            (StatusCode::OK, "anonymous".to_owned())
        );
        assert_eq!(
            body_of(&app, "/require", None).await.0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn tampered_user_id_is_anonymous() {
        let app = test::init_service(session_test_app()).await;
        let tamper = test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request())
            .await;
        let cookie = session_cookie(&tamper);

        assert_eq!(
            body_of(&app, "/require", Some(cookie)).await.0,
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn logout_clears_the_session_cookie() {
        let app = test::init_service(session_test_app()).await;
        let login = test::call_service(&app, test::TestRequest::get().uri("/login").to_request())
            .await;
        let cookie = session_cookie(&login);

        let logout = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let cleared = session_cookie(&logout);
        assert!(cleared.value().is_empty());
    }
}
