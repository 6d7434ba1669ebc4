//! HTTP round trips through the full API with in-memory storage.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use postapp::Trace;
use postapp::domain::TRACE_ID_HEADER;
use postapp::inbound::http::configure_api;
use postapp::test_support::InMemoryServices;
use serde_json::{Value, json};

async fn call<S>(app: &S, request: test::TestRequest) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    test::call_service(app, request.to_request()).await
}

fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn register_post_follow_and_read_feed() {
    let services = InMemoryServices::new(Utc::now());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(services.http_state()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(
                        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                            .cookie_name("session".to_owned())
                            .cookie_secure(false)
                            .build(),
                    )
                    .configure(configure_api),
            ),
    )
    .await;

    let grace = call(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "username": "grace",
            "email": "grace@example.com",
            "password": "correct horse battery"
        })),
    )
    .await;
    assert_eq!(grace.status(), StatusCode::CREATED);
    let grace_cookie = session_cookie(&grace);

    let created = call(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(grace_cookie.clone())
            .set_json(json!({"title": "<b>Compilers</b>", "body": "Parsing is fun"})),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(created).await;
    let post_id = created["id"].as_str().expect("post id").to_owned();

    let ada = call(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "correct horse battery"
        })),
    )
    .await;
    let ada_cookie = session_cookie(&ada);

    let followed = call(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/profiles/grace/follow")
            .cookie(ada_cookie.clone()),
    )
    .await;
    assert_eq!(followed.status(), StatusCode::NO_CONTENT);

    let feed = call(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/feed")
            .cookie(ada_cookie.clone()),
    )
    .await;
    assert_eq!(feed.status(), StatusCode::OK);
    let feed: Value = test::read_body_json(feed).await;
    assert_eq!(feed[0]["id"], post_id.as_str());
    assert_eq!(feed[0]["title"], "Compilers");
    assert_eq!(feed[0]["isOwner"], false);

    let profile = call(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/profiles/grace")
            .cookie(ada_cookie.clone()),
    )
    .await;
    let profile: Value = test::read_body_json(profile).await;
    assert_eq!(profile["isFollowing"], true);
    assert_eq!(profile["postCount"], 1);
    assert_eq!(profile["followerCount"], 1);

    let refused = call(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{post_id}"))
            .cookie(ada_cookie),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);
    assert!(refused.headers().contains_key(TRACE_ID_HEADER));

    let deleted = call(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/posts/{post_id}"))
            .cookie(grace_cookie),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = call(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/posts/{post_id}")),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn outage_maps_to_retryable_service_unavailable() {
    let services = InMemoryServices::new(Utc::now());
    services.store.set_unavailable(true);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(services.http_state()))
            .service(
                web::scope("/api/v1")
                    .wrap(
                        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                            .cookie_secure(false)
                            .build(),
                    )
                    .configure(configure_api),
            ),
    )
    .await;

    let response = call(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users/username-exists")
            .set_json(json!({"username": "ada"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Please try again later.");
}
