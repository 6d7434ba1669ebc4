//! OpenAPI document for the JSON API.
//!
//! Every handler under `inbound::http` is registered here together with the
//! request and response schemas it references. Swagger UI serves the document
//! in debug builds and `openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::ProfileSummary;
use crate::domain::{
    Avatar, Error, ErrorCode, PostId, PostView, UpdateOutcome, UserIdentity, UserSummary,
};
use crate::inbound::http::posts::{CreatedPost, PostRequest, SearchRequest};
use crate::inbound::http::users::{EmailProbe, LoginRequest, RegisterRequest, UsernameProbe};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "postapp API",
        description = "Users, posts, follows, search and feeds over a cookie session."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::username_exists,
        crate::inbound::http::users::email_exists,
        crate::inbound::http::profiles::profile,
        crate::inbound::http::profiles::profile_posts,
        crate::inbound::http::profiles::followers,
        crate::inbound::http::profiles::following,
        crate::inbound::http::profiles::follow,
        crate::inbound::http::profiles::unfollow,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::search,
        crate::inbound::http::posts::feed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Avatar,
        UserIdentity,
        UserSummary,
        ProfileSummary,
        PostId,
        PostView,
        UpdateOutcome,
        RegisterRequest,
        LoginRequest,
        UsernameProbe,
        EmailProbe,
        PostRequest,
        CreatedPost,
        SearchRequest,
    )),
    tags(
        (name = "users", description = "Registration, login and availability checks"),
        (name = "profiles", description = "Profiles and the follow graph"),
        (name = "posts", description = "Posts, search and feeds"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn property_names(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("PostView", &["id", "title", "body", "createdDate", "author", "isOwner"])]
    #[case("ProfileSummary", &["username", "avatar", "isVisitorsProfile", "isFollowing", "postCount", "followerCount", "followingCount"])]
    #[case("Error", &["code", "message"])]
    fn schemas_use_camel_case_fields(#[case] schema: &str, #[case] fields: &[&str]) {
        let properties = property_names(schema);
        for field in fields {
            assert!(
                properties.iter().any(|p| p == field),
                "{schema} should expose {field}"
            );
        }
    }

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/api/v1/profiles/{username}/follow")]
    #[case("/api/v1/posts/{id}")]
    #[case("/api/v1/search")]
    #[case("/api/v1/feed")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} missing");
    }
}
