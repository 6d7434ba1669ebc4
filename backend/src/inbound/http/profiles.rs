//! Profile endpoints: the profile header, a user's posts, follower lists and
//! follow/unfollow.
//!
//! ```text
//! GET    /api/v1/profiles/{username}
//! GET    /api/v1/profiles/{username}/posts
//! GET    /api/v1/profiles/{username}/followers
//! GET    /api/v1/profiles/{username}/following
//! POST   /api/v1/profiles/{username}/follow
//! DELETE /api/v1/profiles/{username}/follow
//! ```

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::ports::ProfileSummary;
use crate::domain::{Error, PostView, UserSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile header as seen by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Profile header", body = ProfileSummary),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getProfile"
)]
#[get("/profiles/{username}")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileSummary>> {
    let actor = session.actor()?;
    let summary = state.profiles.profile(&path, actor).await?;
    Ok(web::Json(summary))
}

/// Posts written by the profile owner, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}/posts",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Posts", body = [PostView]),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getProfilePosts"
)]
#[get("/profiles/{username}/posts")]
pub async fn profile_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let actor = session.actor()?;
    let posts = state.posts.find_by_username(&path, actor).await?;
    Ok(web::Json(posts))
}

/// Users following the profile owner.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}/followers",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Followers", body = [UserSummary]),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getFollowers"
)]
#[get("/profiles/{username}/followers")]
pub async fn followers(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserSummary>>> {
    let owner = state.users.find_by_username(&path).await?;
    let list = state.follows.followers(owner.id).await?;
    Ok(web::Json(list))
}

/// Users the profile owner follows.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}/following",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Followed users", body = [UserSummary]),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getFollowing"
)]
#[get("/profiles/{username}/following")]
pub async fn following(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<UserSummary>>> {
    let owner = state.users.find_by_username(&path).await?;
    let list = state.follows.following(owner.id).await?;
    Ok(web::Json(list))
}

/// Follow the profile owner.
#[utoipa::path(
    post,
    path = "/api/v1/profiles/{username}/follow",
    params(("username" = String, Path, description = "User to follow")),
    responses(
        (status = 204, description = "Now following"),
        (status = 400, description = "Every violated rule", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "follow"
)]
#[post("/profiles/{username}/follow")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user()?;
    state.follows.follow(actor, &path).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Stop following the profile owner.
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{username}/follow",
    params(("username" = String, Path, description = "User to unfollow")),
    responses(
        (status = 204, description = "No longer following"),
        (status = 400, description = "Every violated rule", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "unfollow"
)]
#[delete("/profiles/{username}/follow")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user()?;
    state.follows.unfollow(actor, &path).await?;
    Ok(HttpResponse::NoContent().finish())
}
