//! Post endpoints: authoring, reading, search and the followed feed.
//!
//! ```text
//! POST   /api/v1/posts {"title":"...","body":"..."}
//! GET    /api/v1/posts/{id}
//! PUT    /api/v1/posts/{id} {"title":"...","body":"..."}
//! DELETE /api/v1/posts/{id}
//! POST   /api/v1/search {"searchTerm":"..."}
//! GET    /api/v1/feed
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Error, PostId, PostView, SearchTerm, UpdateOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::payload::lenient_string;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Title and body of a new or edited post. Missing and non-string fields
/// are treated as empty.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub body: String,
}

/// Identifier of a freshly created post.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatedPost {
    pub id: PostId,
}

/// Body of `POST /search`.
///
/// The term is kept as raw JSON so a non-string value is reported as a
/// validation error rather than a deserialisation failure.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    #[schema(value_type = String)]
    pub search_term: Value,
}

/// Publish a post as the session user.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = CreatedPost),
        (status = 400, description = "Every violated rule", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user()?;
    let id = state
        .posts
        .create(actor, &payload.title, &payload.body)
        .await?;
    Ok(HttpResponse::Created().json(CreatedPost { id }))
}

/// Read one post.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostView),
        (status = 404, description = "Unknown or malformed id", body = Error)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    let actor = session.actor()?;
    let post = state.posts.find_by_id(&path, actor).await?;
    Ok(web::Json(post))
}

/// Replace the title and body of a post the session user owns.
///
/// Invalid content is not an HTTP error: the outcome carries
/// `status: "failure"` and the violated rules.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Update outcome", body = UpdateOutcome),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PostRequest>,
) -> ApiResult<web::Json<UpdateOutcome>> {
    let actor = session.require_user()?;
    let outcome = state
        .posts
        .update(actor, &path, &payload.title, &payload.body)
        .await?;
    Ok(web::Json(outcome))
}

/// Delete a post the session user owns.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user()?;
    state.posts.delete(actor, &path).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Full-text search over titles and bodies.
#[utoipa::path(
    post,
    path = "/api/v1/search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Matching posts", body = [PostView]),
        (status = 400, description = "Blank or non-string term", body = Error)
    ),
    tags = ["posts"],
    operation_id = "searchPosts"
)]
#[post("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SearchRequest>,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let Value::String(term) = &payload.search_term else {
        return Err(Error::validation(vec![SearchTerm::INVALID_MESSAGE.to_owned()]));
    };
    let actor = session.actor()?;
    let found = state.posts.search(term, actor).await?;
    Ok(web::Json(found))
}

/// Posts by every user the session user follows, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/feed",
    responses(
        (status = 200, description = "Feed", body = [PostView]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["posts"],
    operation_id = "feed"
)]
#[get("/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PostView>>> {
    let actor = session.require_user()?;
    let posts = state.posts.feed_for(actor).await?;
    Ok(web::Json(posts))
}
