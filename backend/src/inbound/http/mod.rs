//! HTTP inbound adapter exposing the JSON API.

pub mod error;
pub mod health;
pub mod payload;
pub mod posts;
pub mod profiles;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` endpoint on a scope or app.
///
/// The caller wraps the scope with session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(payload::json_config())
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::username_exists)
        .service(users::email_exists)
        .service(profiles::profile)
        .service(profiles::profile_posts)
        .service(profiles::followers)
        .service(profiles::following)
        .service(profiles::follow)
        .service(profiles::unfollow)
        .service(posts::create_post)
        .service(posts::search)
        .service(posts::feed)
        .service(posts::get_post)
        .service(posts::update_post)
        .service(posts::delete_post);
}
