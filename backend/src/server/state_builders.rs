//! Wiring of Diesel repositories and the Argon2 hasher into handler state.
//!
//! The profile query is composed over the other three services.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use postapp::domain::{FollowGraphService, PostStoreService, ProfileService, UserDirectoryService};
use postapp::inbound::http::state::HttpState;
use postapp::outbound::password::Argon2PasswordHasher;
use postapp::outbound::persistence::{
    DbPool, DieselFollowRepository, DieselPostRepository, DieselUserRepository,
};

/// Build the driving-port services over one shared pool.
pub fn build_http_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let follows = Arc::new(DieselFollowRepository::new(pool.clone()));
    let posts = Arc::new(DieselPostRepository::new(pool.clone()));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let directory = Arc::new(UserDirectoryService::new(
        Arc::clone(&users),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let graph = Arc::new(FollowGraphService::new(
        Arc::clone(&users),
        Arc::clone(&follows),
    ));
    let store = Arc::new(PostStoreService::new(posts, follows, users, clock));
    let profiles = ProfileService::new(
        Arc::clone(&directory),
        Arc::clone(&graph),
        Arc::clone(&store),
    );

    HttpState::new(directory, graph, store, Arc::new(profiles))
}
