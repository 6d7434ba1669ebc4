//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see driving ports, so
//! they can be exercised with mocks or in-memory services.

use std::sync::Arc;

use crate::domain::ports::{FollowGraph, PostStore, ProfileQuery, UserDirectory};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserDirectory>,
    pub follows: Arc<dyn FollowGraph>,
    pub posts: Arc<dyn PostStore>,
    pub profiles: Arc<dyn ProfileQuery>,
}

impl HttpState {
    /// Bundle the four driving ports.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        follows: Arc<dyn FollowGraph>,
        posts: Arc<dyn PostStore>,
        profiles: Arc<dyn ProfileQuery>,
    ) -> Self {
        Self {
            users,
            follows,
            posts,
            profiles,
        }
    }
}
