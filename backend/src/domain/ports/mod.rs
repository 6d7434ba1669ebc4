//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports ([`UserDirectory`], [`FollowGraph`],
//! [`PostStore`], [`ProfileQuery`]) are implemented by the domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod follow_graph;
mod follow_repository;
mod password_hasher;
mod post_repository;
mod post_store;
mod profile_query;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use follow_graph::MockFollowGraph;
pub use follow_graph::FollowGraph;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use post_store::MockPostStore;
pub use post_store::PostStore;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::{ProfileQuery, ProfileSummary};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{DuplicateUserField, UserPersistenceError, UserRepository};
