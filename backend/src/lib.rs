//! Social blogging backend: users, posts, follows, search and feeds.
//!
//! Layout follows ports and adapters. [`domain`] holds the model, rules and
//! services; [`inbound`] turns HTTP requests into service calls; [`outbound`]
//! implements the storage and hashing ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use middleware::Trace;
