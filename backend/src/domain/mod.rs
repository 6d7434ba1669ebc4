//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: define strongly typed entities shared by the HTTP and persistence
//! adapters, plus the services implementing the driving ports. Services only
//! depend on port traits; no framework or database types appear here.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Username, EmailAddress, Avatar, Registration: account model.
//! - FollowEdge, FollowAction: follow graph model and rules.
//! - Post, PostContent, PostView, UpdateOutcome, SearchTerm: post model.
//! - Actor, Ownership: identity and ownership checks.
//! - UserDirectoryService, FollowGraphService, PostStoreService,
//!   ProfileService: driving port implementations.

pub mod authorization;
pub mod error;
pub mod follow;
pub mod follow_service;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod profile_service;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod validation;

pub use self::authorization::{Actor, Ownership};
pub use self::error::{
    Error, ErrorCode, INVALID_CREDENTIALS_MESSAGE, NOT_ALLOWED_MESSAGE, RETRY_LATER_MESSAGE,
};
pub use self::follow::{FollowAction, FollowEdge, SELF_FOLLOW_MESSAGE, TARGET_MISSING_MESSAGE};
pub use self::follow_service::FollowGraphService;
pub use self::post::{
    AuthoredPost, InvalidPostId, Post, PostContent, PostId, PostView, SearchTerm, UpdateOutcome,
};
pub use self::post_service::PostStoreService;
pub use self::profile_service::ProfileService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    Avatar, EmailAddress, InvalidUserId, Registration, RegistrationCheck, User, UserAccount,
    UserId, UserIdentity, UserSummary, Username,
};
pub use self::user_service::UserDirectoryService;
